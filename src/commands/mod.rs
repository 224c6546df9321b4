//! Command handlers for the expense CLI.
//!
//! This module contains implementations for all CLI subcommands. The MCP tools call the same
//! handlers.

mod add;
mod delete;
mod init;
mod list;
mod mcp;
mod update;

use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use add::add;
pub use delete::delete;
pub use init::init;
pub use list::{list, set_filter, Listing, ListingRow};
pub use mcp::mcp;
pub use update::{begin_edit, cancel_edit, update};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data to both the command line and MCP server interfaces.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// One line describing an expense, e.g. `₹50.00 - Food on 2024-01-01 - lunch`.
pub(crate) fn describe(expense: &crate::model::Expense, currency_symbol: &str) -> String {
    let mut line = format!(
        "{currency_symbol}{} - {} on {}",
        expense.amount().grouped(),
        expense.category(),
        expense.date()
    );
    if !expense.notes().is_empty() {
        line.push_str(" - ");
        line.push_str(expense.notes());
    }
    line
}
