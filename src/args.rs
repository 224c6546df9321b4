//! These structs provide the CLI interface for the expense CLI.
//!
//! The argument structs for add, update, delete and list are also the parameter types of the
//! corresponding MCP tools, so their doc comments double as tool parameter descriptions.

use crate::model::ExpenseId;
use clap::{Parser, Subcommand};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing::level_filters::LevelFilter;

/// expense: A command-line tool for tracking personal expenses.
///
/// Record what you spend with a category, a date and optional notes, correct or remove entries,
/// and see a filtered list with its total. Data is kept in --expense-home.
///
/// There is also a mode in which an AI agent can use this program through the mcp subcommand.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and the configuration file.
    ///
    /// This is the first command you should run. By default the data directory is
    /// $HOME/expenses; pass --expense-home to put it somewhere else.
    Init,
    /// Record a new expense.
    Add(AddArgs),
    /// Change an existing expense. Fields you leave out keep their current values.
    Update(UpdateArgs),
    /// Remove an expense. Removing an expense that does not exist is not an error.
    Delete(DeleteArgs),
    /// Show expenses, optionally filtered by category and date, with their total.
    List(ListArgs),
    /// Run an MCP server over stdio.
    Mcp,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where expense data and configuration is held. Defaults to ~/expenses
    #[arg(long, env = "EXPENSE_HOME", default_value_t = default_expense_home())]
    expense_home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn expense_home(&self) -> &DisplayPath {
        &self.expense_home
    }
}

/// Args for the `expense add` command.
#[derive(Debug, Parser, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddArgs {
    /// The amount spent, e.g. 12.50. Must be greater than zero.
    #[arg(long, allow_hyphen_values = true)]
    pub amount: String,

    /// A category label, e.g. Food. Any non-empty text.
    #[arg(long)]
    pub category: String,

    /// The date of the expense as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    #[serde(default)]
    pub date: Option<String>,

    /// Optional notes.
    #[arg(long)]
    #[serde(default)]
    pub notes: Option<String>,
}

/// Args for the `expense update` command.
#[derive(Debug, Parser, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateArgs {
    /// The id of the expense to change.
    pub id: ExpenseId,

    /// The new amount. Must be greater than zero.
    #[arg(long, allow_hyphen_values = true)]
    #[serde(default)]
    pub amount: Option<String>,

    /// The new category.
    #[arg(long)]
    #[serde(default)]
    pub category: Option<String>,

    /// The new date as YYYY-MM-DD.
    #[arg(long)]
    #[serde(default)]
    pub date: Option<String>,

    /// The new notes. Pass an empty string to clear them.
    #[arg(long)]
    #[serde(default)]
    pub notes: Option<String>,
}

/// Args for the `expense delete` command.
#[derive(Debug, Parser, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeleteArgs {
    /// The id of the expense to remove.
    pub id: ExpenseId,
}

/// Args for the `expense list` command. Both filters are exact matches; leaving one out, or
/// passing an empty string, means no constraint.
#[derive(Debug, Default, Parser, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListArgs {
    /// Only show expenses in this category.
    #[arg(long)]
    #[serde(default)]
    pub category: Option<String>,

    /// Only show expenses on this date, YYYY-MM-DD.
    #[arg(long)]
    #[serde(default)]
    pub date: Option<String>,
}

fn default_expense_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("expenses"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --expense-home or EXPENSE_HOME instead of relying on the \
                default directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("expenses")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
