//! The MCP tools. Each one locks the session and calls the matching command handler.

use crate::args::{AddArgs, DeleteArgs, ListArgs, UpdateArgs};
use crate::commands;
use crate::mcp::mcp_utils::tool_result;
use crate::mcp::ExpenseServer;
use crate::model::ExpenseId;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use rmcp::ErrorData as McpError;
use rmcp::{tool, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

/// Parameters for tools that act on one expense row.
#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(title = "ExpenseIdParams")]
pub struct ExpenseIdParams {
    /// The id of the expense, as shown by `list_expenses`.
    pub id: ExpenseId,
}

#[tool_router(vis = "pub(super)")]
impl ExpenseServer {
    /// Record a new expense.
    ///
    /// # Parameters
    ///
    /// - `amount`: The amount spent as text, e.g. "12.50". Must be a number greater than zero.
    /// - `category`: Any non-empty label, e.g. "Food". Matching is exact and case-sensitive.
    /// - `date`: `YYYY-MM-DD`. Defaults to today.
    /// - `notes`: Optional free text.
    ///
    /// # Returns
    ///
    /// The new expense, including its generated `id`.
    ///
    /// # Example
    ///
    /// ```json
    /// {
    ///   "amount": "30",
    ///   "category": "Travel",
    ///   "date": "2024-01-02",
    ///   "notes": "taxi"
    /// }
    /// ```
    #[tool]
    async fn add_expense(
        &self,
        Parameters(args): Parameters<AddArgs>,
    ) -> Result<CallToolResult, McpError> {
        info!("MCP: add_expense called");
        let mut session = self.session.lock().await;
        tool_result(commands::add(&mut session, args).await)
    }

    /// Save changes to an existing expense by id. Only the fields you pass are changed; the
    /// expense keeps its id and its position in the list. If the row was being edited, it
    /// returns to viewing.
    ///
    /// Returns an error if the id does not exist or if the resulting fields are invalid.
    ///
    /// # Example
    ///
    /// ```json
    /// {
    ///   "id": 1704153600000,
    ///   "amount": "35",
    ///   "notes": "taxi and tip"
    /// }
    /// ```
    #[tool]
    async fn update_expense(
        &self,
        Parameters(args): Parameters<UpdateArgs>,
    ) -> Result<CallToolResult, McpError> {
        info!("MCP: update_expense called for {}", args.id);
        let mut session = self.session.lock().await;
        tool_result(commands::update(&mut session, args).await)
    }

    /// Delete an expense by id. Deleting an id that does not exist succeeds and changes nothing.
    #[tool]
    async fn delete_expense(
        &self,
        Parameters(args): Parameters<DeleteArgs>,
    ) -> Result<CallToolResult, McpError> {
        info!("MCP: delete_expense called for {}", args.id);
        let mut session = self.session.lock().await;
        tool_result(commands::delete(&mut session, args).await)
    }

    /// List the expenses that match the current filter, oldest first, with their total.
    ///
    /// Rows that are being edited are marked `[editing]`.
    #[tool]
    async fn list_expenses(&self) -> Result<CallToolResult, McpError> {
        info!("MCP: list_expenses called");
        let session = self.session.lock().await;
        tool_result(commands::list(&session).await)
    }

    /// Set the category and date filter for this session. Both are exact matches. Leaving a
    /// field out, or passing an empty string, removes that constraint; pass `{}` to show
    /// everything.
    #[tool]
    async fn set_filter(
        &self,
        Parameters(args): Parameters<ListArgs>,
    ) -> Result<CallToolResult, McpError> {
        info!("MCP: set_filter called");
        let mut session = self.session.lock().await;
        tool_result(commands::set_filter(&mut session, args).await)
    }

    /// Start editing an expense. Returns its current fields as a draft; change what you need
    /// and pass the result to `update_expense`, or call `cancel_edit`.
    #[tool]
    async fn edit_expense(
        &self,
        Parameters(params): Parameters<ExpenseIdParams>,
    ) -> Result<CallToolResult, McpError> {
        info!("MCP: edit_expense called for {}", params.id);
        let mut session = self.session.lock().await;
        tool_result(commands::begin_edit(&mut session, params.id).await)
    }

    /// Stop editing an expense without saving.
    #[tool]
    async fn cancel_edit(
        &self,
        Parameters(params): Parameters<ExpenseIdParams>,
    ) -> Result<CallToolResult, McpError> {
        info!("MCP: cancel_edit called for {}", params.id);
        let mut session = self.session.lock().await;
        tool_result(commands::cancel_edit(&mut session, params.id).await)
    }
}
