//! MCP (Model Context Protocol) server implementation.
//!
//! This module provides an MCP server that exposes the expense tracker as tools for AI agent
//! integration. The server communicates via JSON-RPC over stdio. One connection is one session.

mod mcp_utils;
mod tools;

use crate::error::{ErrorType, IntoResult};
use crate::session::Session;
use crate::Config;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo};
use rmcp::transport::stdio;
use rmcp::{tool_handler, ServerHandler, ServiceExt};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// The expense MCP server.
///
/// Tools run one at a time against the session, in the order they arrive.
#[derive(Debug, Clone)]
pub struct ExpenseServer {
    session: Arc<Mutex<Session>>,
    tool_router: ToolRouter<ExpenseServer>,
}

impl ExpenseServer {
    /// Creates a new ExpenseServer that serves `session`.
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_handler]
impl ServerHandler for ExpenseServer {
    /// Returns server information sent to the MCP client during initialization.
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "expense".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(include_str!("docs/INTRO.md").into()),
        }
    }
}

/// Transport type for the MCP server.
#[derive(Debug, Default)]
pub(crate) enum Io {
    #[default]
    Stdio,
    /// Mock transport for testing - holds one end of a duplex channel.
    #[cfg(test)]
    Mock(tokio::io::DuplexStream),
}

/// Runs the MCP server with stdio transport or mock transport. This function loads the expenses,
/// starts the MCP server and blocks until the client disconnects or an error occurs.
///
/// # Arguments
/// - `config`: The `Config` object
/// - `io`: Whether we are using stdio as the transport or using mock io for testing
pub(crate) async fn run_server(config: Config, io: Io) -> crate::Result<()> {
    let session = Session::open(&config).await?;
    let server = ExpenseServer::new(session);
    info!("Starting MCP server...");

    let service = match io {
        Io::Stdio => server
            .serve(stdio())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to start MCP server: {e}"))
            .pub_result(ErrorType::Service)?,
        #[cfg(test)]
        Io::Mock(stream) => server
            .serve(stream)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to start MCP server: {e}"))
            .pub_result(ErrorType::Service)?,
    };

    info!("MCP server running, waiting for requests...");

    // Wait for the server to complete (client disconnects or error)
    service
        .waiting()
        .await
        .map_err(|e| anyhow::anyhow!("MCP server error: {e}"))
        .pub_result(ErrorType::Service)?;

    info!("MCP server shut down");
    Ok(())
}
