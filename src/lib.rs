pub mod args;
pub mod commands;
mod config;
mod error;
mod mcp;
pub mod model;
mod session;
pub mod storage;
pub mod store;
mod utils;
pub mod view;


pub use config::Config;
pub use error::{Error, ErrorType, Result};
pub use session::Session;
