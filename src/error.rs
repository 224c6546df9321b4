//! The public error type.
//!
//! Inside the crate, failures are carried as `anyhow::Error` with `.context(...)` chains. At the
//! public boundary they are classified with an `ErrorType` so that callers (the CLI and the MCP
//! server) can tell a user mistake apart from a storage failure.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The public `Result` type.
pub type Result<T> = std::result::Result<T, Error>;

/// The category of an `Error`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The user's input failed a required-field or positivity check. Nothing was changed.
    Validation,
    /// The referenced expense does not exist. Nothing was changed.
    NotFound,
    /// Reading from or writing to storage failed.
    Storage,
    /// The home directory or the configuration file is missing or invalid.
    Config,
    /// The MCP service failed to start or run.
    Service,
    /// Anything else.
    Internal,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// An error with an `ErrorType` and a chain of context messages.
pub struct Error {
    error_type: ErrorType,
    inner: anyhow::Error,
}

impl Error {
    pub(crate) fn new(error_type: ErrorType, inner: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            inner: inner.into(),
        }
    }

    pub(crate) fn validation(message: impl Display) -> Self {
        Self::new(ErrorType::Validation, anyhow::anyhow!("{message}"))
    }

    pub(crate) fn not_found(message: impl Display) -> Self {
        Self::new(ErrorType::NotFound, anyhow::anyhow!("{message}"))
    }

    /// What kind of failure this is.
    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// True if the user should correct their input and try again.
    pub fn is_validation(&self) -> bool {
        self.error_type == ErrorType::Validation
    }

    /// True if the operation referenced an expense that does not exist.
    pub fn is_not_found(&self) -> bool {
        self.error_type == ErrorType::NotFound
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.inner)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#}", self.inner)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Self::new(ErrorType::Internal, e)
    }
}

/// Converts an internal result into a public one with the given `ErrorType`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}
