//! Error types for the filter compiler

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Message returned when a request must carry at least one clause but none was parsed.
pub const REQUIRED_CLAUSE_MESSAGE: &str = "required at least one params query or filter";

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid params JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn required_clause() -> Self {
        Error::Validation(REQUIRED_CLAUSE_MESSAGE.to_string())
    }

    /// Whether this is the "nothing parsed" validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}
