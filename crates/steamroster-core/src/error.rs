//! Error types for steamroster-core

use thiserror::Error;

use crate::steam::SteamApiError;

/// Result type alias using steamroster-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in steamroster-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record file error
    #[error("Record file error: {0}")]
    Csv(#[from] csv::Error),

    /// Steam Web API error
    #[error(transparent)]
    Steam(#[from] SteamApiError),

    /// Account not present in the record
    #[error("Account not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
