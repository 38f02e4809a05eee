//! Error types for Nova

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Simulated transient failure (insight generation)
    #[error("{0}")]
    Transient(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Task error: {0}")]
    Task(String),
}

impl Error {
    /// Input was rejected before any state was touched
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }

    /// The caller may re-run the identical operation
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
