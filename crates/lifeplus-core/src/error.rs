//! Error types for the simulator.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A grid dimension that is not a positive integer.
    #[error("Invalid dimension: {name} must be a positive integer (got {value})")]
    InvalidDimension { name: &'static str, value: i64 },

    /// A grid whose dimensions or cell buffer do not agree.
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
