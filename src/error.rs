// src/error.rs
use std::io;
use thiserror::Error;

/// Result type for sink operations
pub type Result<T> = std::result::Result<T, SinkError>;

/// Custom Error type for the loadsink library
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Provisioning error: {0}")]
    Provisioning(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Backend rejected write: {0}")]
    Backend(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Channel error: {0}")]
    Channel(String),
}

impl From<reqwest::Error> for SinkError {
    fn from(err: reqwest::Error) -> Self {
        SinkError::Transport(err.to_string())
    }
}
