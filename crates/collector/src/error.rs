//! Collector error types

use thiserror::Error;

/// Collector-specific errors
#[derive(Debug, Error)]
pub enum CollectError {
    /// Sink creation error
    #[error("failed to create sink '{name}': {message}")]
    SinkCreation { name: String, message: String },

    /// Sink error (from contract)
    #[error("sink error: {0}")]
    Contract(#[from] contracts::CollectorError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CollectError {
    /// Create a sink creation error
    pub fn sink_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
