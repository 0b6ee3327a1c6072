//! Layered error definitions
//!
//! Categorized by source: config / reduction / scheduling / sink

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum CollectorError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Reduction Errors =====
    /// Tick fired with no reduction bound
    #[error("no reduction bound for sensor '{sensor_id}'")]
    UnboundReduction { sensor_id: String },

    /// The bound reduction failed for the drained window
    #[error("reduction failed for sensor '{sensor_id}': {message}")]
    Reduction { sensor_id: String, message: String },

    // ===== Scheduling Errors =====
    /// The backing scheduling context cannot drive a timer
    #[error("scheduling unavailable: {message}")]
    SchedulingUnavailable { message: String },

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl CollectorError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create unbound-reduction error
    pub fn unbound_reduction(sensor_id: impl Into<String>) -> Self {
        Self::UnboundReduction {
            sensor_id: sensor_id.into(),
        }
    }

    /// Create reduction error
    pub fn reduction(sensor_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Reduction {
            sensor_id: sensor_id.into(),
            message: message.into(),
        }
    }

    /// Create scheduling-unavailable error
    pub fn scheduling_unavailable(message: impl Into<String>) -> Self {
        Self::SchedulingUnavailable {
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}

/// Failure returned by a user-supplied reduction function.
///
/// Carried inside [`CollectorError::Reduction`] once attributed to a
/// sensor; reduction closures themselves only know the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ReduceError {
    pub message: String,
}

impl ReduceError {
    /// Create a reduction failure with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
