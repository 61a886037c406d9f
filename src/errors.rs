//! Structured error handling for the logspool crate
//!
//! One enum covers the failure categories of the event pipeline: bad
//! configuration, malformed DSN credentials, serialization of outgoing
//! events, and filesystem I/O in the transport.

use thiserror::Error;

/// Main error type for the event pipeline
#[derive(Error, Debug)]
pub enum SpoolError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid DSN: {message}")]
    Dsn { message: String },

    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

/// Type alias for Result with SpoolError
pub type SpoolResult<T> = Result<T, SpoolError>;

impl SpoolError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a DSN parsing error
    pub fn dsn(message: impl Into<String>) -> Self {
        Self::Dsn {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Create an I/O error with operation context
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_carry_context() {
        let err = SpoolError::io(
            "writing event file",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("writing event file"));

        let err = SpoolError::dsn("missing secret key");
        assert!(err.to_string().contains("missing secret key"));
    }
}
