//! Error types for the CLI

use calcpad::config::ConfigError;
use calcpad::core::CalcError;
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The expression given to `eval` did not produce a number
    #[error("Evaluation failed for `{expression}`: {source}")]
    Evaluation {
        /// Expression as given on the command line
        expression: String,
        /// Underlying calculator error
        source: CalcError,
    },

    /// Logging could not be set up
    #[error("Logging setup failed: {message}")]
    Logging {
        /// Error message
        message: String,
    },

    /// JSON output could not be produced
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create an evaluation error
    #[must_use]
    pub fn evaluation(expression: impl Into<String>, source: CalcError) -> Self {
        Self::Evaluation {
            expression: expression.into(),
            source,
        }
    }

    /// Create a logging error
    #[must_use]
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_error() {
        let err = CliError::evaluation("2+", CalcError::parse("unexpected end of expression"));
        let msg = err.to_string();
        assert!(msg.contains("Evaluation failed"));
        assert!(msg.contains("`2+`"));
        assert!(msg.contains("unexpected end of expression"));
    }

    #[test]
    fn test_evaluation_error_source() {
        use std::error::Error as _;
        let err = CliError::evaluation("1/0", CalcError::DivisionByZero);
        assert_eq!(err.source().unwrap().to_string(), "division by zero");
    }

    #[test]
    fn test_config_error_from() {
        let err: CliError = ConfigError::InvalidValue {
            field: "error_text",
            value: String::new(),
        }
        .into();
        assert!(err.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CliError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_logging_error() {
        let err = CliError::logging("already initialized");
        assert!(err.to_string().contains("Logging setup failed"));
    }
}
