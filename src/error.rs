//! Error types for the gateway client.

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur while building, signing or sending a gateway request.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Credentials or configuration are absent
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A mandatory field was not supplied
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    /// A field was supplied with a value of the wrong type
    #[error("{field} should be of type {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    /// A string field exceeds its maximum length in characters
    #[error("{field} must be less than or equal to {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// A field holds a value outside its allowed set
    #[error("{field} must be one of {}", .allowed.join(", "))]
    InvalidValue {
        field: &'static str,
        allowed: &'static [&'static str],
    },

    /// An authenticated endpoint was called on a client without credentials
    #[error("Missing authentication: this operation requires a secret key and an api key")]
    MissingAuthentication,

    /// The gateway answered with a non-success status
    #[error("API response error (status {status}): {body}")]
    ApiResponse { status: u16, body: String },

    /// The request could not be delivered
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response body or payload could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read a request file or write output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV output error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Command line is incomplete or names an unknown command
    #[error("Missing or invalid arguments. Usage: {0}")]
    Usage(&'static str),
}

impl GatewayError {
    /// Returns `true` for missing-field and out-of-bounds failures.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GatewayError::MissingField { .. }
                | GatewayError::TooLong { .. }
                | GatewayError::InvalidValue { .. }
        )
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}
