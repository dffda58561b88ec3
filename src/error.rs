//! Error types for `stagetimer`
//!
//! This module defines the error types shared by the API client, the admin
//! controller and the viewer, together with the operator-facing messages
//! shown when something goes wrong.
//!
//! Error variants use `#[source]` to preserve error chains so the log file
//! carries the full cause of a failure.

use thiserror::Error;

/// Simple error type for wrapping string messages while implementing `std::error::Error`
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StringError(pub String);

impl StringError {
    /// Create a new `StringError` from a string message
    pub fn new(msg: impl Into<String>) -> Box<Self> {
        Box::new(Self(msg.into()))
    }
}

/// Main error type for `stagetimer`
#[derive(Debug, Error)]
pub enum StageTimerError {
    /// The service could not be reached (connection refused, timeout, DNS)
    #[error("Network error or API call failed for {endpoint}: {message}")]
    Transport {
        /// Endpoint that was being called
        endpoint: String,
        /// Transport-level failure description
        message: String,
    },

    /// The service answered with a non-success HTTP status
    #[error("{endpoint} returned HTTP {status}: {message}")]
    HttpStatus {
        /// Endpoint that was being called
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// Service-provided error text, or the canonical status reason
        message: String,
    },

    /// The service answered successfully but the payload had an unexpected shape
    #[error("Unexpected response from {endpoint}: {source}")]
    InvalidResponse {
        /// Endpoint that was being called
        endpoint: String,
        /// Decoding failure
        #[source]
        source: serde_json::Error,
    },

    /// PIN rejected by client-side validation
    #[error("Invalid PIN: {0}")]
    InvalidPin(String),

    /// Timer identifier outside the fixed timer set
    #[error("Unknown timer id: {0}")]
    UnknownTimer(String),

    /// The service sent the client back to its login page
    #[error("Login rejected by the timer service")]
    LoginRejected,

    /// Configuration error
    /// Preserves the underlying error source for full error chain transparency
    #[error("Configuration error: {0}")]
    ConfigError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Terminal display error
    /// Preserves the underlying error source for full error chain transparency
    #[error("Display error: {0}")]
    DisplayError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for `stagetimer` operations
pub type Result<T> = std::result::Result<T, StageTimerError>;

/// Convert an error to a user-friendly message
///
/// Returns text suitable for an operator notice, including a short
/// troubleshooting hint where one exists.
pub fn get_user_friendly_error(error: &StageTimerError) -> String {
    match error {
        StageTimerError::Transport { endpoint, .. } => format!(
            "Could not reach the timer service ({endpoint}).\n\n\
             Please check:\n\
             - The service is running\n\
             - The --url setting points at it\n\
             - This machine can reach it over the network"
        ),
        StageTimerError::HttpStatus {
            endpoint,
            status,
            message,
        } => format!(
            "The timer service rejected the request to {endpoint} (HTTP {status}).\n\n\
             {message}"
        ),
        StageTimerError::InvalidResponse { endpoint, .. } => format!(
            "The timer service sent an unexpected response for {endpoint}.\n\n\
             The service may be a different version than this client expects."
        ),
        StageTimerError::InvalidPin(reason) => {
            format!("{reason}\n\nPINs are exactly 5 numerical digits.")
        }
        StageTimerError::UnknownTimer(id) => {
            format!("There is no timer \"{id}\".\n\nValid timers are 1 and 2.")
        }
        StageTimerError::LoginRejected => "The admin PIN was not accepted.\n\n\
             Check the PIN and try again."
            .to_string(),
        StageTimerError::ConfigError(_) => "Failed to load or save the client configuration.\n\n\
             Your settings may not persist.\n\
             Check that the config directory is writable."
            .to_string(),
        StageTimerError::DisplayError(e) => {
            format!("The terminal display failed:\n\n{e}")
        }
        StageTimerError::IoError(e) => {
            format!(
                "A file system error occurred:\n\n{e}\n\n\
                 Please check file permissions and paths."
            )
        }
        StageTimerError::JsonError(e) => {
            format!(
                "Configuration file is corrupted:\n\n{e}\n\n\
                 The client will use default settings."
            )
        }
    }
}
