//! Error types for the rcpt-core library.
//!
//! Field extraction itself never fails; these cover the fallible edges
//! around it (configuration files and the remote refinement contract).

use thiserror::Error;

/// Main error type for the rcpt library.
#[derive(Error, Debug)]
pub enum RcptError {
    /// Remote refinement error.
    #[error("refinement error: {0}")]
    Refinement(#[from] RefinementError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to the remote refinement collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefinementError {
    /// No usable API credential was configured.
    #[error("refinement API key is not configured")]
    NotConfigured,

    /// The service answered with a non-success status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The request could not be sent or the response could not be read.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The response carried no message content.
    #[error("no content in response")]
    NoContent,

    /// The message content was not the expected JSON object.
    #[error("failed to parse JSON response: {0}")]
    InvalidJson(String),
}

/// Result type for the rcpt library.
pub type Result<T> = std::result::Result<T, RcptError>;
