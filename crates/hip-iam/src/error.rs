//! Error types for identity service calls.

use thiserror::Error;

/// Error type for every provisioning operation.
#[derive(Debug, Error)]
pub enum IamError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Access token could not be obtained.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The identity service replied with an error status.
    #[error("API error: {status} - {body}")]
    Response {
        /// HTTP status code.
        status: u16,
        /// Response body as returned by the service.
        body: String,
    },

    /// The request was sent but no response arrived.
    #[error("no response: {0}")]
    NoResponse(String),

    /// The request could not be constructed or sent.
    #[error("request setup error: {0}")]
    Setup(String),

    /// A success response did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The group still has members and the service refused to delete it.
    #[error("group is not empty and cannot be deleted: {group}")]
    GroupNotEmpty {
        /// Group name.
        group: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IamError {
    /// Normalizes a transport error into one of the three failure kinds.
    ///
    /// `request` describes the call (method and URL) for the no-response case.
    pub fn from_transport(err: &reqwest::Error, request: &str) -> Self {
        if err.is_builder() {
            Self::Setup(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() {
            Self::NoResponse(format!("{request}: {err}"))
        } else {
            Self::Setup(err.to_string())
        }
    }

    /// Returns the HTTP status for `Response` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            Self::GroupNotEmpty { .. } => Some(409),
            _ => None,
        }
    }
}

/// Result type for provisioning operations.
pub type IamResult<T> = Result<T, IamError>;
