//! Engine-level error types.
//!
//! This module defines the errors an engine handle can report for a whole
//! operation. Absence is never an error here: lookups surface it as `None`
//! or `false`, and per-item batch failures travel inside `BatchOutcome`.

use thiserror::Error;

/// Errors reported by an engine handle for a whole operation.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Failed to reach the search service.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service rejected the scope's credential.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The service rejected the request as malformed.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The service failed with an unexpected status.
    #[error("Service error (status {status}): {message}")]
    Service { status: u16, message: String },

    /// A response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl EngineError {
    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an unauthorized error.
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Create a bad request error.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    /// Create a service error from a status code and message.
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
        }
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}
