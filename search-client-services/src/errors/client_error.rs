//! Client-level error types.
//!
//! This module defines the errors surfaced by `IndexService` and
//! `DocumentService`. Validation and schema errors are raised before any
//! network call; engine errors wrap whole-operation failures reported by the
//! engine handle.

use std::time::Duration;

use search_client_shared::SchemaError;
use thiserror::Error;

use super::EngineError;

/// Errors surfaced by the index and document services.
#[derive(Debug, Clone, Error)]
pub enum SearchClientError {
    /// Input rejected before any network call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Batch size exceeds the configured maximum.
    #[error("Batch size {provided} exceeds maximum {max}")]
    BatchTooLarge { provided: usize, max: usize },

    /// The schema failed validation.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The engine reported a whole-operation failure.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// The operation did not complete within the configured timeout.
    #[error("Operation timed out after {timeout:?}")]
    Timeout { timeout: Duration },
}

impl SearchClientError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a batch size exceeded error.
    pub fn batch_too_large(provided: usize, max: usize) -> Self {
        Self::BatchTooLarge { provided, max }
    }

    /// Create a timeout error.
    pub fn timeout(timeout: Duration) -> Self {
        Self::Timeout { timeout }
    }
}
