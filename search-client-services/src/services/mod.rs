//! Index and document services.
//!
//! Both services validate inputs before any network call, acquire a fresh
//! scoped handle per operation through the resolver, and bound every engine
//! call by the configured timeout.

mod document_service;
mod index_service;

pub use document_service::DocumentService;
pub use index_service::IndexService;

use std::future::Future;
use std::time::Duration;

use crate::errors::{EngineError, SearchClientError};

/// Run one engine call under the configured timeout.
///
/// Expiry surfaces as `SearchClientError::Timeout`, distinct from failures
/// the engine itself reported.
async fn bounded<T, F>(timeout: Option<Duration>, call: F) -> Result<T, SearchClientError>
where
    F: Future<Output = Result<T, EngineError>>,
{
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result.map_err(SearchClientError::from),
            Err(_) => Err(SearchClientError::timeout(limit)),
        },
        None => call.await.map_err(SearchClientError::from),
    }
}

fn require_index_name(name: &str) -> Result<(), SearchClientError> {
    if name.trim().is_empty() {
        return Err(SearchClientError::validation("Index name cannot be empty"));
    }
    Ok(())
}
