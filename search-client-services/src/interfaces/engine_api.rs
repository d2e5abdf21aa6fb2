//! Engine API trait definition.
//!
//! This module defines the abstract interface one scoped engine handle
//! exposes, allowing for different backend implementations (REST, in-memory).

use async_trait::async_trait;

use crate::errors::EngineError;
use crate::types::{BatchOutcome, DocumentBatch, SearchHit, SearchRequest};
use search_client_shared::{Document, IndexSchema};

/// One scoped handle onto the remote search engine.
///
/// A handle is created fresh per logical operation by a
/// [`crate::interfaces::ScopeResolver`] and dropped when the operation ends.
/// It carries the scope's credential but no mutable cross-request state; the
/// underlying transport may be shared between handles.
///
/// Absence is not an error at this boundary: lookups return `Option` or
/// `bool`, and per-item batch failures travel inside [`BatchOutcome`]. An
/// `Err(EngineError)` always means the whole operation failed.
#[async_trait]
pub trait EngineApi: Send + Sync {
    /// Create the named index or replace its field definitions.
    ///
    /// # Arguments
    ///
    /// * `schema` - The schema to apply, already validated by the caller
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was created or updated
    /// * `Err(EngineError)` - If the operation fails
    async fn apply_index(&self, schema: &IndexSchema) -> Result<(), EngineError>;

    /// Fetch the schema of the named index.
    ///
    /// # Arguments
    ///
    /// * `name` - The index name
    ///
    /// # Returns
    ///
    /// * `Ok(Some(schema))` - If the index exists
    /// * `Ok(None)` - If the engine reports the index absent
    /// * `Err(EngineError)` - If the operation fails
    async fn fetch_index(&self, name: &str) -> Result<Option<IndexSchema>, EngineError>;

    /// List the schemas of all indexes on the service.
    ///
    /// Ordering is whatever the engine returns and is not guaranteed stable.
    async fn list_indexes(&self) -> Result<Vec<IndexSchema>, EngineError>;

    /// Delete the named index.
    ///
    /// # Arguments
    ///
    /// * `name` - The index name
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the index existed and was removed
    /// * `Ok(false)` - If the index was already absent
    /// * `Err(EngineError)` - If the operation fails
    async fn delete_index(&self, name: &str) -> Result<bool, EngineError>;

    /// Submit a document batch against the named index.
    ///
    /// # Arguments
    ///
    /// * `index` - The target index name
    /// * `batch` - The batch of mutations to apply
    ///
    /// # Returns
    ///
    /// * `Ok(BatchOutcome)` - Per-item results, including per-item failures
    /// * `Err(EngineError)` - If the batch failed to reach the engine at all
    async fn submit_batch(
        &self,
        index: &str,
        batch: &DocumentBatch,
    ) -> Result<BatchOutcome, EngineError>;

    /// Fetch a single document by key.
    ///
    /// # Arguments
    ///
    /// * `index` - The index name
    /// * `key` - The document key value
    /// * `select` - Field names to return; empty selects all retrievable fields
    ///
    /// # Returns
    ///
    /// * `Ok(Some(document))` - If the key exists
    /// * `Ok(None)` - If the key is absent
    /// * `Err(EngineError)` - If the operation fails
    async fn fetch_document(
        &self,
        index: &str,
        key: &str,
        select: &[String],
    ) -> Result<Option<Document>, EngineError>;

    /// Run a search query against the named index.
    ///
    /// # Arguments
    ///
    /// * `index` - The index name
    /// * `request` - Query text, optional filter and scoring profile
    ///
    /// # Returns
    ///
    /// * `Ok(hits)` - Matches in engine relevance order with scores attached
    /// * `Err(EngineError)` - If the operation fails
    async fn query(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<Vec<SearchHit>, EngineError>;
}
