//! Document mutation and retrieval service.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::errors::SearchClientError;
use crate::interfaces::ScopeResolver;
use crate::types::{BatchOutcome, DocumentBatch, SearchHit, SearchRequest};
use search_client_shared::{Document, IndexSchema};

use super::{bounded, require_index_name};

/// Performs batched document mutations and read operations against one
/// index at a time.
///
/// Mutations take the target schema: it supplies the index name and the key
/// designation needed for pre-flight validation, and they run under the
/// admin scope. Reads take the index name and run under the query scope.
/// Every batch operation returns a [`BatchOutcome`]; item-level failures
/// never disturb sibling items and never become an `Err`.
pub struct DocumentService {
    resolver: Arc<dyn ScopeResolver>,
    config: ClientConfig,
}

impl DocumentService {
    /// Create a service with default configuration.
    pub fn new(resolver: Arc<dyn ScopeResolver>) -> Self {
        Self::with_config(resolver, ClientConfig::default())
    }

    /// Create a service with custom configuration.
    pub fn with_config(resolver: Arc<dyn ScopeResolver>, config: ClientConfig) -> Self {
        Self { resolver, config }
    }

    /// Check if batch size exceeds the configured limit.
    fn validate_batch_size(&self, size: usize) -> Result<(), SearchClientError> {
        if let Some(max) = self.config.max_batch_size {
            if size > max {
                return Err(SearchClientError::batch_too_large(size, max));
            }
        }
        Ok(())
    }

    /// Upload documents strictly. A key that already exists in the index is
    /// a per-item conflict failure.
    pub async fn create(
        &self,
        schema: &IndexSchema,
        documents: Vec<Document>,
    ) -> Result<BatchOutcome, SearchClientError> {
        self.run_batch(schema, DocumentBatch::upload(documents)).await
    }

    /// Merge submitted fields onto existing documents. An absent key is a
    /// per-item failure and never creates the document.
    pub async fn update(
        &self,
        schema: &IndexSchema,
        documents: Vec<Document>,
    ) -> Result<BatchOutcome, SearchClientError> {
        self.run_batch(schema, DocumentBatch::merge(documents)).await
    }

    /// Merge when the key is present, create when it is absent.
    pub async fn upsert(
        &self,
        schema: &IndexSchema,
        documents: Vec<Document>,
    ) -> Result<BatchOutcome, SearchClientError> {
        self.run_batch(schema, DocumentBatch::merge_or_upload(documents))
            .await
    }

    /// Delete documents by key. Absent keys are per-item successes.
    pub async fn delete(
        &self,
        schema: &IndexSchema,
        keys: Vec<String>,
    ) -> Result<BatchOutcome, SearchClientError> {
        self.run_batch(schema, DocumentBatch::delete(keys)).await
    }

    /// Fetch one document by key, or `None` when absent.
    ///
    /// A non-empty `select` narrows the returned fields; otherwise all
    /// retrievable fields are returned.
    #[instrument(skip(self, select))]
    pub async fn get_by_key(
        &self,
        index: &str,
        key: &str,
        select: &[String],
    ) -> Result<Option<Document>, SearchClientError> {
        require_index_name(index)?;
        if key.trim().is_empty() {
            return Err(SearchClientError::validation("Document key cannot be empty"));
        }
        let handle = self.resolver.query_scope();
        bounded(
            self.config.operation_timeout,
            handle.fetch_document(index, key, select),
        )
        .await
    }

    /// Run a search query, returning hits in engine relevance order.
    #[instrument(skip(self, request))]
    pub async fn search(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<Vec<SearchHit>, SearchClientError> {
        require_index_name(index)?;
        let handle = self.resolver.query_scope();
        let hits = bounded(self.config.operation_timeout, handle.query(index, request)).await?;
        debug!(index = %index, hits = hits.len(), "Search completed");
        Ok(hits)
    }

    #[instrument(
        skip(self, schema, batch),
        fields(index = %schema.name, kind = %batch.kind(), count = batch.len())
    )]
    async fn run_batch(
        &self,
        schema: &IndexSchema,
        batch: DocumentBatch,
    ) -> Result<BatchOutcome, SearchClientError> {
        if batch.is_empty() {
            return Ok(BatchOutcome::new());
        }
        self.validate_batch_size(batch.len())?;
        let key_field = schema.validate()?;

        // Every item must carry a usable key before anything goes out;
        // without one there is no key to attribute a per-item failure to.
        for key in batch.keys() {
            if key.trim().is_empty() {
                return Err(SearchClientError::validation("Delete keys cannot be empty"));
            }
        }
        for (position, document) in batch.documents().iter().enumerate() {
            match document.key_value(&key_field.name) {
                Some(key) if !key.trim().is_empty() => {}
                _ => {
                    return Err(SearchClientError::validation(format!(
                        "Document at position {} has no text value for key field '{}'",
                        position, key_field.name
                    )));
                }
            }
        }

        let handle = self.resolver.admin_scope();
        let outcome = bounded(
            self.config.operation_timeout,
            handle.submit_batch(&schema.name, &batch),
        )
        .await?;

        if outcome.is_complete_success() {
            debug!(index = %schema.name, kind = %batch.kind(), count = outcome.total(), "Batch applied");
        } else {
            warn!(
                index = %schema.name,
                kind = %batch.kind(),
                failed = outcome.failures.len(),
                total = outcome.total(),
                "Batch applied with item failures"
            );
        }
        Ok(outcome)
    }
}
