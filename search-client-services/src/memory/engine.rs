//! In-process engine implementation.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::credentials::Scope;
use crate::errors::EngineError;
use crate::interfaces::{EngineApi, ScopeResolver};
use crate::types::{BatchKind, BatchOutcome, DocumentBatch, SearchHit, SearchRequest};
use search_client_shared::{Document, FieldValue, IndexSchema};

use super::filter::FilterExpr;

/// An engine that keeps indexes and documents in process-local state.
///
/// Implements the full engine contract so services can run without a remote
/// search service: strict uploads, field-wise merges, idempotent deletes,
/// match-all-terms text search and the minimal filter language. Query-scoped
/// handles are rejected for every management and mutation call. Scoring
/// counts term occurrences; scoring profiles are accepted and ignored.
pub struct MemoryEngine {
    state: Arc<Mutex<EngineState>>,
}

impl MemoryEngine {
    /// Create an engine with no indexes.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(EngineState::default())),
        }
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeResolver for MemoryEngine {
    fn admin_scope(&self) -> Box<dyn EngineApi> {
        Box::new(MemoryHandle {
            state: Arc::clone(&self.state),
            scope: Scope::Admin,
        })
    }

    fn query_scope(&self) -> Box<dyn EngineApi> {
        Box::new(MemoryHandle {
            state: Arc::clone(&self.state),
            scope: Scope::Query,
        })
    }
}

#[derive(Default)]
struct EngineState {
    indexes: BTreeMap<String, StoredIndex>,
}

struct StoredIndex {
    schema: IndexSchema,
    documents: BTreeMap<String, Document>,
}

impl StoredIndex {
    fn delete_keys(&mut self, keys: &[String]) -> BatchOutcome {
        let mut outcome = BatchOutcome::new();
        for key in keys {
            self.documents.remove(key);
            outcome.record_success(key.clone());
        }
        outcome
    }

    fn upload_documents(
        &mut self,
        key_field: &str,
        documents: &[Document],
    ) -> Result<BatchOutcome, EngineError> {
        let mut outcome = BatchOutcome::new();
        for document in documents {
            let key = document_key(key_field, document)?;
            if let Some(message) = document_violation(&self.schema, document) {
                outcome.record_failure(key, 400, message);
                continue;
            }
            if self.documents.contains_key(&key) {
                outcome.record_failure(key, 409, "A document with this key already exists");
            } else {
                self.documents.insert(key.clone(), document.clone());
                outcome.record_success(key);
            }
        }
        Ok(outcome)
    }

    fn merge_documents(
        &mut self,
        key_field: &str,
        documents: &[Document],
        upload_when_absent: bool,
    ) -> Result<BatchOutcome, EngineError> {
        let mut outcome = BatchOutcome::new();
        for document in documents {
            let key = document_key(key_field, document)?;
            if let Some(message) = document_violation(&self.schema, document) {
                outcome.record_failure(key, 400, message);
                continue;
            }
            match self.documents.get_mut(&key) {
                Some(existing) => {
                    for (name, value) in document.fields() {
                        existing.set(name, value.clone());
                    }
                    outcome.record_success(key);
                }
                None if upload_when_absent => {
                    self.documents.insert(key.clone(), document.clone());
                    outcome.record_success(key);
                }
                None => {
                    outcome.record_failure(key, 404, "Merge target not found");
                }
            }
        }
        Ok(outcome)
    }
}

struct MemoryHandle {
    state: Arc<Mutex<EngineState>>,
    scope: Scope,
}

impl MemoryHandle {
    fn require_admin(&self, operation: &str) -> Result<(), EngineError> {
        if self.scope != Scope::Admin {
            return Err(EngineError::unauthorized(format!(
                "{} requires the admin scope",
                operation
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl EngineApi for MemoryHandle {
    async fn apply_index(&self, schema: &IndexSchema) -> Result<(), EngineError> {
        self.require_admin("apply_index")?;
        let mut state = self.state.lock().await;
        match state.indexes.entry(schema.name.clone()) {
            Entry::Occupied(mut entry) => {
                // Replace the field definitions, keep the stored documents.
                entry.get_mut().schema = schema.clone();
            }
            Entry::Vacant(entry) => {
                entry.insert(StoredIndex {
                    schema: schema.clone(),
                    documents: BTreeMap::new(),
                });
            }
        }
        Ok(())
    }

    async fn fetch_index(&self, name: &str) -> Result<Option<IndexSchema>, EngineError> {
        self.require_admin("fetch_index")?;
        let state = self.state.lock().await;
        Ok(state.indexes.get(name).map(|stored| stored.schema.clone()))
    }

    async fn list_indexes(&self) -> Result<Vec<IndexSchema>, EngineError> {
        self.require_admin("list_indexes")?;
        let state = self.state.lock().await;
        Ok(state
            .indexes
            .values()
            .map(|stored| stored.schema.clone())
            .collect())
    }

    async fn delete_index(&self, name: &str) -> Result<bool, EngineError> {
        self.require_admin("delete_index")?;
        let mut state = self.state.lock().await;
        Ok(state.indexes.remove(name).is_some())
    }

    async fn submit_batch(
        &self,
        index: &str,
        batch: &DocumentBatch,
    ) -> Result<BatchOutcome, EngineError> {
        self.require_admin("submit_batch")?;
        let mut state = self.state.lock().await;
        let stored = state
            .indexes
            .get_mut(index)
            .ok_or_else(|| EngineError::service(404, format!("Index '{}' does not exist", index)))?;

        match batch.kind() {
            BatchKind::Delete => Ok(stored.delete_keys(batch.keys())),
            BatchKind::Upload | BatchKind::Merge | BatchKind::MergeOrUpload => {
                let key_field = stored
                    .schema
                    .key_field()
                    .map(|field| field.name.clone())
                    .ok_or_else(|| {
                        EngineError::bad_request(format!("Index '{}' has no key field", index))
                    })?;
                match batch.kind() {
                    BatchKind::Merge => {
                        stored.merge_documents(&key_field, batch.documents(), false)
                    }
                    BatchKind::MergeOrUpload => {
                        stored.merge_documents(&key_field, batch.documents(), true)
                    }
                    _ => stored.upload_documents(&key_field, batch.documents()),
                }
            }
        }
    }

    async fn fetch_document(
        &self,
        index: &str,
        key: &str,
        select: &[String],
    ) -> Result<Option<Document>, EngineError> {
        let state = self.state.lock().await;
        let stored = match state.indexes.get(index) {
            Some(stored) => stored,
            None => return Ok(None),
        };
        let document = match stored.documents.get(key) {
            Some(document) => document,
            None => return Ok(None),
        };
        let names = projection_names(&stored.schema, select);
        Ok(Some(document.project(&names)))
    }

    async fn query(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<Vec<SearchHit>, EngineError> {
        let state = self.state.lock().await;
        let stored = state
            .indexes
            .get(index)
            .ok_or_else(|| EngineError::service(404, format!("Index '{}' does not exist", index)))?;

        let filter = match &request.filter {
            Some(expression) => {
                let parsed = FilterExpr::parse(expression).map_err(EngineError::bad_request)?;
                parsed
                    .validate(&stored.schema)
                    .map_err(EngineError::bad_request)?;
                Some(parsed)
            }
            None => None,
        };

        let terms: Vec<String> = tokenize_text(&request.text).collect();
        let retrievable = projection_names(&stored.schema, &[]);

        let mut matched: Vec<(f64, &String, &Document)> = Vec::new();
        for (key, document) in &stored.documents {
            if let Some(filter) = &filter {
                if !filter.matches(document) {
                    continue;
                }
            }
            if let Some(score) = text_score(&stored.schema, document, &terms) {
                matched.push((score, key, document));
            }
        }

        matched.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.cmp(b.1))
        });

        Ok(matched
            .into_iter()
            .map(|(score, _, document)| SearchHit {
                score,
                document: document.project(&retrievable),
            })
            .collect())
    }
}

fn document_key(key_field: &str, document: &Document) -> Result<String, EngineError> {
    document
        .key_value(key_field)
        .map(|key| key.to_string())
        .ok_or_else(|| {
            EngineError::bad_request(format!(
                "Document is missing a text value for key field '{}'",
                key_field
            ))
        })
}

fn document_violation(schema: &IndexSchema, document: &Document) -> Option<String> {
    for (name, value) in document.fields() {
        let field = match schema.field(name) {
            Some(field) => field,
            None => return Some(format!("Unknown field '{}'", name)),
        };
        if !value.fits_kind(field.kind) {
            return Some(format!("Field '{}' expects kind {}", name, field.kind));
        }
    }
    None
}

fn projection_names(schema: &IndexSchema, select: &[String]) -> Vec<String> {
    if select.is_empty() {
        schema
            .fields
            .iter()
            .filter(|field| field.retrievable)
            .map(|field| field.name.clone())
            .collect()
    } else {
        select
            .iter()
            .filter(|name| schema.field(name).map_or(false, |field| field.retrievable))
            .cloned()
            .collect()
    }
}

/// Score a document against the query terms, or `None` when a term is absent.
///
/// Every term must occur in some searchable field; the score is the total
/// number of term occurrences. No terms matches every document at score 1.
fn text_score(schema: &IndexSchema, document: &Document, terms: &[String]) -> Option<f64> {
    if terms.is_empty() {
        return Some(1.0);
    }

    let mut tokens: Vec<String> = Vec::new();
    for field in schema.fields.iter().filter(|field| field.searchable) {
        if let Some(value) = document.get(&field.name) {
            collect_tokens(value, &mut tokens);
        }
    }

    let mut score = 0.0;
    for term in terms {
        let occurrences = tokens.iter().filter(|token| *token == term).count();
        if occurrences == 0 {
            return None;
        }
        score += occurrences as f64;
    }
    Some(score)
}

fn collect_tokens(value: &FieldValue, out: &mut Vec<String>) {
    match value {
        FieldValue::Text(text) => out.extend(tokenize_text(text)),
        FieldValue::TextList(items) => {
            for item in items {
                out.extend(tokenize_text(item));
            }
        }
        _ => {}
    }
}

fn tokenize_text(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_client_shared::{FieldDefinition, FieldKind};

    fn sample_schema() -> IndexSchema {
        IndexSchema::new("documents")
            .with_field(FieldDefinition::new("id", FieldKind::String).key().filterable())
            .with_field(
                FieldDefinition::new("type", FieldKind::String)
                    .searchable()
                    .filterable()
                    .sortable()
                    .facetable(),
            )
            .with_field(FieldDefinition::new("title", FieldKind::String).searchable())
            .with_field(FieldDefinition::new("views", FieldKind::Int64).filterable())
            .with_field(FieldDefinition::new("secret", FieldKind::String).hidden())
    }

    fn doc(id: &str, kind: &str, title: &str) -> Document {
        Document::builder()
            .add_text("id", id)
            .add_text("type", kind)
            .add_text("title", title)
            .build()
    }

    async fn engine_with_index() -> MemoryEngine {
        let engine = MemoryEngine::new();
        engine
            .admin_scope()
            .apply_index(&sample_schema())
            .await
            .unwrap();
        engine
    }

    #[tokio::test]
    async fn test_query_scope_rejected_for_management_and_mutation() {
        let engine = engine_with_index().await;
        let query = engine.query_scope();

        let result = query.apply_index(&sample_schema()).await;
        assert!(matches!(result, Err(EngineError::Unauthorized(_))));

        let result = query.delete_index("documents").await;
        assert!(matches!(result, Err(EngineError::Unauthorized(_))));

        let result = query.fetch_index("documents").await;
        assert!(matches!(result, Err(EngineError::Unauthorized(_))));

        let result = query.list_indexes().await;
        assert!(matches!(result, Err(EngineError::Unauthorized(_))));

        let batch = DocumentBatch::upload(vec![doc("1", "json", "One")]);
        let result = query.submit_batch("documents", &batch).await;
        assert!(matches!(result, Err(EngineError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_query_scope_allowed_for_reads() {
        let engine = engine_with_index().await;
        let admin = engine.admin_scope();
        let batch = DocumentBatch::upload(vec![doc("1", "json", "One")]);
        admin.submit_batch("documents", &batch).await.unwrap();

        let query = engine.query_scope();
        let fetched = query
            .fetch_document("documents", "1", &[])
            .await
            .unwrap();
        assert!(fetched.is_some());

        let hits = query
            .query("documents", &SearchRequest::new(""))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_apply_index_replaces_schema_and_keeps_documents() {
        let engine = engine_with_index().await;
        let admin = engine.admin_scope();
        let batch = DocumentBatch::upload(vec![doc("1", "json", "One")]);
        admin.submit_batch("documents", &batch).await.unwrap();

        let mut changed = sample_schema();
        changed.fields.push(FieldDefinition::new("extra", FieldKind::String));
        admin.apply_index(&changed).await.unwrap();

        let fetched = admin.fetch_index("documents").await.unwrap().unwrap();
        assert!(fetched.field("extra").is_some());
        assert!(admin
            .fetch_document("documents", "1", &[])
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_delete_index_reports_existence() {
        let engine = engine_with_index().await;
        let admin = engine.admin_scope();
        assert!(admin.delete_index("documents").await.unwrap());
        assert!(!admin.delete_index("documents").await.unwrap());
        assert!(admin.fetch_index("documents").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upload_conflict_is_per_item() {
        let engine = engine_with_index().await;
        let admin = engine.admin_scope();

        let batch = DocumentBatch::upload(vec![doc("1", "json", "One")]);
        let outcome = admin.submit_batch("documents", &batch).await.unwrap();
        assert!(outcome.is_complete_success());

        let batch = DocumentBatch::upload(vec![doc("1", "json", "Again"), doc("2", "xml", "Two")]);
        let outcome = admin.submit_batch("documents", &batch).await.unwrap();
        assert_eq!(outcome.failure("1").map(|f| f.status), Some(409));
        assert!(outcome.succeeded.contains("2"));

        // The conflicting upload must not overwrite the original.
        let fetched = admin
            .fetch_document("documents", "1", &[])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.get("title").and_then(FieldValue::as_text), Some("One"));
    }

    #[tokio::test]
    async fn test_merge_absent_key_fails_without_creating() {
        let engine = engine_with_index().await;
        let admin = engine.admin_scope();

        let batch = DocumentBatch::merge(vec![doc("9", "json", "Ghost")]);
        let outcome = admin.submit_batch("documents", &batch).await.unwrap();
        assert_eq!(outcome.failure("9").map(|f| f.status), Some(404));
        assert!(admin
            .fetch_document("documents", "9", &[])
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_merge_preserves_unsubmitted_fields() {
        let engine = engine_with_index().await;
        let admin = engine.admin_scope();

        let batch = DocumentBatch::upload(vec![doc("1", "json", "One")]);
        admin.submit_batch("documents", &batch).await.unwrap();

        let partial = Document::builder().add_text("id", "1").add_text("type", "xml").build();
        let batch = DocumentBatch::merge(vec![partial]);
        let outcome = admin.submit_batch("documents", &batch).await.unwrap();
        assert!(outcome.is_complete_success());

        let fetched = admin
            .fetch_document("documents", "1", &[])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.get("type").and_then(FieldValue::as_text), Some("xml"));
        assert_eq!(fetched.get("title").and_then(FieldValue::as_text), Some("One"));
    }

    #[tokio::test]
    async fn test_merge_or_upload_creates_and_merges() {
        let engine = engine_with_index().await;
        let admin = engine.admin_scope();

        let batch = DocumentBatch::merge_or_upload(vec![doc("1", "json", "One")]);
        let outcome = admin.submit_batch("documents", &batch).await.unwrap();
        assert!(outcome.succeeded.contains("1"));

        let partial = Document::builder().add_text("id", "1").add_text("type", "xml").build();
        let batch = DocumentBatch::merge_or_upload(vec![partial, doc("2", "json", "Two")]);
        let outcome = admin.submit_batch("documents", &batch).await.unwrap();
        assert!(outcome.is_complete_success());
        assert_eq!(outcome.total(), 2);

        let fetched = admin
            .fetch_document("documents", "1", &[])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.get("type").and_then(FieldValue::as_text), Some("xml"));
        assert_eq!(fetched.get("title").and_then(FieldValue::as_text), Some("One"));
    }

    #[tokio::test]
    async fn test_delete_absent_key_succeeds() {
        let engine = engine_with_index().await;
        let admin = engine.admin_scope();

        let batch = DocumentBatch::delete(vec!["404".to_string()]);
        let outcome = admin.submit_batch("documents", &batch).await.unwrap();
        assert!(outcome.succeeded.contains("404"));
        assert!(outcome.is_complete_success());
    }

    #[tokio::test]
    async fn test_unknown_field_is_per_item_failure() {
        let engine = engine_with_index().await;
        let admin = engine.admin_scope();

        let stray = Document::builder().add_text("id", "1").add_text("bogus", "x").build();
        let batch = DocumentBatch::upload(vec![stray, doc("2", "xml", "Two")]);
        let outcome = admin.submit_batch("documents", &batch).await.unwrap();

        let failure = outcome.failure("1").unwrap();
        assert_eq!(failure.status, 400);
        assert!(failure.message.contains("bogus"));
        assert!(outcome.succeeded.contains("2"));
    }

    #[tokio::test]
    async fn test_wrong_kind_is_per_item_failure() {
        let engine = engine_with_index().await;
        let admin = engine.admin_scope();

        let wrong = Document::builder().add_text("id", "1").add_text("views", "many").build();
        let batch = DocumentBatch::upload(vec![wrong]);
        let outcome = admin.submit_batch("documents", &batch).await.unwrap();

        let failure = outcome.failure("1").unwrap();
        assert_eq!(failure.status, 400);
        assert!(failure.message.contains("views"));
    }

    #[tokio::test]
    async fn test_batch_against_absent_index_is_operation_error() {
        let engine = MemoryEngine::new();
        let admin = engine.admin_scope();

        let batch = DocumentBatch::upload(vec![doc("1", "json", "One")]);
        let result = admin.submit_batch("missing", &batch).await;
        assert!(matches!(result, Err(EngineError::Service { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_fetch_document_projection_and_hidden_mask() {
        let engine = engine_with_index().await;
        let admin = engine.admin_scope();

        let full = Document::builder()
            .add_text("id", "1")
            .add_text("type", "json")
            .add_text("title", "One")
            .add_text("secret", "classified")
            .build();
        admin
            .submit_batch("documents", &DocumentBatch::upload(vec![full]))
            .await
            .unwrap();

        // Default projection excludes hidden fields.
        let fetched = admin
            .fetch_document("documents", "1", &[])
            .await
            .unwrap()
            .unwrap();
        assert!(!fetched.contains("secret"));
        assert!(fetched.contains("title"));

        // Explicit select narrows further and still masks hidden fields.
        let select = vec!["title".to_string(), "secret".to_string()];
        let fetched = admin
            .fetch_document("documents", "1", &select)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.len(), 1);
        assert!(fetched.contains("title"));
    }

    #[tokio::test]
    async fn test_fetch_document_absent_returns_none() {
        let engine = engine_with_index().await;
        let admin = engine.admin_scope();
        assert!(admin
            .fetch_document("documents", "missing", &[])
            .await
            .unwrap()
            .is_none());
        assert!(admin
            .fetch_document("no-such-index", "1", &[])
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_query_matches_all_terms_case_insensitively() {
        let engine = engine_with_index().await;
        let admin = engine.admin_scope();
        let batch = DocumentBatch::upload(vec![
            doc("1", "json", "Getting Started Guide"),
            doc("2", "xml", "Advanced Guide"),
        ]);
        admin.submit_batch("documents", &batch).await.unwrap();

        let hits = admin
            .query("documents", &SearchRequest::new("guide getting"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(
            hits[0].document.get("id").and_then(FieldValue::as_text),
            Some("1")
        );

        let hits = admin
            .query("documents", &SearchRequest::new("GUIDE"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_query_match_all_star_matches_everything() {
        let engine = engine_with_index().await;
        let admin = engine.admin_scope();
        let batch = DocumentBatch::upload(vec![doc("1", "json", "One"), doc("2", "xml", "Two")]);
        admin.submit_batch("documents", &batch).await.unwrap();

        let hits = admin
            .query("documents", &SearchRequest::new("*"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|hit| hit.score > 0.0));
    }

    #[tokio::test]
    async fn test_query_filter_combines_with_text() {
        let engine = engine_with_index().await;
        let admin = engine.admin_scope();
        let batch = DocumentBatch::upload(vec![
            doc("1", "json", "Guide"),
            doc("2", "xml", "Guide"),
        ]);
        admin.submit_batch("documents", &batch).await.unwrap();

        let request = SearchRequest::new("guide").with_filter("type eq 'json'");
        let hits = admin.query("documents", &request).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(
            hits[0].document.get("type").and_then(FieldValue::as_text),
            Some("json")
        );
    }

    #[tokio::test]
    async fn test_query_rejects_bad_filters() {
        let engine = engine_with_index().await;
        let admin = engine.admin_scope();

        let request = SearchRequest::new("").with_filter("type gt 'json'");
        let result = admin.query("documents", &request).await;
        assert!(matches!(result, Err(EngineError::BadRequest(_))));

        // title is searchable but not filterable
        let request = SearchRequest::new("").with_filter("title eq 'One'");
        let result = admin.query("documents", &request).await;
        assert!(matches!(result, Err(EngineError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_query_absent_index_is_operation_error() {
        let engine = MemoryEngine::new();
        let admin = engine.admin_scope();
        let result = admin.query("missing", &SearchRequest::new("x")).await;
        assert!(matches!(result, Err(EngineError::Service { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_query_hits_project_retrievable_fields() {
        let engine = engine_with_index().await;
        let admin = engine.admin_scope();
        let full = Document::builder()
            .add_text("id", "1")
            .add_text("title", "One")
            .add_text("secret", "classified")
            .build();
        admin
            .submit_batch("documents", &DocumentBatch::upload(vec![full]))
            .await
            .unwrap();

        let hits = admin
            .query("documents", &SearchRequest::new("one"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert!(!hits[0].document.contains("secret"));
    }
}
