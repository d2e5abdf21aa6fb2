//! Request and response types for index and document operations.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use search_client_shared::Document;

/// The action a batch applies to each of its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BatchKind {
    /// Strict create. An already-present key is a per-item conflict failure.
    Upload,
    /// Field-wise update of existing documents. An absent key is a per-item
    /// failure and never creates the document.
    Merge,
    /// Merge when the key is present, upload when it is absent.
    MergeOrUpload,
    /// Remove by key. Absent keys succeed.
    Delete,
}

impl fmt::Display for BatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BatchKind::Upload => "upload",
            BatchKind::Merge => "merge",
            BatchKind::MergeOrUpload => "mergeOrUpload",
            BatchKind::Delete => "delete",
        };
        write!(f, "{}", name)
    }
}

/// A batch of document mutations sharing one action kind.
///
/// Constructors enforce the kind/item pairing: delete batches carry key
/// values only, every other kind carries full documents.
#[derive(Debug, Clone)]
pub struct DocumentBatch {
    kind: BatchKind,
    items: BatchItems,
}

#[derive(Debug, Clone)]
enum BatchItems {
    Documents(Vec<Document>),
    Keys(Vec<String>),
}

impl DocumentBatch {
    /// Create an upload batch.
    pub fn upload(documents: Vec<Document>) -> Self {
        Self {
            kind: BatchKind::Upload,
            items: BatchItems::Documents(documents),
        }
    }

    /// Create a merge batch.
    pub fn merge(documents: Vec<Document>) -> Self {
        Self {
            kind: BatchKind::Merge,
            items: BatchItems::Documents(documents),
        }
    }

    /// Create a merge-or-upload batch.
    pub fn merge_or_upload(documents: Vec<Document>) -> Self {
        Self {
            kind: BatchKind::MergeOrUpload,
            items: BatchItems::Documents(documents),
        }
    }

    /// Create a delete batch from document keys.
    pub fn delete(keys: Vec<String>) -> Self {
        Self {
            kind: BatchKind::Delete,
            items: BatchItems::Keys(keys),
        }
    }

    /// The action kind shared by all items.
    pub fn kind(&self) -> BatchKind {
        self.kind
    }

    /// Number of items in the batch.
    pub fn len(&self) -> usize {
        match &self.items {
            BatchItems::Documents(documents) => documents.len(),
            BatchItems::Keys(keys) => keys.len(),
        }
    }

    /// Whether the batch has no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The documents carried by an upload, merge or merge-or-upload batch.
    /// Empty for delete batches.
    pub fn documents(&self) -> &[Document] {
        match &self.items {
            BatchItems::Documents(documents) => documents,
            BatchItems::Keys(_) => &[],
        }
    }

    /// The keys carried by a delete batch. Empty for document batches.
    pub fn keys(&self) -> &[String] {
        match &self.items {
            BatchItems::Keys(keys) => keys,
            BatchItems::Documents(_) => &[],
        }
    }
}

/// Failure detail for a single item within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// Status code the engine reported for the item.
    pub status: u16,
    /// Engine-reported failure message.
    pub message: String,
}

impl ItemFailure {
    /// Create an item failure.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Outcome of a batch operation, attributing every item to its key.
///
/// Every submitted item lands on exactly one side: its key is either in
/// `succeeded` or mapped to a failure. Partial success is an expected
/// outcome, not an error; a batch that failed to reach the engine at all is
/// reported as an operation-level error instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    /// Keys of items the engine accepted.
    pub succeeded: BTreeSet<String>,
    /// Failure detail per rejected item key.
    pub failures: BTreeMap<String, ItemFailure>,
}

impl BatchOutcome {
    /// Create an empty outcome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted item. A later report for the same key wins.
    pub fn record_success(&mut self, key: impl Into<String>) {
        let key = key.into();
        self.failures.remove(&key);
        self.succeeded.insert(key);
    }

    /// Record a rejected item. A later report for the same key wins.
    pub fn record_failure(&mut self, key: impl Into<String>, status: u16, message: impl Into<String>) {
        let key = key.into();
        self.succeeded.remove(&key);
        self.failures.insert(key, ItemFailure::new(status, message));
    }

    /// Failure detail for a key, if the item was rejected.
    pub fn failure(&self, key: &str) -> Option<&ItemFailure> {
        self.failures.get(key)
    }

    /// Whether every item in the batch was accepted.
    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total number of items the outcome accounts for.
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failures.len()
    }
}

/// A free-text search request with an optional structured filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    /// Free-text query. All terms must match, across searchable fields.
    pub text: String,
    /// Optional filter expression over filterable fields.
    pub filter: Option<String>,
    /// Optional named scoring profile applied by the engine.
    pub scoring_profile: Option<String>,
}

impl SearchRequest {
    /// Create a request for the given query text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            filter: None,
            scoring_profile: None,
        }
    }

    /// Restrict results with a filter expression.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Apply a named scoring profile.
    pub fn with_scoring_profile(mut self, profile: impl Into<String>) -> Self {
        self.scoring_profile = Some(profile.into());
        self
    }
}

/// A single search result with its engine-reported relevance score.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Engine-reported relevance score.
    pub score: f64,
    /// The matched document, projected to its retrievable fields.
    pub document: Document,
}
