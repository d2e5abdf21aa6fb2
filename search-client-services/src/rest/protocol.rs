//! Wire format for the engine's REST API.
//!
//! Request bodies borrow from the caller's types; response bodies own their
//! data and convert into the crate's result types.

use serde::{Deserialize, Serialize};

use crate::types::{BatchKind, BatchOutcome, DocumentBatch, SearchHit, SearchRequest};
use search_client_shared::{Document, IndexSchema};

/// Body of `POST /indexes/{name}/docs/batch`.
#[derive(Debug, Serialize)]
pub(crate) struct BatchRequestBody<'a> {
    pub actions: Vec<BatchActionBody<'a>>,
}

/// One action inside a batch request. Delete actions carry the key; every
/// other kind carries the full document.
#[derive(Debug, Serialize)]
pub(crate) struct BatchActionBody<'a> {
    pub action: BatchKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<&'a Document>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<&'a str>,
}

impl<'a> BatchRequestBody<'a> {
    pub fn from_batch(batch: &'a DocumentBatch) -> Self {
        let actions = if batch.kind() == BatchKind::Delete {
            batch
                .keys()
                .iter()
                .map(|key| BatchActionBody {
                    action: BatchKind::Delete,
                    document: None,
                    key: Some(key.as_str()),
                })
                .collect()
        } else {
            batch
                .documents()
                .iter()
                .map(|document| BatchActionBody {
                    action: batch.kind(),
                    document: Some(document),
                    key: None,
                })
                .collect()
        };
        Self { actions }
    }
}

/// Body of a batch response.
#[derive(Debug, Deserialize)]
pub(crate) struct BatchResponseBody {
    pub results: Vec<ActionResultBody>,
}

/// Per-item result inside a batch response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ActionResultBody {
    pub key: String,
    pub succeeded: bool,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl BatchResponseBody {
    pub fn into_outcome(self) -> BatchOutcome {
        let mut outcome = BatchOutcome::new();
        for result in self.results {
            if result.succeeded {
                outcome.record_success(result.key);
            } else {
                let status = result.status_code.unwrap_or(500);
                let message = result
                    .error_message
                    .unwrap_or_else(|| "Item failed".to_string());
                outcome.record_failure(result.key, status, message);
            }
        }
        outcome
    }
}

/// Body of `POST /indexes/{name}/docs/search`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchRequestBody<'a> {
    pub search: &'a str,
    pub search_mode: &'static str,
    pub query_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scoring_profile: Option<&'a str>,
}

impl<'a> SearchRequestBody<'a> {
    pub fn from_request(request: &'a SearchRequest) -> Self {
        Self {
            search: &request.text,
            search_mode: "all",
            query_type: "full",
            filter: request.filter.as_deref(),
            scoring_profile: request.scoring_profile.as_deref(),
        }
    }
}

/// Body of a search response.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponseBody {
    pub results: Vec<HitBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HitBody {
    pub score: f64,
    pub document: Document,
}

impl SearchResponseBody {
    pub fn into_hits(self) -> Vec<SearchHit> {
        self.results
            .into_iter()
            .map(|hit| SearchHit {
                score: hit.score,
                document: hit.document,
            })
            .collect()
    }
}

/// Body of `GET /indexes`.
#[derive(Debug, Deserialize)]
pub(crate) struct IndexListBody {
    pub indexes: Vec<IndexSchema>,
}
