//! Scoped REST handle implementation.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, error};
use url::Url;

use crate::errors::EngineError;
use crate::interfaces::EngineApi;
use crate::types::{BatchOutcome, DocumentBatch, SearchHit, SearchRequest};
use search_client_shared::{Document, IndexSchema};

use super::protocol::{
    BatchRequestBody, BatchResponseBody, IndexListBody, SearchRequestBody, SearchResponseBody,
};

/// Request header carrying the scope's api key.
const API_KEY_HEADER: &str = "api-key";

/// One credential-scoped handle onto the REST API.
///
/// Carries the endpoint, one scope's api key and a clone of the shared HTTP
/// client. Built per operation by the resolver and dropped afterwards.
pub(crate) struct RestEngineHandle {
    endpoint: Url,
    api_key: String,
    http: reqwest::Client,
}

impl RestEngineHandle {
    pub fn new(endpoint: Url, api_key: String, http: reqwest::Client) -> Self {
        Self {
            endpoint,
            api_key,
            http,
        }
    }

    fn url(&self, path: &str) -> Result<Url, EngineError> {
        self.endpoint
            .join(path)
            .map_err(|e| EngineError::bad_request(format!("Invalid request path '{}': {}", path, e)))
    }
}

#[async_trait]
impl EngineApi for RestEngineHandle {
    async fn apply_index(&self, schema: &IndexSchema) -> Result<(), EngineError> {
        let url = self.url(&format!("indexes/{}", schema.name))?;
        let response = self
            .http
            .put(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(schema)
            .send()
            .await
            .map_err(|e| EngineError::transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failure("apply_index", response).await);
        }
        debug!(index = %schema.name, "Index applied");
        Ok(())
    }

    async fn fetch_index(&self, name: &str) -> Result<Option<IndexSchema>, EngineError> {
        let url = self.url(&format!("indexes/{}", name))?;
        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| EngineError::transport(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(failure("fetch_index", response).await);
        }
        let schema = response
            .json::<IndexSchema>()
            .await
            .map_err(|e| EngineError::decode(e.to_string()))?;
        Ok(Some(schema))
    }

    async fn list_indexes(&self) -> Result<Vec<IndexSchema>, EngineError> {
        let url = self.url("indexes")?;
        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| EngineError::transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failure("list_indexes", response).await);
        }
        let body = response
            .json::<IndexListBody>()
            .await
            .map_err(|e| EngineError::decode(e.to_string()))?;
        Ok(body.indexes)
    }

    async fn delete_index(&self, name: &str) -> Result<bool, EngineError> {
        let url = self.url(&format!("indexes/{}", name))?;
        let response = self
            .http
            .delete(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| EngineError::transport(e.to_string()))?;

        // 404 is acceptable - the index may already be absent
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !response.status().is_success() {
            return Err(failure("delete_index", response).await);
        }
        debug!(index = %name, "Index deleted");
        Ok(true)
    }

    async fn submit_batch(
        &self,
        index: &str,
        batch: &DocumentBatch,
    ) -> Result<BatchOutcome, EngineError> {
        let url = self.url(&format!("indexes/{}/docs/batch", index))?;
        let body = BatchRequestBody::from_batch(batch);
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failure("submit_batch", response).await);
        }
        let body = response
            .json::<BatchResponseBody>()
            .await
            .map_err(|e| EngineError::decode(e.to_string()))?;
        let outcome = body.into_outcome();
        debug!(
            index = %index,
            kind = %batch.kind(),
            total = outcome.total(),
            failed = outcome.failures.len(),
            "Batch submitted"
        );
        Ok(outcome)
    }

    async fn fetch_document(
        &self,
        index: &str,
        key: &str,
        select: &[String],
    ) -> Result<Option<Document>, EngineError> {
        let path = format!("indexes/{}/docs/{}", index, urlencoding::encode(key));
        let mut url = self.url(&path)?;
        if !select.is_empty() {
            url.query_pairs_mut().append_pair("select", &select.join(","));
        }
        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| EngineError::transport(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(failure("fetch_document", response).await);
        }
        let document = response
            .json::<Document>()
            .await
            .map_err(|e| EngineError::decode(e.to_string()))?;
        Ok(Some(document))
    }

    async fn query(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<Vec<SearchHit>, EngineError> {
        let url = self.url(&format!("indexes/{}/docs/search", index))?;
        let body = SearchRequestBody::from_request(request);
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failure("query", response).await);
        }
        let body = response
            .json::<SearchResponseBody>()
            .await
            .map_err(|e| EngineError::decode(e.to_string()))?;
        let hits = body.into_hits();
        debug!(index = %index, hits = hits.len(), "Search completed");
        Ok(hits)
    }
}

async fn failure(operation: &str, response: reqwest::Response) -> EngineError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    error!(operation = %operation, status = %status, body = %body, "Engine request failed");
    classify(status.as_u16(), body)
}

fn classify(status: u16, message: String) -> EngineError {
    let message = if message.is_empty() {
        format!("Request failed with status {}", status)
    } else {
        message
    };
    match status {
        401 | 403 => EngineError::unauthorized(message),
        400 => EngineError::bad_request(message),
        _ => EngineError::service(status, message),
    }
}
