//! Dependency initialization and wiring for the search client demo.

use std::env;
use std::sync::Arc;

use tracing::info;
use url::Url;

use crate::DemoError;
use search_client_services::{
    ClientConfig, DocumentService, IndexService, MemoryEngine, RestScopeResolver, ScopeResolver,
    SearchCredentials,
};

/// Default service identity when none is configured.
const DEFAULT_SERVICE_NAME: &str = "demo-search";

/// Container for all initialized services.
pub struct Dependencies {
    /// Index lifecycle service.
    pub index_service: IndexService,
    /// Document mutation and retrieval service.
    pub document_service: DocumentService,
    /// Human-readable description of the selected backend.
    pub backend: String,
}

impl Dependencies {
    /// Initialize all services from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_ENDPOINT`: engine base URL; when unset, the in-memory
    ///   backend runs the demo without a network
    /// - `SEARCH_SERVICE_NAME`: service identity (default: demo-search)
    /// - `SEARCH_ADMIN_KEY`: admin api key (required with an endpoint)
    /// - `SEARCH_QUERY_KEY`: query api key (required with an endpoint)
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized services
    /// * `Err(DemoError)` - If initialization fails
    pub fn new() -> Result<Self, DemoError> {
        match env::var("SEARCH_ENDPOINT") {
            Ok(endpoint) => Self::rest(&endpoint),
            Err(_) => Ok(Self::memory()),
        }
    }

    fn rest(endpoint: &str) -> Result<Self, DemoError> {
        let service_name =
            env::var("SEARCH_SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string());
        let admin_key = env::var("SEARCH_ADMIN_KEY").map_err(|_| {
            DemoError::config("SEARCH_ADMIN_KEY must be set alongside SEARCH_ENDPOINT")
        })?;
        let query_key = env::var("SEARCH_QUERY_KEY").map_err(|_| {
            DemoError::config("SEARCH_QUERY_KEY must be set alongside SEARCH_ENDPOINT")
        })?;

        let endpoint = Url::parse(endpoint)
            .map_err(|e| DemoError::config(format!("Invalid SEARCH_ENDPOINT: {}", e)))?;
        let credentials = SearchCredentials::new(service_name, admin_key, query_key)?;

        info!(endpoint = %endpoint, "Initializing REST backend");
        let backend = format!("REST engine at {}", endpoint);
        let resolver = Arc::new(RestScopeResolver::new(endpoint, credentials));
        Ok(Self::from_resolver(resolver, backend))
    }

    fn memory() -> Self {
        info!("SEARCH_ENDPOINT not set, using in-memory backend");
        Self::from_resolver(Arc::new(MemoryEngine::new()), "in-memory engine".to_string())
    }

    fn from_resolver(resolver: Arc<dyn ScopeResolver>, backend: String) -> Self {
        let config = ClientConfig::default();
        Self {
            index_service: IndexService::with_config(resolver.clone(), config.clone()),
            document_service: DocumentService::with_config(resolver, config),
            backend,
        }
    }
}
