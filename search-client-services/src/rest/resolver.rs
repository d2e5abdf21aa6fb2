//! REST scope resolver.

use tracing::info;
use url::Url;

use crate::credentials::{Scope, SearchCredentials};
use crate::interfaces::{EngineApi, ScopeResolver};

use super::handle::RestEngineHandle;

/// Resolves scopes into REST handles against one service endpoint.
///
/// The reqwest client is the shared transport collaborator: cloning it hands
/// every fresh handle the same connection pool and TLS state. The handles
/// themselves are built per operation and dropped when it completes.
pub struct RestScopeResolver {
    endpoint: Url,
    credentials: SearchCredentials,
    http: reqwest::Client,
}

impl RestScopeResolver {
    /// Create a resolver for the service at `endpoint`.
    pub fn new(endpoint: Url, credentials: SearchCredentials) -> Self {
        Self::with_http_client(endpoint, credentials, reqwest::Client::new())
    }

    /// Create a resolver that reuses an existing HTTP client.
    pub fn with_http_client(
        endpoint: Url,
        credentials: SearchCredentials,
        http: reqwest::Client,
    ) -> Self {
        let endpoint = ensure_trailing_slash(endpoint);
        info!(
            endpoint = %endpoint,
            service = %credentials.service_name(),
            "Created REST scope resolver"
        );
        Self {
            endpoint,
            credentials,
            http,
        }
    }

    /// The service identity this resolver is bound to.
    pub fn service_name(&self) -> &str {
        self.credentials.service_name()
    }

    fn handle_for(&self, scope: Scope) -> Box<dyn EngineApi> {
        Box::new(RestEngineHandle::new(
            self.endpoint.clone(),
            self.credentials.key_for(scope).to_string(),
            self.http.clone(),
        ))
    }
}

impl ScopeResolver for RestScopeResolver {
    fn admin_scope(&self) -> Box<dyn EngineApi> {
        self.handle_for(Scope::Admin)
    }

    fn query_scope(&self) -> Box<dyn EngineApi> {
        self.handle_for(Scope::Query)
    }
}

/// Relative joins need the endpoint path to end with a slash.
fn ensure_trailing_slash(mut endpoint: Url) -> Url {
    if !endpoint.path().ends_with('/') {
        let path = format!("{}/", endpoint.path());
        endpoint.set_path(&path);
    }
    endpoint
}
