//! Service credentials and operation scopes.

use std::fmt;

use crate::errors::SearchClientError;

/// The credential scope an operation runs under.
///
/// Admin authorizes schema changes and document mutations; query authorizes
/// read-only lookups and searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Full access: schema lifecycle and document mutations.
    Admin,
    /// Read-only access: point lookups and search queries.
    Query,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Admin => write!(f, "admin"),
            Scope::Query => write!(f, "query"),
        }
    }
}

/// Immutable credential set for one search service.
///
/// Holds the service identity and one api key per scope. Keys never appear in
/// `Debug` output.
#[derive(Clone)]
pub struct SearchCredentials {
    service_name: String,
    admin_key: String,
    query_key: String,
}

impl SearchCredentials {
    /// Create a credential set. All three values must be non-empty.
    pub fn new(
        service_name: impl Into<String>,
        admin_key: impl Into<String>,
        query_key: impl Into<String>,
    ) -> Result<Self, SearchClientError> {
        let service_name = service_name.into();
        let admin_key = admin_key.into();
        let query_key = query_key.into();

        if service_name.trim().is_empty() {
            return Err(SearchClientError::validation("Service name cannot be empty"));
        }
        if admin_key.trim().is_empty() {
            return Err(SearchClientError::validation("Admin key cannot be empty"));
        }
        if query_key.trim().is_empty() {
            return Err(SearchClientError::validation("Query key cannot be empty"));
        }

        Ok(Self {
            service_name,
            admin_key,
            query_key,
        })
    }

    /// The service identity these credentials belong to.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// The api key authorizing the given scope.
    pub fn key_for(&self, scope: Scope) -> &str {
        match scope {
            Scope::Admin => &self.admin_key,
            Scope::Query => &self.query_key,
        }
    }
}

impl fmt::Debug for SearchCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchCredentials")
            .field("service_name", &self.service_name)
            .field("admin_key", &"<redacted>")
            .field("query_key", &"<redacted>")
            .finish()
    }
}
