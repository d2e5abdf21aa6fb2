//! Index schema lifecycle service.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::errors::SearchClientError;
use crate::interfaces::ScopeResolver;
use search_client_shared::IndexSchema;

use super::{bounded, require_index_name};

/// Manages index schema lifecycle: create-or-update, fetch, existence check,
/// enumeration and deletion. Every operation acquires a fresh admin-scoped
/// handle from the resolver.
pub struct IndexService {
    resolver: Arc<dyn ScopeResolver>,
    config: ClientConfig,
}

impl IndexService {
    /// Create a service with default configuration.
    pub fn new(resolver: Arc<dyn ScopeResolver>) -> Self {
        Self::with_config(resolver, ClientConfig::default())
    }

    /// Create a service with custom configuration.
    pub fn with_config(resolver: Arc<dyn ScopeResolver>, config: ClientConfig) -> Self {
        Self { resolver, config }
    }

    /// Create the named index or replace its field definitions.
    ///
    /// The schema is validated locally first, so a schema violation never
    /// reaches the network. Applying the same schema twice is idempotent.
    #[instrument(skip(self, schema), fields(index = %schema.name))]
    pub async fn create_or_update(&self, schema: &IndexSchema) -> Result<(), SearchClientError> {
        schema.validate()?;
        let handle = self.resolver.admin_scope();
        bounded(self.config.operation_timeout, handle.apply_index(schema)).await?;
        debug!(index = %schema.name, fields = schema.fields.len(), "Index created or updated");
        Ok(())
    }

    /// Fetch the schema of the named index, or `None` when absent.
    #[instrument(skip(self))]
    pub async fn get(&self, name: &str) -> Result<Option<IndexSchema>, SearchClientError> {
        require_index_name(name)?;
        let handle = self.resolver.admin_scope();
        bounded(self.config.operation_timeout, handle.fetch_index(name)).await
    }

    /// Whether the named index exists.
    pub async fn exists(&self, name: &str) -> Result<bool, SearchClientError> {
        Ok(self.get(name).await?.is_some())
    }

    /// List all index schemas on the service, in engine order.
    pub async fn list_all(&self) -> Result<Vec<IndexSchema>, SearchClientError> {
        let handle = self.resolver.admin_scope();
        bounded(self.config.operation_timeout, handle.list_indexes()).await
    }

    /// Delete the named index. Deleting an absent index succeeds.
    #[instrument(skip(self))]
    pub async fn delete(&self, name: &str) -> Result<(), SearchClientError> {
        require_index_name(name)?;
        let handle = self.resolver.admin_scope();
        let existed = bounded(self.config.operation_timeout, handle.delete_index(name)).await?;
        if existed {
            debug!(index = %name, "Index deleted");
        } else {
            debug!(index = %name, "Index was already absent");
        }
        Ok(())
    }
}
