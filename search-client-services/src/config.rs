//! Configuration for the index and document services.

use std::time::Duration;

/// Configuration shared by `IndexService` and `DocumentService`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Maximum number of items allowed in a single batch operation.
    /// Set to None to disable the limit (not recommended for production).
    pub max_batch_size: Option<usize>,
    /// Upper bound on the duration of one engine call.
    /// Set to None to wait indefinitely.
    pub operation_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_batch_size: Some(1000),
            operation_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl ClientConfig {
    /// Create a config with no batch size limit and no timeout.
    pub fn unlimited() -> Self {
        Self {
            max_batch_size: None,
            operation_timeout: None,
        }
    }

    /// Override the batch size limit.
    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = Some(max_batch_size);
        self
    }

    /// Override the per-operation timeout.
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }
}
