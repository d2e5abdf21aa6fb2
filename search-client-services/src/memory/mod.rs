//! In-process engine backend.
//!
//! This module implements the engine contract against process-local state so
//! the services can be exercised without a running search service. The test
//! suite runs its end-to-end scenarios here, and the demo binary falls back
//! to it when no endpoint is configured.

mod engine;
mod filter;

pub use engine::MemoryEngine;
