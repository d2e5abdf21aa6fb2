//! Scope resolver trait definition.

use super::EngineApi;

/// Produces credential-scoped engine handles.
///
/// Each call returns a fresh handle bound to one scope's credential. Handles
/// are cheap stateless wrappers around shared transport configuration, live
/// for a single logical operation, and are dropped on every exit path.
/// Implementations may cache transport resources behind this contract, but
/// the handles themselves are never reused across operations.
pub trait ScopeResolver: Send + Sync {
    /// Create a handle authorized for schema changes and document mutations.
    fn admin_scope(&self) -> Box<dyn EngineApi>;

    /// Create a handle authorized for read-only lookups and searches.
    fn query_scope(&self) -> Box<dyn EngineApi>;
}
