//! REST backend for a hosted search service.
//!
//! Talks to the engine's HTTP API: schema lifecycle under `/indexes`,
//! document batches, point lookups and search under `/indexes/{name}/docs`.
//! Every request authenticates with the scope's key in the `api-key` header.

mod handle;
mod protocol;
mod resolver;

pub use resolver::RestScopeResolver;
