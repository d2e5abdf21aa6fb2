//! Interface definitions for the search engine boundary.
//!
//! This module defines the abstract `EngineApi` and `ScopeResolver` traits
//! that allow for dependency injection and swappable engine backends.

mod engine_api;
mod scope_resolver;

pub use engine_api::EngineApi;
pub use scope_resolver::ScopeResolver;
