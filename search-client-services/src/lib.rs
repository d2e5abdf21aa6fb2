//! # Search Client Services
//!
//! This crate provides the service layer for the search client. It includes
//! definitions for errors, interfaces, batch types, the in-memory engine,
//! and the REST engine implementation.

pub mod config;
pub mod credentials;
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod rest;
pub mod services;
pub mod types;

pub use config::ClientConfig;
pub use credentials::{Scope, SearchCredentials};
pub use errors::{EngineError, SearchClientError};
pub use interfaces::{EngineApi, ScopeResolver};
pub use memory::MemoryEngine;
pub use rest::RestScopeResolver;
pub use services::{DocumentService, IndexService};
pub use types::{BatchKind, BatchOutcome, DocumentBatch, ItemFailure, SearchHit, SearchRequest};
