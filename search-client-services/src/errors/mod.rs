//! Error types for the search client services.

mod client_error;
mod engine_error;

pub use client_error::SearchClientError;
pub use engine_error::EngineError;
