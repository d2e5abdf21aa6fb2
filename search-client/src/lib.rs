//! # Search Client
//!
//! Main library for the search client demo.
//!
//! This crate provides the entry point, configuration, and sample data for
//! walking the full index lifecycle against a search engine backend.

pub mod config;
pub mod sample;

pub use config::Dependencies;

use thiserror::Error;

/// Errors that can occur during demo initialization or execution.
#[derive(Error, Debug)]
pub enum DemoError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Client error.
    #[error("Client error: {0}")]
    ClientError(#[from] search_client_services::SearchClientError),
}

impl DemoError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
