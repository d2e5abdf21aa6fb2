//! # Search Client Shared
//!
//! This crate provides the data types shared across the search client: index
//! schemas described as plain data, schema-free documents, and the field
//! values they carry. Services in `search-client-services` validate and move
//! these types; nothing here talks to the network.

pub mod document;
pub mod schema;
pub mod value;

pub use document::{Document, DocumentBuilder};
pub use schema::{FieldDefinition, FieldKind, IndexSchema, SchemaError};
pub use value::FieldValue;
