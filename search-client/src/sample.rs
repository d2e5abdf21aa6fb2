//! Sample index schema and seed documents for the demo.

use chrono::Utc;
use search_client_shared::{Document, FieldDefinition, FieldKind, IndexSchema};

/// Name of the demo index.
pub const INDEX_NAME: &str = "documents";

/// Schema for the demo `documents` index.
pub fn document_index() -> IndexSchema {
    IndexSchema::new(INDEX_NAME)
        .with_field(
            FieldDefinition::new("id", FieldKind::String)
                .key()
                .filterable(),
        )
        .with_field(
            FieldDefinition::new("type", FieldKind::String)
                .searchable()
                .filterable()
                .sortable()
                .facetable(),
        )
        .with_field(
            FieldDefinition::new("published_date", FieldKind::DateTimeOffset)
                .filterable()
                .sortable()
                .facetable(),
        )
        .with_field(
            FieldDefinition::new("title", FieldKind::String)
                .searchable()
                .filterable()
                .sortable()
                .facetable(),
        )
        .with_field(
            FieldDefinition::new("additional_properties", FieldKind::StringCollection)
                .searchable()
                .filterable()
                .facetable(),
        )
}

/// One demo document with the given key and type.
pub fn document(id: &str, doc_type: &str) -> Document {
    Document::builder()
        .add_text("id", id)
        .add_text("type", doc_type)
        .add_datetime("published_date", Utc::now())
        .add_text("title", format!("Document {}", id))
        .add_text_list("additional_properties", ["Property 1", "Property 2"])
        .build()
}

/// The six seed documents loaded by the demo.
pub fn seed_documents() -> Vec<Document> {
    vec![
        document("1", "json"),
        document("2", "json"),
        document("3", "xml"),
        document("4", "xml"),
        document("5", "json"),
        document("6", "xml"),
    ]
}
