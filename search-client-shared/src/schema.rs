//! Index schema types.
//!
//! An [`IndexSchema`] names an index and describes its fields as plain data:
//! each [`FieldDefinition`] carries a [`FieldKind`] and explicit capability
//! flags instead of deriving behavior from an annotated entity type. Services
//! call [`IndexSchema::validate`] before any schema or document operation
//! touches the network.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// The data kind of an index field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    /// Single text value.
    String,
    /// List of text values.
    StringCollection,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Double,
    /// Boolean.
    Boolean,
    /// Timestamp with offset, stored in UTC.
    DateTimeOffset,
}

impl FieldKind {
    /// Whether fields of this kind may be marked searchable.
    pub fn supports_search(self) -> bool {
        matches!(self, FieldKind::String | FieldKind::StringCollection)
    }

    /// Whether fields of this kind may be marked sortable.
    pub fn supports_sort(self) -> bool {
        !matches!(self, FieldKind::StringCollection)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::String => "string",
            FieldKind::StringCollection => "stringCollection",
            FieldKind::Int64 => "int64",
            FieldKind::Double => "double",
            FieldKind::Boolean => "boolean",
            FieldKind::DateTimeOffset => "dateTimeOffset",
        };
        write!(f, "{}", name)
    }
}

fn default_true() -> bool {
    true
}

/// Definition of one index field: name, kind, and capability flags.
///
/// Flags default to off except `retrievable`, which is on unless the field is
/// explicitly hidden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Field name as it appears in documents.
    pub name: String,
    /// Data kind of the field.
    pub kind: FieldKind,
    /// Whether this field is the document key.
    #[serde(default)]
    pub key: bool,
    /// Whether full-text search may match on this field.
    #[serde(default)]
    pub searchable: bool,
    /// Whether filter expressions may reference this field.
    #[serde(default)]
    pub filterable: bool,
    /// Whether results may be ordered by this field.
    #[serde(default)]
    pub sortable: bool,
    /// Whether facet aggregations may group by this field.
    #[serde(default)]
    pub facetable: bool,
    /// Whether the field is returned in retrieved documents.
    #[serde(default = "default_true")]
    pub retrievable: bool,
}

impl FieldDefinition {
    /// Create a field definition with all flags off except `retrievable`.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            key: false,
            searchable: false,
            filterable: false,
            sortable: false,
            facetable: false,
            retrievable: true,
        }
    }

    /// Mark this field as the document key.
    pub fn key(mut self) -> Self {
        self.key = true;
        self
    }

    /// Allow full-text search matches on this field.
    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    /// Allow filter expressions on this field.
    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    /// Allow ordering results by this field.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Allow facet aggregations on this field.
    pub fn facetable(mut self) -> Self {
        self.facetable = true;
        self
    }

    /// Exclude this field from retrieved documents.
    pub fn hidden(mut self) -> Self {
        self.retrievable = false;
        self
    }
}

/// Errors produced by [`IndexSchema::validate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Index name cannot be empty")]
    EmptyIndexName,
    #[error("Invalid index name '{0}': use lowercase letters, digits and interior dashes")]
    InvalidIndexName(String),
    #[error("Schema for index '{0}' defines no fields")]
    NoFields(String),
    #[error("Field name cannot be empty")]
    EmptyFieldName,
    #[error("Duplicate field name '{0}'")]
    DuplicateField(String),
    #[error("Schema defines no key field")]
    MissingKey,
    #[error("Schema defines multiple key fields: '{first}' and '{second}'")]
    MultipleKeys { first: String, second: String },
    #[error("Key field '{0}' must be of kind string")]
    NonStringKey(String),
    #[error("Field '{field}' of kind {kind} cannot be searchable")]
    NotSearchable { field: String, kind: FieldKind },
    #[error("Collection field '{0}' cannot be sortable")]
    NotSortable(String),
}

/// Schema for one index: its name and field definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSchema {
    /// Index name. Lowercase letters, digits and interior dashes.
    pub name: String,
    /// Field definitions in declaration order.
    pub fields: Vec<FieldDefinition>,
}

impl IndexSchema {
    /// Create a schema with no fields yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field definition.
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Look up a field definition by name.
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The key field, if the schema declares one.
    pub fn key_field(&self) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.key)
    }

    /// Validate the schema and return its key field.
    ///
    /// Checks the index name, rejects empty and duplicate field names,
    /// requires exactly one string-kinded key, and rejects capability flags
    /// on kinds that cannot support them.
    pub fn validate(&self) -> Result<&FieldDefinition, SchemaError> {
        if self.name.is_empty() {
            return Err(SchemaError::EmptyIndexName);
        }
        if !valid_index_name(&self.name) {
            return Err(SchemaError::InvalidIndexName(self.name.clone()));
        }
        if self.fields.is_empty() {
            return Err(SchemaError::NoFields(self.name.clone()));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(SchemaError::EmptyFieldName);
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
            if field.searchable && !field.kind.supports_search() {
                return Err(SchemaError::NotSearchable {
                    field: field.name.clone(),
                    kind: field.kind,
                });
            }
            if field.sortable && !field.kind.supports_sort() {
                return Err(SchemaError::NotSortable(field.name.clone()));
            }
        }

        let mut keys = self.fields.iter().filter(|f| f.key);
        let key = keys.next().ok_or(SchemaError::MissingKey)?;
        if let Some(second) = keys.next() {
            return Err(SchemaError::MultipleKeys {
                first: key.name.clone(),
                second: second.name.clone(),
            });
        }
        if key.kind != FieldKind::String {
            return Err(SchemaError::NonStringKey(key.name.clone()));
        }

        Ok(key)
    }
}

fn valid_index_name(name: &str) -> bool {
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    valid_chars && !name.starts_with('-') && !name.ends_with('-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> IndexSchema {
        IndexSchema::new("documents")
            .with_field(FieldDefinition::new("id", FieldKind::String).key().filterable())
            .with_field(
                FieldDefinition::new("type", FieldKind::String)
                    .searchable()
                    .filterable()
                    .sortable()
                    .facetable(),
            )
            .with_field(FieldDefinition::new("title", FieldKind::String).searchable())
            .with_field(FieldDefinition::new("publishedDate", FieldKind::DateTimeOffset).sortable())
            .with_field(FieldDefinition::new("tags", FieldKind::StringCollection).searchable())
    }

    #[test]
    fn test_validate_returns_key_field() {
        let schema = sample_schema();
        let key = schema.validate().unwrap();
        assert_eq!(key.name, "id");
        assert!(key.key);
    }

    #[test]
    fn test_empty_index_name_rejected() {
        let schema = IndexSchema::new("")
            .with_field(FieldDefinition::new("id", FieldKind::String).key());
        assert_eq!(schema.validate(), Err(SchemaError::EmptyIndexName));
    }

    #[test]
    fn test_invalid_index_name_rejected() {
        for name in ["Documents", "docs_v2", "-docs", "docs-"] {
            let schema = IndexSchema::new(name)
                .with_field(FieldDefinition::new("id", FieldKind::String).key());
            assert_eq!(
                schema.validate(),
                Err(SchemaError::InvalidIndexName(name.to_string())),
                "expected '{}' to be rejected",
                name
            );
        }
    }

    #[test]
    fn test_no_fields_rejected() {
        let schema = IndexSchema::new("documents");
        assert_eq!(
            schema.validate(),
            Err(SchemaError::NoFields("documents".to_string()))
        );
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let schema = IndexSchema::new("documents")
            .with_field(FieldDefinition::new("id", FieldKind::String).key())
            .with_field(FieldDefinition::new("id", FieldKind::String));
        assert_eq!(
            schema.validate(),
            Err(SchemaError::DuplicateField("id".to_string()))
        );
    }

    #[test]
    fn test_missing_key_rejected() {
        let schema = IndexSchema::new("documents")
            .with_field(FieldDefinition::new("title", FieldKind::String));
        assert_eq!(schema.validate(), Err(SchemaError::MissingKey));
    }

    #[test]
    fn test_multiple_keys_rejected() {
        let schema = IndexSchema::new("documents")
            .with_field(FieldDefinition::new("id", FieldKind::String).key())
            .with_field(FieldDefinition::new("slug", FieldKind::String).key());
        assert_eq!(
            schema.validate(),
            Err(SchemaError::MultipleKeys {
                first: "id".to_string(),
                second: "slug".to_string(),
            })
        );
    }

    #[test]
    fn test_non_string_key_rejected() {
        let schema = IndexSchema::new("documents")
            .with_field(FieldDefinition::new("id", FieldKind::Int64).key());
        assert_eq!(
            schema.validate(),
            Err(SchemaError::NonStringKey("id".to_string()))
        );
    }

    #[test]
    fn test_searchable_integer_rejected() {
        let schema = IndexSchema::new("documents")
            .with_field(FieldDefinition::new("id", FieldKind::String).key())
            .with_field(FieldDefinition::new("count", FieldKind::Int64).searchable());
        assert_eq!(
            schema.validate(),
            Err(SchemaError::NotSearchable {
                field: "count".to_string(),
                kind: FieldKind::Int64,
            })
        );
    }

    #[test]
    fn test_sortable_collection_rejected() {
        let schema = IndexSchema::new("documents")
            .with_field(FieldDefinition::new("id", FieldKind::String).key())
            .with_field(FieldDefinition::new("tags", FieldKind::StringCollection).sortable());
        assert_eq!(
            schema.validate(),
            Err(SchemaError::NotSortable("tags".to_string()))
        );
    }

    #[test]
    fn test_field_serializes_camel_case() {
        let field = FieldDefinition::new("publishedDate", FieldKind::DateTimeOffset).sortable();
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "publishedDate",
                "kind": "dateTimeOffset",
                "key": false,
                "searchable": false,
                "filterable": false,
                "sortable": true,
                "facetable": false,
                "retrievable": true,
            })
        );
    }

    #[test]
    fn test_retrievable_defaults_on_when_omitted() {
        let field: FieldDefinition =
            serde_json::from_value(serde_json::json!({ "name": "title", "kind": "string" }))
                .unwrap();
        assert!(field.retrievable);
        assert!(!field.key);
        assert!(!field.searchable);
    }

    #[test]
    fn test_hidden_clears_retrievable() {
        let field = FieldDefinition::new("internal", FieldKind::String).hidden();
        assert!(!field.retrievable);
    }

    #[test]
    fn test_schema_roundtrip() {
        let schema = sample_schema();
        let json = serde_json::to_string(&schema).unwrap();
        let back: IndexSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schema);
    }
}
