//! Schema-free document representation.
//!
//! A [`Document`] is a flat map of field names to [`FieldValue`]s. It carries
//! no schema knowledge of its own; services validate documents against an
//! [`crate::schema::IndexSchema`] before anything goes over the wire.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// A single document as stored in, or retrieved from, an index.
///
/// Serializes as a plain JSON object keyed by field name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: BTreeMap<String, FieldValue>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a document.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Set a field value, replacing any existing value under that name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Remove a field by name, returning its value if present.
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    /// Whether the document has a field with the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// The document key as text, looked up under the given key field name.
    ///
    /// Returns `None` when the field is absent, null, or not a text value.
    pub fn key_value(&self, key_field: &str) -> Option<&str> {
        self.fields.get(key_field).and_then(FieldValue::as_text)
    }

    /// Iterate over fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields in the document.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// A copy containing only the named fields, in the same name order.
    ///
    /// Requested fields the document does not have are skipped.
    pub fn project(&self, names: &[String]) -> Document {
        let fields = self
            .fields
            .iter()
            .filter(|(name, _)| names.iter().any(|n| n == *name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        Document { fields }
    }
}

impl FromIterator<(String, FieldValue)> for Document {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Document {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Builder for [`Document`].
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    fields: BTreeMap<String, FieldValue>,
}

impl DocumentBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    pub fn add_text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), FieldValue::Text(value.into()));
        self
    }

    /// Add an integer field.
    pub fn add_integer(mut self, name: impl Into<String>, value: i64) -> Self {
        self.fields.insert(name.into(), FieldValue::Integer(value));
        self
    }

    /// Add a double field.
    pub fn add_double(mut self, name: impl Into<String>, value: f64) -> Self {
        self.fields.insert(name.into(), FieldValue::Double(value));
        self
    }

    /// Add a boolean field.
    pub fn add_boolean(mut self, name: impl Into<String>, value: bool) -> Self {
        self.fields.insert(name.into(), FieldValue::Boolean(value));
        self
    }

    /// Add a UTC timestamp field.
    pub fn add_datetime(mut self, name: impl Into<String>, value: DateTime<Utc>) -> Self {
        self.fields.insert(name.into(), FieldValue::DateTime(value));
        self
    }

    /// Add a text list field.
    pub fn add_text_list<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = values.into_iter().map(Into::into).collect();
        self.fields.insert(name.into(), FieldValue::TextList(items));
        self
    }

    /// Add an explicit null field.
    pub fn add_null(mut self, name: impl Into<String>) -> Self {
        self.fields.insert(name.into(), FieldValue::Null);
        self
    }

    /// Finish building the document.
    pub fn build(self) -> Document {
        Document { fields: self.fields }
    }
}
