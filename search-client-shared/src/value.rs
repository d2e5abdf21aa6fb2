//! Field value types for documents.
//!
//! A [`FieldValue`] is one value inside a document: text, a list of text
//! values, an integer, a double, a boolean, a UTC timestamp, or an explicit
//! null. Values serialize untagged, so a document serializes as a plain JSON
//! object the search service understands directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::FieldKind;

/// A value stored in one document field.
///
/// Deserialization relies on the variant order: timestamps are tried before
/// plain text, so RFC 3339 strings coming back from the service round-trip as
/// [`FieldValue::DateTime`] while everything else stays [`FieldValue::Text`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Explicit null value.
    Null,
    /// Boolean value.
    Boolean(bool),
    /// 64-bit signed integer value.
    Integer(i64),
    /// 64-bit floating point value.
    Double(f64),
    /// UTC timestamp value.
    DateTime(DateTime<Utc>),
    /// Text value.
    Text(String),
    /// List of text values.
    TextList(Vec<String>),
}

impl FieldValue {
    /// Convert to text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to a boolean if this is a boolean value.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert to an integer if this is an integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Convert to a double. Integer values widen losslessly enough for
    /// comparison purposes.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            FieldValue::Double(f) => Some(*f),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Convert to a timestamp if this is a datetime value.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Convert to a slice of text values if this is a text list.
    pub fn as_text_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::TextList(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this is the explicit null value.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// The field kind this value naturally maps to, or `None` for null.
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            FieldValue::Null => None,
            FieldValue::Boolean(_) => Some(FieldKind::Boolean),
            FieldValue::Integer(_) => Some(FieldKind::Int64),
            FieldValue::Double(_) => Some(FieldKind::Double),
            FieldValue::DateTime(_) => Some(FieldKind::DateTimeOffset),
            FieldValue::Text(_) => Some(FieldKind::String),
            FieldValue::TextList(_) => Some(FieldKind::StringCollection),
        }
    }

    /// Whether this value is storable in a field of the given kind.
    ///
    /// Null is accepted everywhere; integers are accepted by double-kinded
    /// fields since the wire format cannot distinguish `1` from `1.0`.
    pub fn fits_kind(&self, kind: FieldKind) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Integer(_) => matches!(kind, FieldKind::Int64 | FieldKind::Double),
            other => other.kind() == Some(kind),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Double(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::TextList(value)
    }
}
