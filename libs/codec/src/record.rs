//! Decoded record data model
//!
//! A [`Record`] maps field keys to typed [`FieldValue`]s. It is built by the
//! parser, extended with the read time and derived fields, and finally
//! handed to the consumers of the recorder.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::{BTreeMap, Iter};
use std::fmt;

/// Typed value of one record field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
}

impl FieldValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Integer(_) => None,
        }
    }

    /// Name of the variant, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Text(_) => "text",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Decoded frame, keyed by field code
///
/// Keys are kept sorted so serialized records are stable across reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, returning the value it replaced
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Integer value of a field, `None` if absent or textual
    pub fn get_integer(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(FieldValue::as_integer)
    }

    /// Text value of a field, `None` if absent or numeric
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_text)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> Iter<'_, String, FieldValue> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let mut record = Record::new();
        record.insert("BASE", 1234i64);
        record.insert("PTEC", "TH..");

        assert_eq!(record.get_integer("BASE"), Some(1234));
        assert_eq!(record.get_text("BASE"), None);
        assert_eq!(record.get_text("PTEC"), Some("TH.."));
        assert_eq!(record.get_integer("PTEC"), None);
        assert_eq!(record.get("PAPP"), None);
    }

    #[test]
    fn test_insert_replaces_value() {
        let mut record = Record::new();
        assert_eq!(record.insert("IINST", 8i64), None);
        assert_eq!(record.insert("IINST", 9i64), Some(FieldValue::Integer(8)));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let record: Record = [
            ("BASE", FieldValue::from(1234i64)),
            ("ADCO", FieldValue::from("020830087360")),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"ADCO":"020830087360","BASE":1234}"#);

        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get_integer("BASE"), Some(1234));
        assert_eq!(back.get_text("ADCO"), Some("020830087360"));
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::from(42i64).to_string(), "42");
        assert_eq!(FieldValue::from("HC..").to_string(), "HC..");
        assert_eq!(FieldValue::from("HC..").type_name(), "text");
    }
}
