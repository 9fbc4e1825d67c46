//! One row of an uploaded table

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Column name to value mapping for a single input row.
///
/// Column order follows the header of the file the record came from and is
/// kept when the record is serialized into a request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a record from string cells, e.g. a parsed CSV row
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut record = Self::new();
        for (k, v) in pairs {
            record.insert(k, Value::String(v.into()));
        }
        record
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.0.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// True when the column exists and holds a non-blank value
    pub fn has_field(&self, column: &str) -> bool {
        match self.0.get(column) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        }
    }

    /// Cell rendered as text. Numbers use their shortest round-trip form.
    pub fn text(&self, column: &str) -> Option<String> {
        self.0.get(column).map(value_to_text)
    }

    /// Cell as a number, parsing string cells
    pub fn number(&self, column: &str) -> Option<f64> {
        match self.0.get(column)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Text form of a JSON cell value as it would appear in a table
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blank_cells_are_not_present() {
        let record = Record::from_pairs([("zip", "10001"), ("country", "  ")]);
        assert!(record.has_field("zip"));
        assert!(!record.has_field("country"));
        assert!(!record.has_field("state"));
    }

    #[test]
    fn test_number_reads_strings_and_numbers() {
        let mut record = Record::from_pairs([("latitude", " 40.75 ")]);
        record.insert("longitude", json!(-73.99));
        assert_eq!(record.number("latitude"), Some(40.75));
        assert_eq!(record.number("longitude"), Some(-73.99));
        assert_eq!(record.text("longitude").as_deref(), Some("-73.99"));
    }

    #[test]
    fn test_serializes_in_column_order() {
        let record = Record::from_pairs([("zip", "94105"), ("country", "US"), ("abbr", "CA")]);
        let body = serde_json::to_string(&record).unwrap();
        assert_eq!(body, r#"{"zip":"94105","country":"US","abbr":"CA"}"#);
    }
}
