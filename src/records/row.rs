use std::sync::Arc;

use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::error::SqlSessionError;
use crate::types::{ColumnMap, SqlValue};

/// One materialized result row: ordered column names with parallel values.
///
/// Column names are shared across all rows of a result set. Records are
/// immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    columns: Arc<Vec<String>>,
    values: Vec<SqlValue>,
}

impl Record {
    /// Build a record from a shared column header and one row of values.
    ///
    /// # Errors
    /// Returns `SqlSessionError::ExecutionError` when the value count does
    /// not match the column count.
    pub fn new(columns: Arc<Vec<String>>, values: Vec<SqlValue>) -> Result<Self, SqlSessionError> {
        if columns.len() != values.len() {
            return Err(SqlSessionError::ExecutionError(format!(
                "record has {} columns but {} values",
                columns.len(),
                values.len()
            )));
        }
        Ok(Self { columns, values })
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Index of the first column with the given name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col == name)
    }

    /// Value of the first column with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.column_index(name).and_then(|idx| self.values.get(idx))
    }

    /// Value at the given column position.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    /// The row as an ordered name-to-value mapping.
    #[must_use]
    pub fn as_map(&self) -> ColumnMap {
        self.columns
            .iter()
            .cloned()
            .zip(self.values.iter().cloned())
            .collect()
    }

    /// The row as a JSON object, for attribute-style access.
    #[must_use]
    pub fn as_object(&self) -> JsonValue {
        let mut object = JsonMap::with_capacity(self.values.len());
        for (name, value) in self.columns.iter().zip(&self.values) {
            object.insert(name.clone(), value.to_json());
        }
        JsonValue::Object(object)
    }
}

impl serde::Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.as_object().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> Record {
        Record::new(
            Arc::new(vec!["id".into(), "name".into()]),
            vec![SqlValue::Int(1), SqlValue::Text("alice".into())],
        )
        .unwrap()
    }

    #[test]
    fn construction_rejects_arity_mismatch() {
        let result = Record::new(
            Arc::new(vec!["a".into(), "b".into()]),
            vec![SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(3)],
        );
        assert!(matches!(
            result,
            Err(SqlSessionError::ExecutionError(msg)) if msg.contains("2 columns")
        ));
    }

    #[test]
    fn lookup_by_name_and_position() {
        let row = record();
        assert_eq!(row.get("name"), Some(&SqlValue::Text("alice".into())));
        assert_eq!(row.get_by_index(0), Some(&SqlValue::Int(1)));
        assert_eq!(row.get("missing"), None);
        assert_eq!(row.get_by_index(9), None);
    }

    #[test]
    fn first_match_wins_on_duplicate_names() {
        let row = Record::new(
            Arc::new(vec!["x".into(), "x".into()]),
            vec![SqlValue::Int(1), SqlValue::Int(2)],
        )
        .unwrap();
        assert_eq!(row.get("x"), Some(&SqlValue::Int(1)));
    }

    #[test]
    fn map_preserves_column_order() {
        let map = record().as_map();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["id".to_string(), "name".to_string()]);
    }

    #[test]
    fn object_shape_serializes_values() {
        let object = record().as_object();
        assert_eq!(object, json!({"id": 1, "name": "alice"}));
        assert_eq!(serde_json::to_value(record()).unwrap(), object);
    }
}
