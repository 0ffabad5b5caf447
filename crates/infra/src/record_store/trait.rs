use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use memberportal_core::RecordId;

/// A row as the hosted store returns it: a JSON object with an `"id"` key.
pub type Record = Map<String, JsonValue>;

/// Field-equality conditions for a query. An empty filter matches every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, JsonValue)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field == value`.
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.conditions
            .iter()
            .all(|(field, value)| record.get(field) == Some(value))
    }
}

/// Record store operation error.
///
/// These are infrastructure errors (missing rows, malformed rows, backend
/// failures) as opposed to domain errors (validation).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record {id} not found in '{table}'")]
    NotFound { table: String, id: RecordId },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Table-oriented record store (the hosted database seen from the portal).
///
/// ## Semantics
///
/// - `query` returns rows of one table matching a [`Filter`], oldest first
/// - `insert` assigns an `"id"` (unless the row carries one) and `"created_at"`
/// - `update` merges `patch` into the row and stamps `"updated_at"`; the id is immutable
/// - `delete` removes the row
///
/// `update` and `delete` on a missing id fail with [`StoreError::NotFound`].
pub trait RecordStore: Send + Sync {
    fn query(&self, table: &str, filter: &Filter) -> Result<Vec<Record>, StoreError>;

    fn insert(&self, table: &str, record: Record) -> Result<Record, StoreError>;

    fn update(&self, table: &str, id: RecordId, patch: Record) -> Result<Record, StoreError>;

    fn delete(&self, table: &str, id: RecordId) -> Result<(), StoreError>;

    /// Fetch one row by id.
    fn get(&self, table: &str, id: RecordId) -> Result<Option<Record>, StoreError> {
        let mut rows = self.query(table, &Filter::new().where_eq("id", id.to_string()))?;
        Ok(rows.pop())
    }
}

impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    fn query(&self, table: &str, filter: &Filter) -> Result<Vec<Record>, StoreError> {
        (**self).query(table, filter)
    }

    fn insert(&self, table: &str, record: Record) -> Result<Record, StoreError> {
        (**self).insert(table, record)
    }

    fn update(&self, table: &str, id: RecordId, patch: Record) -> Result<Record, StoreError> {
        (**self).update(table, id, patch)
    }

    fn delete(&self, table: &str, id: RecordId) -> Result<(), StoreError> {
        (**self).delete(table, id)
    }

    fn get(&self, table: &str, id: RecordId) -> Result<Option<Record>, StoreError> {
        (**self).get(table, id)
    }
}

/// Read the `"id"` of a row.
pub fn record_id(record: &Record) -> Result<RecordId, StoreError> {
    let raw = record
        .get("id")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| StoreError::InvalidRecord("missing string 'id'".to_string()))?;
    raw.parse()
        .map_err(|e| StoreError::InvalidRecord(format!("{e}")))
}

/// Serialize a value into a row. Non-object values are rejected.
pub fn to_record<T: Serialize>(value: &T) -> Result<Record, StoreError> {
    match serde_json::to_value(value) {
        Ok(JsonValue::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::InvalidRecord(format!(
            "expected a JSON object, got {other}"
        ))),
        Err(e) => Err(StoreError::InvalidRecord(format!("serialization failed: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(value: JsonValue) -> Record {
        match value {
            JsonValue::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn filter_compares_typed_values() {
        let featured = row(json!({ "featured": true, "seats": 12, "region": "EMEA" }));

        assert!(Filter::new().where_eq("featured", true).matches(&featured));
        assert!(Filter::new().where_eq("seats", 12).matches(&featured));
        assert!(!Filter::new().where_eq("seats", "12").matches(&featured));
        assert!(!Filter::new().where_eq("region", JsonValue::Null).matches(&featured));
        assert!(Filter::new().matches(&featured));
    }

    #[test]
    fn id_filter_matches_stored_id_text() {
        let id = RecordId::new();
        let stored = row(json!({ "id": id.to_string() }));

        assert!(Filter::new().where_eq("id", id.to_string()).matches(&stored));
        assert_eq!(record_id(&stored).unwrap(), id);
    }
}
