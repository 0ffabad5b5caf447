use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use chrono::Utc;
use serde_json::Value as JsonValue;

use memberportal_core::RecordId;

use super::r#trait::{Filter, Record, RecordStore, StoreError, record_id};

/// In-memory record store.
///
/// Intended for tests/dev. Rows are keyed by UUIDv7 ids, so iteration order
/// is insertion order for generated ids.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    tables: RwLock<HashMap<String, BTreeMap<RecordId, Record>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn now() -> JsonValue {
    JsonValue::String(Utc::now().to_rfc3339())
}

impl RecordStore for InMemoryRecordStore {
    fn query(&self, table: &str, filter: &Filter) -> Result<Vec<Record>, StoreError> {
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;

        Ok(tables
            .get(table)
            .map(|rows| {
                rows.values()
                    .filter(|row| filter.matches(row))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get(&self, table: &str, id: RecordId) -> Result<Option<Record>, StoreError> {
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        Ok(tables.get(table).and_then(|rows| rows.get(&id)).cloned())
    }

    fn insert(&self, table: &str, mut record: Record) -> Result<Record, StoreError> {
        let id = match record.get("id") {
            Some(_) => record_id(&record)?,
            None => {
                let id = RecordId::new();
                record.insert("id".to_string(), JsonValue::String(id.to_string()));
                id
            }
        };
        record.entry("created_at").or_insert_with(now);

        let mut tables = self.tables.write().map_err(|_| StoreError::Poisoned)?;
        let rows = tables.entry(table.to_string()).or_default();

        if rows.contains_key(&id) {
            return Err(StoreError::Conflict(format!(
                "record {id} already exists in '{table}'"
            )));
        }

        rows.insert(id, record.clone());
        Ok(record)
    }

    fn update(&self, table: &str, id: RecordId, patch: Record) -> Result<Record, StoreError> {
        let mut tables = self.tables.write().map_err(|_| StoreError::Poisoned)?;

        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.get_mut(&id))
            .ok_or_else(|| StoreError::NotFound {
                table: table.to_string(),
                id,
            })?;

        for (field, value) in patch {
            if field != "id" {
                row.insert(field, value);
            }
        }
        row.insert("updated_at".to_string(), now());

        Ok(row.clone())
    }

    fn delete(&self, table: &str, id: RecordId) -> Result<(), StoreError> {
        let mut tables = self.tables.write().map_err(|_| StoreError::Poisoned)?;

        tables
            .get_mut(table)
            .and_then(|rows| rows.remove(&id))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound {
                table: table.to_string(),
                id,
            })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(value: JsonValue) -> Record {
        match value {
            JsonValue::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn insert_assigns_id_and_timestamp() {
        let store = InMemoryRecordStore::new();
        let stored = store
            .insert("events", row(json!({ "title": "Expo" })))
            .unwrap();

        let id = record_id(&stored).unwrap();
        assert!(stored.contains_key("created_at"));
        assert_eq!(store.get("events", id).unwrap(), Some(stored));
    }

    #[test]
    fn insert_with_existing_id_conflicts() {
        let store = InMemoryRecordStore::new();
        let id = RecordId::new();
        let record = row(json!({ "id": id.to_string() }));

        store.insert("offers", record.clone()).unwrap();
        assert!(matches!(
            store.insert("offers", record),
            Err(StoreError::Conflict(_))
        ));
    }

    #[test]
    fn query_filters_by_field_and_table() {
        let store = InMemoryRecordStore::new();
        store.insert("resources", row(json!({ "category": "Finance" }))).unwrap();
        store.insert("resources", row(json!({ "category": "Legal" }))).unwrap();
        store.insert("offers", row(json!({ "category": "Finance" }))).unwrap();

        let finance = store
            .query("resources", &Filter::new().where_eq("category", "Finance"))
            .unwrap();
        assert_eq!(finance.len(), 1);
        assert_eq!(store.query("resources", &Filter::new()).unwrap().len(), 2);
        assert!(store.query("missing", &Filter::new()).unwrap().is_empty());
    }

    #[test]
    fn update_merges_patch_but_keeps_id() {
        let store = InMemoryRecordStore::new();
        let stored = store
            .insert("updates", row(json!({ "title": "Old", "tier_restriction": "Gold Member" })))
            .unwrap();
        let id = record_id(&stored).unwrap();

        let updated = store
            .update(
                "updates",
                id,
                row(json!({ "title": "New", "id": RecordId::new().to_string() })),
            )
            .unwrap();

        assert_eq!(updated["title"], "New");
        assert_eq!(updated["tier_restriction"], "Gold Member");
        assert_eq!(record_id(&updated).unwrap(), id);
        assert!(updated.contains_key("updated_at"));
    }

    #[test]
    fn update_and_delete_of_missing_row_fail() {
        let store = InMemoryRecordStore::new();
        let id = RecordId::new();

        assert!(matches!(
            store.update("events", id, Record::new()),
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete("events", id),
            Err(StoreError::NotFound { .. })
        ));
    }
}
