//! Record store boundary.
//!
//! The hosted database/auth backend is an external collaborator; the portal
//! only needs "fetch rows matching filters", "insert/update/delete a row" and
//! "notify on change". This module defines that surface, an in-memory
//! implementation, and an adapter that turns successful writes into
//! [`ChangeNotice`]s.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryRecordStore;
pub use r#trait::{Filter, Record, RecordStore, StoreError, record_id, to_record};

use memberportal_core::RecordId;
use memberportal_events::{ChangeBus, ChangeKind, ChangeNotice, Subscription};

/// Adapter that publishes a [`ChangeNotice`] after every successful write.
///
/// Ordering invariant: **publish happens only after the write succeeds**.
/// A failed publish is logged and does not fail the write; subscribers
/// recover by re-fetching.
pub struct PublishingRecordStore<S, B> {
    store: S,
    bus: B,
}

impl<S, B> PublishingRecordStore<S, B> {
    pub fn new(store: S, bus: B) -> Self {
        Self { store, bus }
    }

    pub fn into_parts(self) -> (S, B) {
        (self.store, self.bus)
    }
}

impl<S, B> PublishingRecordStore<S, B>
where
    B: ChangeBus<ChangeNotice>,
{
    /// `subscribeToChanges(table)`.
    pub fn subscribe(&self, table: &str) -> Subscription<ChangeNotice> {
        self.bus.subscribe_table(table)
    }

    fn notify(&self, table: &str, id: RecordId, kind: ChangeKind) {
        tracing::debug!(table, record_id = %id, ?kind, "record changed");
        if let Err(err) = self.bus.publish(ChangeNotice::new(table, id, kind)) {
            tracing::warn!(table, record_id = %id, ?kind, error = ?err, "change notice not published");
        }
    }
}

impl<S, B> RecordStore for PublishingRecordStore<S, B>
where
    S: RecordStore,
    B: ChangeBus<ChangeNotice>,
{
    fn query(&self, table: &str, filter: &Filter) -> Result<Vec<Record>, StoreError> {
        self.store.query(table, filter)
    }

    fn get(&self, table: &str, id: RecordId) -> Result<Option<Record>, StoreError> {
        self.store.get(table, id)
    }

    fn insert(&self, table: &str, record: Record) -> Result<Record, StoreError> {
        let stored = self.store.insert(table, record)?;
        self.notify(table, record_id(&stored)?, ChangeKind::Inserted);
        Ok(stored)
    }

    fn update(&self, table: &str, id: RecordId, patch: Record) -> Result<Record, StoreError> {
        let stored = self.store.update(table, id, patch)?;
        self.notify(table, id, ChangeKind::Updated);
        Ok(stored)
    }

    fn delete(&self, table: &str, id: RecordId) -> Result<(), StoreError> {
        self.store.delete(table, id)?;
        self.notify(table, id, ChangeKind::Deleted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use serde_json::json;

    use super::*;

    /// A bus whose every publish fails.
    struct ClosedBus;

    impl ChangeBus<ChangeNotice> for ClosedBus {
        type Error = &'static str;

        fn publish(&self, _message: ChangeNotice) -> Result<(), Self::Error> {
            Err("bus closed")
        }

        fn subscribe(&self) -> Subscription<ChangeNotice> {
            Subscription::new(mpsc::channel().1)
        }

        fn subscribe_table(&self, _table: &str) -> Subscription<ChangeNotice> {
            self.subscribe()
        }
    }

    fn row(value: serde_json::Value) -> Record {
        match value {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn writes_succeed_when_publish_fails() {
        let store = PublishingRecordStore::new(InMemoryRecordStore::new(), ClosedBus);

        let stored = store.insert("offers", row(json!({ "title": "Fuel card" }))).unwrap();
        let id = record_id(&stored).unwrap();

        let updated = store
            .update("offers", id, row(json!({ "title": "Fuel card plus" })))
            .unwrap();
        assert_eq!(updated["title"], "Fuel card plus");
        assert_eq!(store.get("offers", id).unwrap(), Some(updated));

        store.delete("offers", id).unwrap();
        assert_eq!(store.get("offers", id).unwrap(), None);
    }

    #[test]
    fn failed_writes_publish_nothing() {
        let bus = memberportal_events::InMemoryChangeBus::<ChangeNotice>::new();
        let store = PublishingRecordStore::new(InMemoryRecordStore::new(), bus);
        let notices = store.subscribe("offers");

        assert!(matches!(
            store.delete("offers", RecordId::new()),
            Err(StoreError::NotFound { .. })
        ));
        assert!(notices.drain().is_empty());
    }
}
