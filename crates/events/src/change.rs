use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use memberportal_core::RecordId;

/// What happened to a record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Inserted,
    Updated,
    Deleted,
}

/// A single write observed on a store table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeNotice {
    pub table: String,
    pub record_id: RecordId,
    pub kind: ChangeKind,
    pub occurred_at: DateTime<Utc>,
}

impl ChangeNotice {
    pub fn new(table: impl Into<String>, record_id: RecordId, kind: ChangeKind) -> Self {
        Self {
            table: table.into(),
            record_id,
            kind,
            occurred_at: Utc::now(),
        }
    }
}

/// Messages that belong to one store table.
///
/// Buses use this to deliver table-scoped subscriptions.
pub trait TableScoped {
    fn table(&self) -> &str;
}

impl TableScoped for ChangeNotice {
    fn table(&self) -> &str {
        &self.table
    }
}
