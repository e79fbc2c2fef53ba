//! Record store used for job posts and applications.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tables the intake flows write to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Jobs,
    JobApplications,
}

impl Table {
    pub const fn name(self) -> &'static str {
        match self {
            Table::Jobs => "jobs",
            Table::JobApplications => "job_applications",
        }
    }
}

/// A stored row with the identity and timestamp the store assigns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRow {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// External persistence. Failures are reported, never retried.
pub trait RecordStore: Send + Sync {
    fn insert(
        &self,
        table: Table,
        fields: serde_json::Map<String, serde_json::Value>,
    ) -> Result<StoredRow, StoreError>;

    /// Every row of `table`, newest first.
    fn query_all(&self, table: Table) -> Result<Vec<StoredRow>, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("record could not be encoded: {0}")]
    Encoding(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Encoding(err.to_string())
    }
}

/// Serialize `record` to the column map a store expects.
pub fn to_fields<T: Serialize>(
    record: &T,
) -> Result<serde_json::Map<String, serde_json::Value>, StoreError> {
    match serde_json::to_value(record)? {
        serde_json::Value::Object(fields) => Ok(fields),
        other => Err(StoreError::Encoding(format!(
            "expected an object, found {other}"
        ))),
    }
}

#[derive(Default, Clone)]
pub struct InMemoryRecordStore {
    tables: Arc<Mutex<HashMap<Table, Vec<StoredRow>>>>,
    sequence: Arc<AtomicU64>,
}

impl InMemoryRecordStore {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Table, Vec<StoredRow>>>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("record store mutex poisoned".to_string()))
    }
}

impl RecordStore for InMemoryRecordStore {
    fn insert(
        &self,
        table: Table,
        fields: serde_json::Map<String, serde_json::Value>,
    ) -> Result<StoredRow, StoreError> {
        let row = StoredRow {
            id: self.sequence.fetch_add(1, Ordering::Relaxed) + 1,
            created_at: Utc::now(),
            fields,
        };
        self.lock()?.entry(table).or_default().push(row.clone());
        Ok(row)
    }

    fn query_all(&self, table: Table) -> Result<Vec<StoredRow>, StoreError> {
        let guard = self.lock()?;
        let mut rows = guard.get(&table).cloned().unwrap_or_default();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn rows_come_back_newest_first() {
        let store = InMemoryRecordStore::default();
        store
            .insert(Table::Jobs, fields(json!({"job_title": "Porter"})))
            .expect("insert");
        store
            .insert(Table::Jobs, fields(json!({"job_title": "Tout"})))
            .expect("insert");

        let rows = store.query_all(Table::Jobs).expect("query");
        let titles: Vec<_> = rows
            .iter()
            .map(|row| row.fields["job_title"].as_str().unwrap_or_default())
            .collect();
        assert_eq!(titles, vec!["Tout", "Porter"]);
        assert!(rows[0].id > rows[1].id);
    }

    #[test]
    fn tables_are_separate() {
        let store = InMemoryRecordStore::default();
        store
            .insert(Table::JobApplications, fields(json!({"age": 21})))
            .expect("insert");
        assert!(store.query_all(Table::Jobs).expect("query").is_empty());
        assert_eq!(
            store
                .query_all(Table::JobApplications)
                .expect("query")
                .len(),
            1
        );
    }

    #[test]
    fn stored_rows_flatten_fields() {
        let store = InMemoryRecordStore::default();
        let row = store
            .insert(Table::Jobs, fields(json!({"status": "active"})))
            .expect("insert");
        let json = serde_json::to_value(&row).expect("serializes");
        assert_eq!(json["status"], "active");
        assert_eq!(json["id"], 1);
    }

    #[test]
    fn non_object_records_are_rejected() {
        assert!(matches!(to_fields(&42), Err(StoreError::Encoding(_))));
        assert_eq!(Table::JobApplications.name(), "job_applications");
    }
}
