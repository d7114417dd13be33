use async_trait::async_trait;
use model::Record;
use store::{RecordStore, StoreError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Tables = HashMap<String, HashMap<String, Record>>;

/// Records keyed by table name, then by record id.
#[derive(Default)]
pub struct InMemoryRecordStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryRecordStore {
    // Every write is a single insert, so a poisoned map is still consistent
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get_record(&self, table_name: &str, id: &str) -> Option<Record> {
        self.tables()
            .get(table_name)
            .and_then(|table| table.get(id))
            .cloned()
    }

    pub fn records(&self, table_name: &str) -> Vec<Record> {
        self.tables()
            .get(table_name)
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of records held for a table.
    pub fn len(&self, table_name: &str) -> usize {
        self.tables()
            .get(table_name)
            .map_or(0, |table| table.len())
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn put_record(&self, table_name: &str, record: &Record) -> Result<(), StoreError> {
        self.tables()
            .entry(table_name.to_string())
            .or_default()
            .insert(record.id.clone(), record.clone());

        Ok(())
    }
}
