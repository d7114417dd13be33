use async_trait::async_trait;
use model::{Error, Record};
use std::fmt::{Display, Formatter};

/// Persist records to a named table.
///
/// A put is unconditional: writing a record whose `id` already exists
/// replaces the stored record.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn put_record(&self, table_name: &str, record: &Record) -> Result<(), StoreError>;
}

/// Errors arising from writing records.
#[derive(Debug)]
pub struct StoreError {
    pub record_id: String,

    pub operation: StoreOperation,
    pub reason: StoreErrorReason,
}

#[derive(Debug)]
pub enum StoreErrorReason {
    // The record could not be converted into the store's format
    BadRecord(String),
    // An error from the underlying store
    BackendFailure(Error),
}

#[derive(Debug, Clone)]
pub enum StoreOperation {
    PutRecord,
}

impl StoreError {
    pub fn new(record_id: String, operation: StoreOperation, reason: StoreErrorReason) -> Self {
        StoreError {
            record_id,
            operation,
            reason,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let reason: String = match &self.reason {
            StoreErrorReason::BadRecord(detail) => format!("bad record: {}", detail),
            StoreErrorReason::BackendFailure(err) => format!("backend failure: {}", err),
        };

        write!(
            f,
            "{:?} failed for record '{}', {}",
            self.operation, self.record_id, reason
        )
    }
}

impl std::error::Error for StoreError {}
