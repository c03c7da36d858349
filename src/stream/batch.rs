//! Batch: the unit a writer flushes atomically to its sink

use super::Record;
use eyre::Result;

/// A finite, ordered, non-empty group of records.
///
/// Batches are built by the writer driver from consecutive pulls of a
/// stream, bounded by the configured batch size, and flushed to the sink
/// as one atomic unit in pull order.
#[derive(Clone, Debug)]
pub struct Batch {
    records: Vec<Record>,
}

impl Batch {
    /// Create a batch from records. Empty batches are rejected.
    pub fn new(records: Vec<Record>) -> Result<Self> {
        eyre::ensure!(!records.is_empty(), "a batch must contain at least one record");
        Ok(Self { records })
    }

    /// Number of records in the batch (always at least 1)
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Borrow the records in flush order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consume the batch, yielding its records
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    fn record(id: i64) -> Record {
        let mut record = Map::new();
        record.insert("id".to_string(), json!(id));
        record
    }

    #[test]
    fn test_batch_preserves_order() {
        let batch = Batch::new(vec![record(1), record(2), record(3)]).unwrap();
        assert_eq!(batch.len(), 3);
        let ids: Vec<_> = batch.records().iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_empty_batch_rejected() {
        assert!(Batch::new(Vec::new()).is_err());
    }
}
