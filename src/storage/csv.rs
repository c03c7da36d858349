//! CSV file adapters
//!
//! A reader that turns header + data rows into records of string scalars,
//! and a rectangular writer that fixes its column set from the first batch.

use crate::connector::{Reader, Writer};
use crate::normalize::schema;
use crate::stream::{Batch, Record, RecordStream, Source};

use async_trait::async_trait;
use eyre::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
struct FileParams {
    path: PathBuf,
}

/// Read records from a CSV file with a header row.
///
/// Every cell becomes a string scalar keyed by its header; rows are
/// streamed one at a time, never buffered in full.
pub struct CsvReader {
    path: PathBuf,
}

impl CsvReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Build from registry parameters: `{"path": "…"}`
    pub fn from_params(params: Value) -> Result<Self> {
        let FileParams { path } =
            serde_json::from_value(params).context("invalid csv reader parameters")?;
        Ok(Self::new(path))
    }
}

#[async_trait]
impl Reader for CsvReader {
    async fn produce(&self) -> Result<RecordStream> {
        log::debug!("Opening CSV file: {}", self.path.display());
        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("failed to open CSV file: {}", self.path.display()))?;
        let headers = reader
            .headers()
            .with_context(|| format!("failed to read CSV header: {}", self.path.display()))?
            .clone();
        Ok(RecordStream::new(CsvSource {
            headers,
            rows: reader.into_records(),
        }))
    }
}

struct CsvSource {
    headers: csv::StringRecord,
    rows: csv::StringRecordsIntoIter<std::fs::File>,
}

#[async_trait]
impl Source for CsvSource {
    async fn next_record(&mut self) -> Result<Option<Record>> {
        match self.rows.next() {
            Some(row) => {
                let row = row.context("failed to read CSV row")?;
                let mut record = Record::new();
                for (header, cell) in self.headers.iter().zip(row.iter()) {
                    record.insert(header.to_string(), Value::String(cell.to_string()));
                }
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }
}

/// Write batches of records to a CSV file.
///
/// The first batch is unified to fix the header; later batches are mapped
/// onto those columns, with absent values written as empty cells and
/// columns that never appeared in the first batch dropped with a warning.
pub struct CsvWriter {
    path: PathBuf,
    sink: Option<CsvSink>,
}

struct CsvSink {
    writer: csv::Writer<std::fs::File>,
    columns: Vec<String>,
}

impl CsvWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            sink: None,
        }
    }

    /// Build from registry parameters: `{"path": "…"}`
    pub fn from_params(params: Value) -> Result<Self> {
        let FileParams { path } =
            serde_json::from_value(params).context("invalid csv writer parameters")?;
        Ok(Self::new(path))
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => crate::stream::stringify(other),
    }
}

#[async_trait]
impl Writer for CsvWriter {
    async fn write_batch(&mut self, batch: &Batch) -> Result<()> {
        let mut records = batch.records().to_vec();
        let unified = schema::unify(&mut records);

        if let Some(sink) = self.sink.as_ref() {
            for column in &unified {
                if !sink.columns.contains(column) {
                    log::warn!(
                        "Dropping column '{column}' absent from the first batch of {}",
                        self.path.display()
                    );
                }
            }
        } else {
            let mut writer = csv::Writer::from_path(&self.path)
                .with_context(|| format!("failed to create CSV file: {}", self.path.display()))?;
            writer
                .write_record(&unified)
                .context("failed to write CSV header")?;
            self.sink = Some(CsvSink {
                writer,
                columns: unified,
            });
        }
        let Some(sink) = self.sink.as_mut() else {
            eyre::bail!("CSV sink missing after initialization");
        };

        for record in &records {
            let row: Vec<String> = sink
                .columns
                .iter()
                .map(|column| record.get(column).map(cell).unwrap_or_default())
                .collect();
            sink.writer.write_record(&row).context("failed to write CSV row")?;
        }
        sink.writer.flush().context("failed to flush CSV file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().expect("test record must be an object").clone()
    }

    #[tokio::test]
    async fn test_read_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.csv");
        std::fs::write(&path, "id,name\n1,alpha\n2,beta\n").unwrap();

        let records = CsvReader::new(&path)
            .produce()
            .await
            .unwrap()
            .collect()
            .await
            .unwrap();

        assert_eq!(
            records,
            vec![
                record(json!({"id": "1", "name": "alpha"})),
                record(json!({"id": "2", "name": "beta"})),
            ]
        );
    }

    #[tokio::test]
    async fn test_write_unifies_heterogeneous_batch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.csv");

        let records = vec![
            record(json!({"a": 1, "b": "x"})),
            record(json!({"b": "y", "c": true})),
        ];

        let mut writer = CsvWriter::new(&path);
        writer
            .consume(RecordStream::from_records(records), 10)
            .await
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "a,b,c\n1,x,\n,y,true\n");
    }

    #[tokio::test]
    async fn test_later_batches_follow_first_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output.csv");

        let records = vec![
            record(json!({"a": 1, "b": 2})),
            record(json!({"a": 3, "late": 4})),
        ];

        // batch size 1 so the second record lands in its own batch
        let mut writer = CsvWriter::new(&path);
        writer
            .consume(RecordStream::from_records(records), 1)
            .await
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "a,b\n1,2\n3,\n");
    }

    #[tokio::test]
    async fn test_csv_round_trip() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.csv");
        let copy = dir.path().join("copy.csv");
        std::fs::write(&source, "id,name\n1,alpha\n2,beta\n").unwrap();

        let stream = CsvReader::new(&source).produce().await.unwrap();
        CsvWriter::new(&copy).consume(stream, 100).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&source).unwrap(),
            std::fs::read_to_string(&copy).unwrap()
        );
    }
}
