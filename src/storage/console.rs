//! Console writer
//!
//! Writes batches to standard output in the pipe wire format, making this
//! process's output a valid input stream for the next connector process.

use crate::connector::Writer;
use crate::pipe;
use crate::stream::Batch;

use async_trait::async_trait;
use eyre::{Context, Result};
use serde_json::Value;
use tokio::io::AsyncWriteExt;

pub struct ConsoleWriter;

impl ConsoleWriter {
    pub fn new() -> Self {
        Self
    }

    /// Build from registry parameters (none are taken)
    pub fn from_params(_params: Value) -> Result<Self> {
        Ok(Self)
    }
}

impl Default for ConsoleWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Writer for ConsoleWriter {
    async fn write_batch(&mut self, batch: &Batch) -> Result<()> {
        let mut payload = String::new();
        for record in batch.records() {
            payload.push_str(&pipe::encode_line(record)?);
        }

        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(payload.as_bytes())
            .await
            .context("failed to write to stdout")?;
        stdout.flush().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{Record, RecordStream};
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().expect("test record must be an object").clone()
    }

    #[tokio::test]
    async fn test_console_consumes_stream_in_batches() {
        let records = vec![
            record(json!({"n": 1})),
            record(json!({"n": 2})),
            record(json!({"n": 3})),
        ];

        let mut writer = ConsoleWriter::new();
        let flushed = writer
            .consume(RecordStream::from_records(records), 2)
            .await
            .unwrap();

        assert_eq!(flushed, 3);
    }

    #[test]
    fn test_from_params_takes_no_parameters() {
        assert!(ConsoleWriter::from_params(json!(null)).is_ok());
        assert!(ConsoleWriter::from_params(json!({"ignored": true})).is_ok());
    }
}
