//! NDJSON file adapters
//!
//! The file-based ends of the pipe protocol: a reader that lazily streams
//! records out of an NDJSON file, and a writer that appends batches to one.

use crate::connector::{Reader, Writer};
use crate::pipe;
use crate::stream::{Batch, RecordStream};

use async_trait::async_trait;
use eyre::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

#[derive(Deserialize)]
struct FileParams {
    path: PathBuf,
}

/// Read records from an NDJSON file, one line at a time
pub struct NdjsonReader {
    path: PathBuf,
}

impl NdjsonReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Build from registry parameters: `{"path": "…"}`
    pub fn from_params(params: Value) -> Result<Self> {
        let FileParams { path } =
            serde_json::from_value(params).context("invalid ndjson reader parameters")?;
        Ok(Self::new(path))
    }
}

#[async_trait]
impl Reader for NdjsonReader {
    async fn produce(&self) -> Result<RecordStream> {
        log::debug!("Opening NDJSON file: {}", self.path.display());
        let file = tokio::fs::File::open(&self.path)
            .await
            .with_context(|| format!("failed to open NDJSON file: {}", self.path.display()))?;
        Ok(pipe::decode(tokio::io::BufReader::new(file)))
    }
}

/// Append batches of records to an NDJSON file
pub struct NdjsonWriter {
    path: PathBuf,
}

impl NdjsonWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Build from registry parameters: `{"path": "…"}`
    pub fn from_params(params: Value) -> Result<Self> {
        let FileParams { path } =
            serde_json::from_value(params).context("invalid ndjson writer parameters")?;
        Ok(Self::new(path))
    }
}

#[async_trait]
impl Writer for NdjsonWriter {
    async fn write_batch(&mut self, batch: &Batch) -> Result<()> {
        // one buffered payload per batch so the append is a single write
        let mut payload = String::new();
        for record in batch.records() {
            payload.push_str(&pipe::encode_line(record)?);
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("failed to open NDJSON file: {}", self.path.display()))?;
        file.write_all(payload.as_bytes())
            .await
            .with_context(|| format!("failed to append to NDJSON file: {}", self.path.display()))?;
        file.flush().await?;

        Ok(())
    }
}
