//! Writer contract and the batch-buffer-flush driver

use crate::stream::{Batch, RecordStream};
use async_trait::async_trait;
use eyre::{Context, Result};
use std::time::Duration;

/// Base delay between flush attempts; grows linearly per attempt
const RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// A sink adapter consuming a stream in bounded batches.
///
/// Implementors provide `write_batch`, one atomic flush to the sink, and
/// own all destination-specific layout (paths, partitions, table names).
/// The provided `consume` driver handles the rest of the contract:
/// buffering, batch ordering, bounded flush retries.
///
/// The driver pulls the stream at the writer's own pace; that pull loop is
/// the system's only backpressure mechanism.
#[async_trait]
pub trait Writer: Send {
    /// Flush one batch to the sink as an atomic unit
    ///
    /// # Errors
    /// Returns an error if the flush fails; the driver retries up to
    /// [`retry_limit`](Writer::retry_limit) total attempts.
    async fn write_batch(&mut self, batch: &Batch) -> Result<()>;

    /// Total flush attempts per batch before the run fails
    fn retry_limit(&self) -> u32 {
        3
    }

    /// Drive the stream to exhaustion in batches of at most `batch_size`.
    ///
    /// Batches are flushed in the order their records were pulled. A batch
    /// whose flush keeps failing after [`retry_limit`](Writer::retry_limit)
    /// attempts fails the whole run; batches flushed before it remain
    /// committed and are not rolled back (at-least-once delivery). A
    /// terminal stream error likewise ends the run with everything already
    /// flushed left in place.
    ///
    /// Returns the number of records flushed.
    ///
    /// # Errors
    /// Returns an error if `batch_size` is zero, if the stream fails
    /// terminally, or if a batch exhausts its flush retries.
    async fn consume(&mut self, mut stream: RecordStream, batch_size: usize) -> Result<usize> {
        eyre::ensure!(batch_size > 0, "batch size must be at least 1");

        let mut buffer = Vec::with_capacity(batch_size);
        let mut flushed = 0usize;
        let mut batches = 0usize;

        loop {
            let end = match stream.produce().await? {
                Some(record) => {
                    buffer.push(record);
                    false
                }
                None => true,
            };

            if buffer.len() == batch_size || (end && !buffer.is_empty()) {
                let batch = Batch::new(std::mem::take(&mut buffer))?;
                let mut attempt = 1u32;
                loop {
                    match self.write_batch(&batch).await {
                        Ok(()) => break,
                        Err(error) if attempt < self.retry_limit() => {
                            log::warn!(
                                "Batch {} flush attempt {}/{} failed: {error:#}",
                                batches + 1,
                                attempt,
                                self.retry_limit()
                            );
                            tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                            attempt += 1;
                        }
                        Err(error) => {
                            return Err(error).with_context(|| {
                                format!("batch {} flush failed after {attempt} attempt(s)", batches + 1)
                            });
                        }
                    }
                }
                flushed += batch.len();
                batches += 1;
                log::debug!("Flushed batch {batches} ({} record(s))", batch.len());
                buffer = Vec::with_capacity(batch_size);
            }

            if end {
                break;
            }
        }

        log::info!("Flushed {flushed} record(s) in {batches} batch(es)");
        Ok(flushed)
    }
}
