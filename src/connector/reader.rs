//! Reader contract for source adapters

use crate::stream::RecordStream;
use async_trait::async_trait;
use eyre::Result;

/// A source adapter producing a stream of raw records.
///
/// Implementors own everything source-specific: authentication, pagination,
/// session lifecycle, and transient-error retry/backoff. By the time an
/// error escapes `produce` (or a pulled record's source), it is terminal;
/// the core never retries on a reader's behalf.
///
/// Records come out in source-natural order, possibly nested; a lazy
/// implementation fetches one page only when its records are pulled.
///
/// # Example
/// ```no_run
/// use connector_kit::connector::Reader;
/// use connector_kit::stream::RecordStream;
/// use async_trait::async_trait;
/// use eyre::Result;
///
/// struct FixtureReader {
///     records: Vec<connector_kit::stream::Record>,
/// }
///
/// #[async_trait]
/// impl Reader for FixtureReader {
///     async fn produce(&self) -> Result<RecordStream> {
///         Ok(RecordStream::from_records(self.records.clone()))
///     }
/// }
/// ```
#[async_trait]
pub trait Reader: Send + Sync {
    /// Open the source and return its record stream
    ///
    /// # Errors
    /// Returns an error if the source cannot be opened (after the reader's
    /// own retry policy is exhausted).
    async fn produce(&self) -> Result<RecordStream>;
}
