//! Pull-based record stream and its lazy combinators

use super::Record;
use async_trait::async_trait;
use eyre::Result;

/// A producer of records, pulled one at a time.
///
/// `next_record` is the stream's only suspension point and may block on
/// network or disk I/O. Returning `Ok(None)` signals end-of-stream;
/// returning an error signals a terminal production failure after the
/// source's own retry policy is exhausted.
#[async_trait]
pub trait Source: Send {
    /// Produce the next record, or `None` at end-of-stream
    async fn next_record(&mut self) -> Result<Option<Record>>;
}

/// A lazy, single-pass, ordered sequence of records.
///
/// A stream is pulled by exactly one consumer (a writer or the pipe
/// encoder); nothing is produced ahead of what has been pulled, so memory
/// stays bounded to the record in flight regardless of stream length.
///
/// After end-of-stream or a terminal error the stream latches closed and
/// every further `produce` call returns `Ok(None)`. Records delivered
/// before a terminal error remain valid; nothing is rolled back.
///
/// # Example
/// ```
/// use connector_kit::stream::RecordStream;
/// use serde_json::json;
///
/// # async fn example() -> eyre::Result<()> {
/// let a = RecordStream::from_records(vec![json!({"id": 1}).as_object().unwrap().clone()]);
/// let b = RecordStream::from_records(vec![json!({"id": 2}).as_object().unwrap().clone()]);
///
/// let mut stream = a.concat(b);
/// while let Some(record) = stream.produce().await? {
///     println!("{record:?}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct RecordStream {
    source: Box<dyn Source>,
    done: bool,
}

impl RecordStream {
    /// Wrap a source into a stream
    pub fn new(source: impl Source + 'static) -> Self {
        Self {
            source: Box::new(source),
            done: false,
        }
    }

    /// A stream over an in-memory record collection
    pub fn from_records(records: Vec<Record>) -> Self {
        Self::new(Records {
            remaining: records.into_iter(),
        })
    }

    /// Pull the next record, or `None` at end-of-stream.
    ///
    /// Single-pass: a pulled record is never re-offered.
    ///
    /// # Errors
    /// Returns the source's terminal error once; the stream then stays
    /// closed.
    pub async fn produce(&mut self) -> Result<Option<Record>> {
        if self.done {
            return Ok(None);
        }
        match self.source.next_record().await {
            Ok(Some(record)) => Ok(Some(record)),
            Ok(None) => {
                self.done = true;
                Ok(None)
            }
            Err(error) => {
                self.done = true;
                Err(error)
            }
        }
    }

    /// Apply a transform to each record as it is pulled.
    ///
    /// Lazy: the transform runs on one record at a time, when that record
    /// is requested. A transform error is terminal for the stream.
    pub fn map<F>(self, transform: F) -> Self
    where
        F: FnMut(Record) -> Result<Record> + Send + 'static,
    {
        Self::new(Mapped {
            inner: self,
            transform,
        })
    }

    /// Chain another stream after this one.
    ///
    /// Pulls all of `self` in order, then all of `other`; `other`'s source
    /// is not touched until `self` is exhausted.
    pub fn concat(self, other: RecordStream) -> Self {
        Self::new(Chained {
            first: self,
            second: other,
            on_second: false,
        })
    }

    /// Drain the stream into a `Vec`, consuming it.
    ///
    /// Materializes every remaining record; intended for tests and small
    /// streams, not for unbounded sources.
    pub async fn collect(mut self) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        while let Some(record) = self.produce().await? {
            records.push(record);
        }
        Ok(records)
    }
}

struct Records {
    remaining: std::vec::IntoIter<Record>,
}

#[async_trait]
impl Source for Records {
    async fn next_record(&mut self) -> Result<Option<Record>> {
        Ok(self.remaining.next())
    }
}

struct Mapped<F> {
    inner: RecordStream,
    transform: F,
}

#[async_trait]
impl<F> Source for Mapped<F>
where
    F: FnMut(Record) -> Result<Record> + Send,
{
    async fn next_record(&mut self) -> Result<Option<Record>> {
        match self.inner.produce().await? {
            Some(record) => (self.transform)(record).map(Some),
            None => Ok(None),
        }
    }
}

struct Chained {
    first: RecordStream,
    second: RecordStream,
    on_second: bool,
}

#[async_trait]
impl Source for Chained {
    async fn next_record(&mut self) -> Result<Option<Record>> {
        if !self.on_second {
            if let Some(record) = self.first.produce().await? {
                return Ok(Some(record));
            }
            self.on_second = true;
        }
        self.second.produce().await
    }
}
