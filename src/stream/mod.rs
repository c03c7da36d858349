//! Lazy record streams
//!
//! The intermediate representation connecting readers to writers:
//! - [`Record`]: one semi-structured unit of source data
//! - [`RecordStream`]: a lazy, single-pass, pull-based sequence of records
//! - [`Source`]: the trait a stream pulls from
//! - [`Batch`]: the bounded, ordered group of records a writer flushes

mod batch;
mod record;
mod record_stream;

pub use batch::Batch;
pub use record::{Record, is_scalar, stringify};
pub use record_stream::{RecordStream, Source};
