//! Reader and writer adapter contracts
//!
//! The two capability interfaces every adapter satisfies:
//! - [`Reader`]: `produce() -> RecordStream`, owning source auth,
//!   pagination, and retry
//! - [`Writer`]: `consume(stream, batch_size)`, flushing bounded batches
//!   atomically and in order
//!
//! plus the [`Registry`] that resolves adapter names to constructors.

mod reader;
mod registry;
mod writer;

pub use reader::Reader;
pub use registry::Registry;
pub use writer::Writer;
