//! Connector toolkit core
//!
//! Independent reader and writer adapters exchange data through a common
//! intermediate representation, so any source can be piped into any
//! destination without bespoke glue per pair:
//!
//! ```text
//! Reader -> RecordStream -> (Normalizer) -> Writer
//!        or -> pipe encode -> process boundary -> pipe decode ->
//! ```
//!
//! - [`stream`]: lazy, single-pass, pull-based record sequences
//! - [`normalize`]: flattening nested records into tabular shape
//! - [`connector`]: the reader/writer contracts and adapter registry
//! - [`pipe`]: the newline-delimited wire format between processes
//! - [`storage`]: built-in NDJSON, CSV, and console adapters

pub mod connector;
pub mod normalize;
pub mod pipe;
pub mod storage;
pub mod stream;

// Re-exports for convenience
pub use connector::{Reader, Registry, Writer};
pub use normalize::{ExplodePolicy, ListMode, NormalizeConfig, Normalizer};
pub use stream::{Batch, Record, RecordStream, Source};
