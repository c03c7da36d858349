//! Built-in storage adapters
//!
//! Concrete readers and writers for file and console sinks:
//! - NDJSON file reading/writing
//! - CSV file reading/writing
//! - Console (stdout) output in the pipe wire format

mod console;
mod csv;
mod ndjson;

pub use console::ConsoleWriter;
pub use csv::{CsvReader, CsvWriter};
pub use ndjson::{NdjsonReader, NdjsonWriter};
