//! Name-to-constructor registry for reader and writer adapters
//!
//! Adapters are selected by name with adapter-specific parameters passed
//! as a JSON value, so wiring a run is a pair of lookups instead of an
//! inheritance chain.

use super::{Reader, Writer};
use crate::storage::{ConsoleWriter, CsvReader, CsvWriter, NdjsonReader, NdjsonWriter};
use eyre::Result;
use serde_json::Value;
use std::collections::HashMap;

type ReaderFactory = Box<dyn Fn(Value) -> Result<Box<dyn Reader>> + Send + Sync>;
type WriterFactory = Box<dyn Fn(Value) -> Result<Box<dyn Writer>> + Send + Sync>;

/// Factory map from adapter names to constructors
///
/// # Example
/// ```
/// use connector_kit::connector::Registry;
/// use serde_json::json;
///
/// let registry = Registry::with_builtin();
/// let reader = registry.reader("ndjson", json!({"path": "input.ndjson"}))?;
/// let writer = registry.writer("console", json!(null))?;
/// # Ok::<(), eyre::Report>(())
/// ```
#[derive(Default)]
pub struct Registry {
    readers: HashMap<String, ReaderFactory>,
    writers: HashMap<String, WriterFactory>,
}

impl Registry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the built-in storage adapters:
    /// `ndjson` and `csv` readers, `ndjson`, `csv` and `console` writers.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register_reader("ndjson", |params| {
            Ok(Box::new(NdjsonReader::from_params(params)?) as Box<dyn Reader>)
        });
        registry.register_reader("csv", |params| {
            Ok(Box::new(CsvReader::from_params(params)?) as Box<dyn Reader>)
        });
        registry.register_writer("ndjson", |params| {
            Ok(Box::new(NdjsonWriter::from_params(params)?) as Box<dyn Writer>)
        });
        registry.register_writer("csv", |params| {
            Ok(Box::new(CsvWriter::from_params(params)?) as Box<dyn Writer>)
        });
        registry.register_writer("console", |params| {
            Ok(Box::new(ConsoleWriter::from_params(params)?) as Box<dyn Writer>)
        });
        registry
    }

    /// Register a reader constructor under a name, replacing any previous one
    pub fn register_reader<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(Value) -> Result<Box<dyn Reader>> + Send + Sync + 'static,
    {
        self.readers.insert(name.into(), Box::new(factory));
    }

    /// Register a writer constructor under a name, replacing any previous one
    pub fn register_writer<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(Value) -> Result<Box<dyn Writer>> + Send + Sync + 'static,
    {
        self.writers.insert(name.into(), Box::new(factory));
    }

    /// Construct the named reader from its parameters
    ///
    /// # Errors
    /// Returns an error for an unknown name or invalid parameters.
    pub fn reader(&self, name: &str, params: Value) -> Result<Box<dyn Reader>> {
        match self.readers.get(name) {
            Some(factory) => factory(params),
            None => eyre::bail!("unknown reader '{name}' (registered: {})", self.reader_names().join(", ")),
        }
    }

    /// Construct the named writer from its parameters
    ///
    /// # Errors
    /// Returns an error for an unknown name or invalid parameters.
    pub fn writer(&self, name: &str, params: Value) -> Result<Box<dyn Writer>> {
        match self.writers.get(name) {
            Some(factory) => factory(params),
            None => eyre::bail!("unknown writer '{name}' (registered: {})", self.writer_names().join(", ")),
        }
    }

    /// Registered reader names, sorted
    pub fn reader_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.readers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered writer names, sorted
    pub fn writer_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.writers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
