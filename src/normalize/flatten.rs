//! Nested record flattening
//!
//! Turns one arbitrarily nested record into one or more flat records whose
//! values are all scalars, keyed by the path of enclosing keys.

use super::{ExplodePolicy, ListMode, NormalizeConfig};
use crate::stream::{Record, RecordStream, Source, stringify};
use async_trait::async_trait;
use eyre::Result;
use serde_json::Value;
use std::collections::VecDeque;

/// Separator used when a list of scalars is joined into one value
const JOIN_SEPARATOR: &str = ",";

/// Deterministic flattener for nested records
///
/// Walks a record depth-first and keys each leaf scalar by its path of
/// enclosing keys joined with the configured delimiter. Lists of scalars
/// follow the configured [`ListMode`]; lists of mappings are always
/// exploded, repeating the parent's scalar fields alongside each child so
/// every emitted row is one leaf entity plus its ancestry of context.
///
/// Normalizing an already-flat record is a no-op, so running a stream
/// through two identically configured normalizers is safe.
///
/// # Example
/// ```
/// use connector_kit::normalize::{NormalizeConfig, Normalizer};
/// use serde_json::json;
///
/// let normalizer = Normalizer::new(NormalizeConfig::default());
/// let record = json!({"a": 1, "b": {"c": 2, "d": [3, 4]}});
///
/// let flat = normalizer.normalize(record.as_object().unwrap());
/// assert_eq!(flat.len(), 1);
/// assert_eq!(flat[0]["b.c"], json!(2));
/// assert_eq!(flat[0]["b.d"], json!("3,4"));
/// ```
#[derive(Clone, Debug)]
pub struct Normalizer {
    config: NormalizeConfig,
}

impl Normalizer {
    pub fn new(config: NormalizeConfig) -> Self {
        Self { config }
    }

    /// Flatten one record into one or more flat records.
    ///
    /// Returns a single record unless a list is exploded, in which case one
    /// record per branch is returned in element order. Never fails:
    /// ambiguous shapes coerce to their string form instead.
    pub fn normalize(&self, record: &Record) -> Vec<Record> {
        let mut branches = vec![Record::new()];
        let mut exploded = false;
        self.walk_object("", record, &mut branches, &mut exploded);
        branches
    }

    /// Wrap a stream so records are normalized as they are pulled.
    ///
    /// Lazy: only the explode branches of the record currently in flight
    /// are buffered.
    pub fn stream(self, inner: RecordStream) -> RecordStream {
        RecordStream::new(Normalized {
            inner,
            normalizer: self,
            pending: VecDeque::new(),
        })
    }

    fn join_path(&self, prefix: &str, key: &str) -> String {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}{}{key}", self.config.delimiter)
        }
    }

    fn walk_object(
        &self,
        prefix: &str,
        object: &Record,
        branches: &mut Vec<Record>,
        exploded: &mut bool,
    ) {
        for (key, value) in object {
            let path = self.join_path(prefix, key);
            self.walk_value(&path, value, branches, exploded);
        }
    }

    fn walk_value(&self, path: &str, value: &Value, branches: &mut Vec<Record>, exploded: &mut bool) {
        match value {
            Value::Object(object) => self.walk_object(path, object, branches, exploded),
            Value::Array(elements) => self.walk_list(path, elements, branches, exploded),
            scalar => {
                for branch in branches.iter_mut() {
                    branch.insert(path.to_string(), scalar.clone());
                }
            }
        }
    }

    fn walk_list(
        &self,
        path: &str,
        elements: &[Value],
        branches: &mut Vec<Record>,
        exploded: &mut bool,
    ) {
        if elements.is_empty() {
            // keep the key so the column survives schema unification
            let fill = match self.config.list_mode {
                ListMode::Join => Value::String(String::new()),
                ListMode::Explode => Value::Null,
            };
            for branch in branches.iter_mut() {
                branch.insert(path.to_string(), fill.clone());
            }
            return;
        }

        // a list holding any mapping is denormalized into child rows,
        // whatever the configured mode
        if elements.iter().any(Value::is_object) {
            self.explode(path, elements, branches, exploded);
            return;
        }

        let join = match self.config.list_mode {
            ListMode::Join => true,
            ListMode::Explode => {
                self.config.explode_policy == ExplodePolicy::FirstListOnly && *exploded
            }
        };
        if join {
            let joined = elements.iter().map(stringify).collect::<Vec<_>>().join(JOIN_SEPARATOR);
            for branch in branches.iter_mut() {
                branch.insert(path.to_string(), Value::String(joined.clone()));
            }
        } else {
            self.explode(path, elements, branches, exploded);
        }
    }

    /// Multiply the current branches by the list's elements, in element order
    fn explode(&self, path: &str, elements: &[Value], branches: &mut Vec<Record>, exploded: &mut bool) {
        *exploded = true;
        let base = std::mem::take(branches);
        for branch in base {
            for element in elements {
                let mut expansion = vec![branch.clone()];
                self.walk_value(path, element, &mut expansion, exploded);
                branches.append(&mut expansion);
            }
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizeConfig::default())
    }
}

/// Stream adapter produced by [`Normalizer::stream`]
struct Normalized {
    inner: RecordStream,
    normalizer: Normalizer,
    pending: VecDeque<Record>,
}

#[async_trait]
impl Source for Normalized {
    async fn next_record(&mut self) -> Result<Option<Record>> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Ok(Some(record));
            }
            match self.inner.produce().await? {
                Some(record) => self.pending.extend(self.normalizer.normalize(&record)),
                None => return Ok(None),
            }
        }
    }
}
