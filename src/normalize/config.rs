//! Normalization configuration
//!
//! Explicit per-run settings passed at `Normalizer` construction; the core
//! holds no ambient or process-global configuration state.

use serde::Deserialize;

/// How a list of scalars is flattened
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListMode {
    /// Collapse the list into one comma-joined string at the list's path
    #[default]
    Join,
    /// Split the record into one output branch per list element
    Explode,
}

/// How multiple explodable lists within one record interact
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExplodePolicy {
    /// Every exploded list multiplies the branches (full Cartesian expansion)
    #[default]
    Cartesian,
    /// Only the first scalar list encountered explodes; later ones are joined
    FirstListOnly,
}

/// Settings for flattening nested records
///
/// # Example
/// ```
/// use connector_kit::normalize::{ListMode, NormalizeConfig};
///
/// let config: NormalizeConfig = serde_json::from_str(r#"{"list_mode": "explode"}"#)?;
/// assert_eq!(config.delimiter, ".");
/// assert_eq!(config.list_mode, ListMode::Explode);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Joins the path of enclosing keys into one output key
    pub delimiter: String,
    pub list_mode: ListMode,
    pub explode_policy: ExplodePolicy,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            delimiter: ".".to_string(),
            list_mode: ListMode::default(),
            explode_policy: ExplodePolicy::default(),
        }
    }
}
