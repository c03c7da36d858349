//! Record normalization
//!
//! Flattens arbitrarily nested records into the uniform tabular shape
//! rectangular sinks consume:
//! - [`Normalizer`]: depth-first flattening of one record under a
//!   [`NormalizeConfig`] (delimiter, list handling)
//! - [`schema::unify`]: per-batch column unification for heterogeneous
//!   record sets

mod config;
mod flatten;
pub mod schema;

pub use config::{ExplodePolicy, ListMode, NormalizeConfig};
pub use flatten::Normalizer;
