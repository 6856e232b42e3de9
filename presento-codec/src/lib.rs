//! Presento Codec - Schema compilation and projection engine
//!
//! This crate turns schemas into rule sets and applies them to records:
//!
//! - Rule variants (field, alias, literal, nested)
//! - Rule set compilation from JSON or a typed builder
//! - The projector producing keyed or positional output

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod projector;
pub mod rule;
pub mod schema;

// Re-export commonly used types
pub use presento_format::{OutputMode, PresentoError, ProjectionLimits, Result};

// Re-export our own types
pub use projector::{NestedResolver, NoNested, Projector};
pub use rule::{NestedRule, Rule};
pub use schema::RuleSet;

/// Project `data` through `rules` without nested presenter support
pub fn project(
    data: &serde_json::Value,
    rules: &RuleSet,
    mode: OutputMode,
) -> Result<serde_json::Value> {
    Projector::flat(mode).process(data, rules)
}
