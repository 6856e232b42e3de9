//! Presento Format - Core primitives for schema-driven record projection
//!
//! This crate provides the building blocks shared by the projection engine and
//! the presenter layer, with no knowledge of schemas or presenters. It includes:
//!
//! - Dotted-path resolution into nested records
//! - The blank and collection predicates
//! - Casing helpers used as property naming strategies
//! - Error types
//! - Projection limits
//! - Output shapes

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod blank;
pub mod casing;
pub mod error;
pub mod limits;
pub mod path;

// Re-export commonly used types
pub use blank::{is_blank, is_collection, is_truthy};
pub use casing::to_camel_case;
pub use error::{PresentoError, Result};
pub use limits::ProjectionLimits;
pub use path::resolve;

/// Record type flowing through projections
pub type Record = serde_json::Value;

/// Shape of a presenter's output record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Mapping from output key to value
    #[default]
    Keyed,
    /// Ordered sequence of values in schema order ("datatable" format)
    Positional,
}

impl OutputMode {
    /// Human-readable name of this mode
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Keyed => "keyed",
            OutputMode::Positional => "positional",
        }
    }

    /// Check if output in this mode can be passed through a transformer
    pub fn is_transformable(&self) -> bool {
        matches!(self, OutputMode::Keyed)
    }
}
