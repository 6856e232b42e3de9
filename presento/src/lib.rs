//! Presento - Presenters and transformers for schema-driven JSON output
//!
//! This crate provides the high-level presentation layer:
//!
//! - The [`Present`] trait declaring a presenter's schema and hooks
//! - The memoizing [`Presenter`] orchestrator with blank-input fallback
//! - Property [`Transformer`]s dispatched through prebuilt hook tables
//! - The [`Registry`] resolving nested presenters, transformers and naming strategies

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod presenter;
pub mod registry;
pub mod transformer;

// Re-export commonly used types
pub use presento_codec::{NestedRule, Projector, Rule, RuleSet};
pub use presento_format::{
    is_blank, is_collection, resolve, to_camel_case, OutputMode, PresentoError,
    ProjectionLimits, Record, Result,
};
pub use presenter::{Fallback, Handle, Present, Presenter};
pub use registry::{Built, NamingStrategy, NestedContext, PresenterFactory, Registry};
pub use transformer::{
    hook_name, HookTable, PropertySource, RegisteredTransformer, Transformation, Transformer,
    DEFAULT_NAMING_STRATEGY,
};

use serde_json::Value;

/// Present `data` once with `definition` against the global registry
pub fn present<P: Present>(definition: P, data: Value) -> Result<Value> {
    let mut presenter = Presenter::new(definition, data);
    presenter.handle()
}
