//! Post-projection property transformers
//!
//! A transformer rewrites individual values of a keyed output record. Each
//! property name is turned into an identifier by a naming strategy
//! (`user_id` becomes `UserId` under the default strategy) and looked up as
//! the hook `getUserIdProperty`. Properties without a hook pass through
//! unchanged.
//!
//! Hooks are registered once per transformer into a [`HookTable`] rather
//! than discovered at dispatch time.
//!
//! # Example
//!
//! ```rust
//! use presento::transformer::{HookTable, Transformer};
//! use serde_json::json;
//!
//! struct UserTransformer;
//!
//! impl Transformer for UserTransformer {
//!     fn hooks(&self, table: &mut HookTable) {
//!         table.on("UserId", |value, _| match value.as_i64() {
//!             Some(id) => json!(-id),
//!             None => value,
//!         });
//!     }
//! }
//! ```

use crate::registry::{NamingStrategy, Registry};
use ahash::AHashMap;
use presento_format::{resolve, PresentoError, Result};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Naming strategy applied when a transformer does not choose one
pub const DEFAULT_NAMING_STRATEGY: &str = "to_camel_case";

/// Override function for a single property
pub type Hook = Arc<dyn Fn(Value, &PropertySource<'_>) -> Value + Send + Sync>;

/// Build the hook name for a property identifier
pub fn hook_name(identifier: &str) -> String {
    format!("get{}Property", identifier)
}

/// Trait for implementing property transformers
pub trait Transformer: Send + Sync {
    /// Name of the registered naming strategy turning properties into identifiers
    ///
    /// `None` disables casing and uses the raw property name.
    fn naming_strategy(&self) -> Option<&str> {
        Some(DEFAULT_NAMING_STRATEGY)
    }

    /// Register this transformer's hooks
    fn hooks(&self, table: &mut HookTable);
}

/// Capability table from hook name to override function
#[derive(Clone, Default)]
pub struct HookTable {
    hooks: AHashMap<String, Hook>,
}

impl HookTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table for `transformer`
    pub fn for_transformer(transformer: &dyn Transformer) -> Self {
        let mut table = Self::new();
        transformer.hooks(&mut table);
        table
    }

    /// Register a hook for the property identifier `identifier`
    pub fn on<F>(&mut self, identifier: &str, hook: F) -> &mut Self
    where
        F: Fn(Value, &PropertySource<'_>) -> Value + Send + Sync + 'static,
    {
        self.hooks.insert(hook_name(identifier), Arc::new(hook));
        self
    }

    /// Look up a hook by its full name (`get<Identifier>Property`)
    pub fn get(&self, name: &str) -> Option<&Hook> {
        self.hooks.get(name)
    }

    /// Check if a hook with the full name exists
    pub fn contains(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    /// Number of registered hooks
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Check if no hooks are registered
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Registered hook names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.hooks.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for HookTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookTable")
            .field("hooks", &self.names())
            .finish()
    }
}

/// Read-only view of the record being transformed
///
/// Hooks use it to look at sibling properties.
pub struct PropertySource<'a> {
    record: &'a Value,
}

impl<'a> PropertySource<'a> {
    /// Wrap a projected record
    pub fn new(record: &'a Value) -> Self {
        Self { record }
    }

    /// Resolve a dotted path against the untransformed record
    pub fn property(&self, path: &str) -> Value {
        resolve(self.record, path)
    }

    /// The whole untransformed record
    pub fn record(&self) -> &Value {
        self.record
    }
}

/// A transformer with its hook table built once at registration
pub struct RegisteredTransformer {
    name: String,
    transformer: Arc<dyn Transformer>,
    hooks: HookTable,
}

impl RegisteredTransformer {
    /// Build the hook table for `transformer`
    pub fn new(name: impl Into<String>, transformer: Arc<dyn Transformer>) -> Self {
        let hooks = HookTable::for_transformer(transformer.as_ref());
        Self {
            name: name.into(),
            transformer,
            hooks,
        }
    }

    /// Registered name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hook table built at registration
    pub fn hooks(&self) -> &HookTable {
        &self.hooks
    }

    /// Naming strategy declared by the transformer
    pub fn naming_strategy(&self) -> Option<&str> {
        self.transformer.naming_strategy()
    }
}

/// Dispatch table ready to rewrite records
///
/// Construction resolves the naming strategy, so a misconfigured
/// transformer fails before any hook runs.
pub struct Transformation<'a> {
    transformer: &'a RegisteredTransformer,
    strategy: Option<NamingStrategy>,
}

impl<'a> Transformation<'a> {
    /// Resolve `transformer`'s naming strategy against `registry`
    pub fn new(transformer: &'a RegisteredTransformer, registry: &Registry) -> Result<Self> {
        let strategy = match transformer.naming_strategy() {
            None | Some("") => None,
            Some(name) => Some(registry.naming_strategy(name).ok_or_else(|| {
                PresentoError::UnknownNamingStrategy {
                    name: name.to_string(),
                }
            })?),
        };

        Ok(Self {
            transformer,
            strategy,
        })
    }

    /// Identifier of `property` under the naming strategy
    pub fn identifier(&self, property: &str) -> String {
        match &self.strategy {
            Some(strategy) => strategy(property),
            None => property.to_string(),
        }
    }

    /// Rewrite one property value
    pub fn apply_property(&self, property: &str, value: Value, source: &PropertySource<'_>) -> Value {
        let name = hook_name(&self.identifier(property));
        match self.transformer.hooks().get(&name) {
            Some(hook) => {
                tracing::trace!(
                    transformer = self.transformer.name(),
                    property,
                    hook = %name,
                    "dispatching property hook"
                );
                hook(value, source)
            }
            None => value,
        }
    }

    /// Rewrite every property of a keyed record
    pub fn apply(&self, record: Map<String, Value>) -> Map<String, Value> {
        let original = Value::Object(record);
        let source = PropertySource::new(&original);

        let mut generated = Map::new();
        if let Value::Object(entries) = &original {
            for (property, value) in entries {
                let value = self.apply_property(property, value.clone(), &source);
                generated.insert(property.clone(), value);
            }
        }
        generated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Negate;

    impl Transformer for Negate {
        fn hooks(&self, table: &mut HookTable) {
            table.on("UserId", |value, _| match value.as_i64() {
                Some(id) => json!(-id),
                None => value,
            });
        }
    }

    struct RawNames;

    impl Transformer for RawNames {
        fn naming_strategy(&self) -> Option<&str> {
            None
        }

        fn hooks(&self, table: &mut HookTable) {
            table
                .on("user_id", |_, _| json!("raw"))
                .on("label", |value, source| {
                    json!(format!("{} ({})", value.as_str().unwrap_or(""), source.property("user_id")))
                });
        }
    }

    struct Misconfigured;

    impl Transformer for Misconfigured {
        fn naming_strategy(&self) -> Option<&str> {
            Some("no_such_strategy")
        }

        fn hooks(&self, _table: &mut HookTable) {}
    }

    fn registered(name: &str, transformer: impl Transformer + 'static) -> RegisteredTransformer {
        RegisteredTransformer::new(name, Arc::new(transformer))
    }

    #[test]
    fn hook_names_follow_identifier() {
        assert_eq!(hook_name("UserId"), "getUserIdProperty");
    }

    #[test]
    fn hook_table_is_built_once_from_transformer() {
        let transformer = registered("negate", Negate);
        assert_eq!(transformer.hooks().names(), vec!["getUserIdProperty"]);
        assert!(transformer.hooks().contains("getUserIdProperty"));
    }

    #[test]
    fn default_strategy_dispatches_cased_hook() {
        let registry = Registry::new();
        let transformer = registered("negate", Negate);
        let transformation = Transformation::new(&transformer, &registry).unwrap();

        assert_eq!(transformation.identifier("user_id"), "UserId");

        let record = json!({"user_id": 5, "name": "x"});
        let out = transformation.apply(record.as_object().unwrap().clone());
        assert_eq!(Value::Object(out), json!({"user_id": -5, "name": "x"}));
    }

    #[test]
    fn disabled_strategy_uses_raw_property() {
        let registry = Registry::new();
        let transformer = registered("raw", RawNames);
        let transformation = Transformation::new(&transformer, &registry).unwrap();

        let record = json!({"user_id": 5, "label": "tag"});
        let out = transformation.apply(record.as_object().unwrap().clone());
        // Hooks see the untransformed siblings
        assert_eq!(Value::Object(out), json!({"user_id": "raw", "label": "tag (5)"}));
    }

    #[test]
    fn unknown_strategy_fails_at_construction() {
        let registry = Registry::new();
        let transformer = registered("bad", Misconfigured);
        let result = Transformation::new(&transformer, &registry);
        assert!(matches!(
            result,
            Err(PresentoError::UnknownNamingStrategy { ref name }) if name == "no_such_strategy"
        ));
    }

    #[test]
    fn property_source_resolves_paths() {
        let record = json!({"projects": [{"name": "JsonQ"}]});
        let source = PropertySource::new(&record);
        assert_eq!(source.property("projects.0.name"), json!("JsonQ"));
        assert_eq!(source.property("missing"), Value::Null);
    }
}
