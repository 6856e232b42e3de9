//! Presenters
//!
//! A presenter binds an input record to a rule set and an optional
//! transformer. Implement [`Present`] to declare the schema and hooks, then
//! wrap the definition in a [`Presenter`] to run it:
//!
//! ```rust
//! use presento::{Present, Presenter, RuleSet};
//! use serde_json::json;
//!
//! struct UserPresenter;
//!
//! impl Present for UserPresenter {
//!     fn present(&self) -> RuleSet {
//!         RuleSet::new().alias("user_id", "id").field("name")
//!     }
//! }
//!
//! let mut presenter = Presenter::new(UserPresenter, json!({"id": 7, "name": "Nahid", "pw": "x"}));
//! assert_eq!(presenter.get().unwrap(), &json!({"user_id": 7, "name": "Nahid"}));
//! ```
//!
//! The output is computed on the first [`Presenter::get`] and cached. Mutators
//! called afterwards only take effect once [`Presenter::invalidate`] drops the
//! cached output.

use crate::registry::{Built, NestedContext, Registry};
use presento_codec::{NestedResolver, NestedRule, Projector, RuleSet};
use presento_format::{is_blank, OutputMode, ProjectionLimits, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Behaviour when the mapped input record is blank
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fallback {
    /// Schema used instead of [`Present::present`] when non-empty
    pub schema: RuleSet,
    /// Output returned verbatim when `schema` is empty
    pub value: Value,
}

impl Fallback {
    /// Fall back to a fixed output value
    pub fn value(value: Value) -> Self {
        Self {
            schema: RuleSet::new(),
            value,
        }
    }

    /// Fall back to projecting the blank record through `schema`
    pub fn schema(schema: RuleSet) -> Self {
        Self {
            schema,
            value: Value::Null,
        }
    }
}

/// Declaration of a presenter
///
/// Only [`Present::present`] is required; everything else has a default.
pub trait Present {
    /// Rule set describing the output, built once at construction
    fn present(&self) -> RuleSet;

    /// Name of the registered transformer applied to keyed output
    fn transformer(&self) -> Option<&str> {
        None
    }

    /// Shape of the output record
    fn mode(&self) -> OutputMode {
        OutputMode::Keyed
    }

    /// Behaviour for blank input
    fn fallback(&self) -> Fallback {
        Fallback::default()
    }

    /// Pre-process the input record at construction
    fn init(&self, data: Value) -> Value {
        self.convert(data)
    }

    /// Older name of [`Present::init`]; override `init` in new code
    fn convert(&self, data: Value) -> Value {
        data
    }

    /// Map the input record right before projection
    fn map(&self, data: Value) -> Value {
        data
    }
}

/// Capability of producing presented output
pub trait Handle {
    /// Process the input without consulting any cache
    fn handle(&mut self) -> Result<Value>;
}

/// Runs a [`Present`] definition over one input record
pub struct Presenter<P: Present> {
    definition: P,
    data: Value,
    rules: RuleSet,
    transformer: Option<String>,
    mode: OutputMode,
    fallback: Fallback,
    registry: Arc<Registry>,
    limits: ProjectionLimits,
    depth: usize,
    generated: Option<Value>,
}

impl<P: Present> Presenter<P> {
    /// Create a presenter resolving collaborators in the global registry
    pub fn new(definition: P, data: Value) -> Self {
        Self::with_transformer(definition, data, None::<String>)
    }

    /// Create a presenter whose transformer overrides the declared one
    ///
    /// A `None` override keeps the transformer declared by the definition.
    pub fn with_transformer(
        definition: P,
        data: Value,
        transformer: Option<impl Into<String>>,
    ) -> Self {
        let rules = definition.present();
        let data = definition.init(data);
        let transformer = transformer
            .map(Into::into)
            .or_else(|| definition.transformer().map(str::to_string));
        let mode = definition.mode();
        let fallback = definition.fallback();

        Self {
            definition,
            data,
            rules,
            transformer,
            mode,
            fallback,
            registry: Registry::global(),
            limits: ProjectionLimits::default(),
            depth: 0,
            generated: None,
        }
    }

    /// Create a presenter for a nested projection rule
    pub fn nested(definition: P, ctx: NestedContext<'_>) -> Self {
        let mut presenter = Self::with_transformer(definition, ctx.data, ctx.transformer);
        presenter.registry = Arc::clone(ctx.registry);
        presenter.limits = ctx.limits.clone();
        presenter.depth = ctx.depth;
        presenter
    }

    /// Resolve presenters and transformers in `registry` instead of the global one
    pub fn in_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the projection limits
    ///
    /// # Errors
    ///
    /// Returns an error if `limits` exceed the hard maximums
    pub fn with_limits(mut self, limits: ProjectionLimits) -> Result<Self> {
        limits.validate()?;
        self.limits = limits;
        Ok(self)
    }

    /// Presented output, computed on first call and cached afterwards
    pub fn get(&mut self) -> Result<&Value> {
        let generated = match self.generated.take() {
            Some(generated) => generated,
            None => self.handle()?,
        };
        Ok(&*self.generated.insert(generated))
    }

    /// Presented output deserialized into `T`
    pub fn get_as<T: DeserializeOwned>(&mut self) -> Result<T> {
        let value = self.get()?.clone();
        Ok(serde_json::from_value(value)?)
    }

    /// Presented output encoded as JSON text
    pub fn to_json(&mut self) -> Result<String> {
        Ok(serde_json::to_string(self.get()?)?)
    }

    /// Check if the output has been computed and cached
    pub fn is_processed(&self) -> bool {
        self.generated.is_some()
    }

    /// Drop the cached output so the next [`Presenter::get`] recomputes it
    pub fn invalidate(&mut self) -> &mut Self {
        self.generated = None;
        self
    }

    /// Drop the cached output and compute it again
    pub fn reprocess(&mut self) -> Result<&Value> {
        self.invalidate();
        self.get()
    }

    /// Replace the rule set
    pub fn set_present(&mut self, rules: RuleSet) -> &mut Self {
        self.warn_if_processed("set_present");
        self.rules = rules;
        self
    }

    /// Replace the transformer
    pub fn set_transformer(&mut self, transformer: Option<impl Into<String>>) -> &mut Self {
        self.warn_if_processed("set_transformer");
        self.transformer = transformer.map(Into::into);
        self
    }

    /// Active rule set
    ///
    /// After blank input with a fallback schema this is the fallback schema.
    pub fn get_present(&self) -> &RuleSet {
        &self.rules
    }

    /// Active transformer name
    pub fn get_transformer(&self) -> Option<&str> {
        self.transformer.as_deref()
    }

    /// Input record after [`Present::init`]
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Output shape
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Wrapped definition
    pub fn definition(&self) -> &P {
        &self.definition
    }

    /// Depth of this presenter in a nested projection (top level is 0)
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Project `data` through the active rule set
    pub fn process(&self, data: &Value) -> Result<Value> {
        let scope = NestedScope {
            registry: &self.registry,
            limits: &self.limits,
            depth: self.depth,
        };
        Projector::new(self.mode, &scope).process(data, &self.rules)
    }

    /// Apply the fallback policy, then project and transform
    fn handle_default(&mut self, data: Value) -> Result<Value> {
        if !is_blank(&data) {
            let projected = self.process(&data)?;
            return self.transform(projected);
        }

        if !self.fallback.schema.is_empty() {
            tracing::debug!(depth = self.depth, "blank input, projecting with fallback schema");
            self.rules = self.fallback.schema.clone();
            let projected = self.process(&data)?;
            return self.transform(projected);
        }

        tracing::debug!(depth = self.depth, "blank input, returning fallback value");
        Ok(self.fallback.value.clone())
    }

    /// Run the transformer over keyed output
    fn transform(&self, data: Value) -> Result<Value> {
        if !self.mode.is_transformable() {
            return Ok(data);
        }

        match (data, self.transformer.as_deref()) {
            (Value::Object(record), Some(name)) => {
                Ok(Value::Object(self.registry.transform(name, record)?))
            }
            (data, _) => Ok(data),
        }
    }

    fn warn_if_processed(&self, mutator: &str) {
        if self.is_processed() {
            tracing::warn!(
                mutator,
                "presenter already processed; change applies after invalidate()"
            );
        }
    }
}

impl<P: Present> Handle for Presenter<P> {
    fn handle(&mut self) -> Result<Value> {
        tracing::debug!(
            mode = self.mode.as_str(),
            rules = self.rules.len(),
            transformer = self.transformer.as_deref().unwrap_or("-"),
            depth = self.depth,
            "processing presenter"
        );

        let data = self.definition.map(self.data.clone());
        self.handle_default(data)
    }
}

impl<P: Present> fmt::Display for Presenter<P> {
    /// Writes the cached output as JSON, or `[]` before the first `get()`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.generated {
            Some(generated) => write!(f, "{}", generated),
            None => f.write_str("[]"),
        }
    }
}

impl<P: Present + fmt::Debug> fmt::Debug for Presenter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Presenter")
            .field("definition", &self.definition)
            .field("rules", &self.rules)
            .field("transformer", &self.transformer)
            .field("mode", &self.mode)
            .field("depth", &self.depth)
            .field("processed", &self.is_processed())
            .finish()
    }
}

/// Resolves nested rules through the registry, one level deeper
struct NestedScope<'a> {
    registry: &'a Arc<Registry>,
    limits: &'a ProjectionLimits,
    depth: usize,
}

impl NestedResolver for NestedScope<'_> {
    fn project_nested(&self, nested: &NestedRule, data: Value) -> Result<Option<Value>> {
        let depth = self.depth + 1;
        self.limits.check_depth(&nested.presenter, depth)?;

        let ctx = NestedContext {
            data,
            transformer: nested.transformer.clone(),
            args: &nested.args,
            depth,
            limits: self.limits,
            registry: self.registry,
        };

        match self.registry.build_presenter(&nested.presenter, ctx)? {
            Built::Presenter(mut presenter) => presenter.handle().map(Some),
            Built::Inert => Ok(None),
        }
    }
}
