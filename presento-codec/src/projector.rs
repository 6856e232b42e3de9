//! Schema-driven record projection
//!
//! The projector walks a [`RuleSet`] in order and builds either a keyed
//! mapping or a positional sequence. Nested rules are handed to a
//! [`NestedResolver`], which owns presenter lookup and recursion limits.

use crate::rule::{NestedRule, Rule};
use crate::schema::RuleSet;
use presento_format::{resolve, OutputMode, PresentoError, Result};
use serde_json::{Map, Value};

/// Resolves nested projection rules into values
pub trait NestedResolver {
    /// Present `data` through the presenter named by `nested`
    ///
    /// Returns `Ok(None)` when the identifier resolves to something without
    /// the presenter capability; the rule's wire form is then used verbatim.
    fn project_nested(&self, nested: &NestedRule, data: Value) -> Result<Option<Value>>;
}

/// Resolver for schemas without nested presenters
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNested;

impl NestedResolver for NoNested {
    fn project_nested(&self, nested: &NestedRule, _data: Value) -> Result<Option<Value>> {
        Err(PresentoError::UnknownPresenter {
            name: nested.presenter.clone(),
        })
    }
}

/// Applies rule sets to records
pub struct Projector<'a> {
    mode: OutputMode,
    resolver: &'a dyn NestedResolver,
}

impl Projector<'static> {
    /// Create a projector that rejects nested rules
    pub fn flat(mode: OutputMode) -> Self {
        static NO_NESTED: NoNested = NoNested;
        Self {
            mode,
            resolver: &NO_NESTED,
        }
    }
}

impl<'a> Projector<'a> {
    /// Create a projector delegating nested rules to `resolver`
    pub fn new(mode: OutputMode, resolver: &'a dyn NestedResolver) -> Self {
        Self { mode, resolver }
    }

    /// Output shape produced by this projector
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Project `data` through `rules`
    ///
    /// An empty rule set returns `data` unchanged.
    pub fn process(&self, data: &Value, rules: &RuleSet) -> Result<Value> {
        if rules.is_empty() {
            return Ok(data.clone());
        }

        match self.mode {
            OutputMode::Keyed => {
                let mut record = Map::new();
                for rule in rules {
                    let value = self.evaluate(data, rule)?;
                    // Duplicate keys keep their first position, last value wins
                    record.insert(rule.key().to_string(), value);
                }
                Ok(Value::Object(record))
            }
            OutputMode::Positional => {
                let mut record = Vec::with_capacity(rules.len());
                for rule in rules {
                    record.push(self.evaluate(data, rule)?);
                }
                Ok(Value::Array(record))
            }
        }
    }

    /// Produce the output value of a single rule
    fn evaluate(&self, data: &Value, rule: &Rule) -> Result<Value> {
        tracing::trace!(kind = rule.kind(), key = rule.key(), "applying rule");

        match rule {
            Rule::FieldRef { path } | Rule::Alias { path, .. } => Ok(resolve(data, path)),
            Rule::Literal { value, .. } => Ok(value.clone()),
            Rule::Nested { nested, .. } => {
                let sub_data = resolve(data, &nested.path);
                match self.resolver.project_nested(nested, sub_data)? {
                    Some(value) => Ok(value),
                    None => Ok(nested.to_value()),
                }
            }
        }
    }
}
