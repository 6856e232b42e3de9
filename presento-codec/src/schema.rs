//! Rule sets and schema compilation
//!
//! Schemas arrive either through the typed builder on [`RuleSet`] or as JSON.
//! The JSON form accepts:
//!
//! - a sequence whose entries are paths (`"name"`), keyed one-entry mappings
//!   (`{"user_id": "id"}`) or nested references (`{"ProjectPresenter": ["projects"]}`)
//! - a mapping of output key to rule value
//!
//! A keyed rule value that is falsy (`null`, `false`, `0`, `""`, `"0"`, `[]`,
//! `{}`) becomes a literal. A one-entry mapping whose value is a parameter
//! list becomes a nested rule. Inside a sequence the parameter list must be
//! non-empty; `[{"flag": []}]` compiles like `{"flag": []}`.

use crate::rule::{NestedRule, Rule};
use presento_format::path::WHOLE_RECORD;
use presento_format::{is_truthy, PresentoError, Result};
use serde::Deserialize;
use serde_json::Value;

/// Ordered sequence of projection rules
///
/// An empty rule set passes records through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a rule set from already compiled rules
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Compile a rule set from its JSON representation
    pub fn from_value(schema: &Value) -> Result<Self> {
        let mut rules = Vec::new();

        match schema {
            Value::Null => {}
            Value::Array(entries) => {
                for entry in entries {
                    rules.push(compile_unkeyed(entry)?);
                }
            }
            Value::Object(entries) => {
                for (key, value) in entries {
                    rules.push(compile_keyed(key, value)?);
                }
            }
            other => {
                return Err(PresentoError::InvalidRule {
                    key: "<schema>".to_string(),
                    reason: format!("schema must be a sequence or mapping, found {}", type_name(other)),
                });
            }
        }

        Ok(Self { rules })
    }

    /// Compile a rule set from JSON text
    pub fn from_json_str(schema: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(schema)?;
        Self::from_value(&value)
    }

    /// Add a rule keyed by its own path
    pub fn field(mut self, path: impl Into<String>) -> Self {
        self.rules.push(Rule::FieldRef { path: path.into() });
        self
    }

    /// Add a rule resolving `path` under `key`
    pub fn alias(mut self, key: impl Into<String>, path: impl Into<String>) -> Self {
        self.rules.push(Rule::Alias {
            key: key.into(),
            path: path.into(),
        });
        self
    }

    /// Add a rule emitting `value` verbatim under `key`
    pub fn literal(mut self, key: impl Into<String>, value: Value) -> Self {
        self.rules.push(Rule::Literal {
            key: key.into(),
            value,
        });
        self
    }

    /// Add a rule delegating to a nested presenter under `key`
    pub fn nested(mut self, key: impl Into<String>, nested: NestedRule) -> Self {
        self.rules.push(Rule::Nested {
            key: key.into(),
            nested,
        });
        self
    }

    /// Append a compiled rule
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Rules in schema order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Iterate rules in schema order
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if this is the pass-through rule set
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl TryFrom<Value> for RuleSet {
    type Error = PresentoError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(&value)
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

/// Compile a sequence entry, whose key is implied by its value
fn compile_unkeyed(entry: &Value) -> Result<Rule> {
    match entry {
        Value::Object(map) if map.len() == 1 => {
            let (key, value) = map.iter().next().ok_or_else(|| PresentoError::InvalidRule {
                key: "<entry>".to_string(),
                reason: "empty mapping entry".to_string(),
            })?;
            match value {
                // {Presenter: [...]} without a key is keyed by the presenter id
                Value::Array(params) if !params.is_empty() => Ok(Rule::Nested {
                    key: key.clone(),
                    nested: compile_nested(key, key, value)?,
                }),
                _ => compile_keyed(key, value),
            }
        }
        Value::String(path) if is_truthy(entry) => Ok(Rule::FieldRef { path: path.clone() }),
        Value::Number(number) if is_truthy(entry) => Ok(Rule::FieldRef {
            path: number.to_string(),
        }),
        Value::String(_) | Value::Number(_) | Value::Null | Value::Bool(false) => Ok(Rule::Literal {
            key: literal_key(entry),
            value: entry.clone(),
        }),
        other => Err(PresentoError::InvalidRule {
            key: literal_key(other),
            reason: format!("unkeyed entry cannot be {}", type_name(other)),
        }),
    }
}

/// Compile a `key => value` entry
fn compile_keyed(key: &str, value: &Value) -> Result<Rule> {
    if let Value::Object(map) = value {
        if map.len() == 1 {
            if let Some((presenter, params)) = map.iter().next() {
                if is_parameter_list(params) {
                    return Ok(Rule::Nested {
                        key: key.to_string(),
                        nested: compile_nested(key, presenter, params)?,
                    });
                }
            }
        }
    }

    if !is_truthy(value) {
        return Ok(Rule::Literal {
            key: key.to_string(),
            value: value.clone(),
        });
    }

    match value {
        Value::String(path) => Ok(Rule::Alias {
            key: key.to_string(),
            path: path.clone(),
        }),
        Value::Number(number) => Ok(Rule::Alias {
            key: key.to_string(),
            path: number.to_string(),
        }),
        Value::Object(map) => Err(PresentoError::InvalidRule {
            key: key.to_string(),
            reason: format!(
                "nested rule must map one presenter to a parameter list, found {} entries",
                map.len()
            ),
        }),
        other => Err(PresentoError::InvalidRule {
            key: key.to_string(),
            reason: format!("rule value cannot be {}", type_name(other)),
        }),
    }
}

/// Compile `[path?, transformer?, ...args]`
fn compile_nested(key: &str, presenter: &str, params: &Value) -> Result<NestedRule> {
    let mut nested = NestedRule::new(presenter);
    nested.source = Some(params.clone());
    let Some(params) = params.as_array() else {
        return Ok(nested);
    };

    let mut params = params.iter();
    match params.next() {
        None | Some(Value::Null) => nested.path = WHOLE_RECORD.to_string(),
        Some(Value::String(path)) => nested.path = path.clone(),
        Some(Value::Number(index)) => nested.path = index.to_string(),
        Some(other) => {
            return Err(PresentoError::InvalidRule {
                key: key.to_string(),
                reason: format!("nested path cannot be {}", type_name(other)),
            });
        }
    }

    match params.next() {
        None | Some(Value::Null) => {}
        Some(Value::String(transformer)) => nested.transformer = Some(transformer.clone()),
        Some(other) => {
            return Err(PresentoError::InvalidRule {
                key: key.to_string(),
                reason: format!("nested transformer cannot be {}", type_name(other)),
            });
        }
    }

    nested.args.extend(params.cloned());
    Ok(nested)
}

fn is_parameter_list(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Null)
}

/// Output key of an unkeyed literal, as its text form
///
/// Booleans and integral floats key as integers (`false` -> `"0"`,
/// `0.0` -> `"0"`).
fn literal_key(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() && float.is_finite() && float.fract() == 0.0 => {
                (float as i64).to_string()
            }
            _ => number.to_string(),
        },
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        _ => String::new(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
