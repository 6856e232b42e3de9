//! Projection rules
//!
//! A schema entry is compiled once into one of four rule variants. The
//! variant decides how the output value is produced; the key decides where it
//! lands in keyed output.

use presento_format::path::WHOLE_RECORD;
use serde_json::{Map, Value};
use smallvec::SmallVec;

/// A single compiled schema entry
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Unkeyed entry: the path doubles as the output key
    FieldRef {
        /// Dotted path into the record
        path: String,
    },
    /// Keyed entry resolving a path under a new name
    Alias {
        /// Output key
        key: String,
        /// Dotted path into the record
        path: String,
    },
    /// Entry emitted verbatim without path resolution
    Literal {
        /// Output key
        key: String,
        /// Value written to the output
        value: Value,
    },
    /// Entry delegating a sub-record to another presenter
    Nested {
        /// Output key
        key: String,
        /// Delegation target and parameters
        nested: NestedRule,
    },
}

impl Rule {
    /// Output key of this rule (ignored in positional mode)
    pub fn key(&self) -> &str {
        match self {
            Rule::FieldRef { path } => path,
            Rule::Alias { key, .. } | Rule::Literal { key, .. } | Rule::Nested { key, .. } => key,
        }
    }

    /// Short variant name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Rule::FieldRef { .. } => "field",
            Rule::Alias { .. } => "alias",
            Rule::Literal { .. } => "literal",
            Rule::Nested { .. } => "nested",
        }
    }
}

/// Parameters of a nested projection rule
///
/// On the wire this is a one-entry mapping
/// `{ presenter: [path?, transformer?, ...args] }`.
#[derive(Debug, Clone, PartialEq)]
pub struct NestedRule {
    /// Registered presenter identifier
    pub presenter: String,
    /// Path of the sub-record handed to the nested presenter
    pub path: String,
    /// Transformer overriding the nested presenter's own
    pub transformer: Option<String>,
    /// Extra constructor arguments for the nested presenter
    pub args: SmallVec<[Value; 2]>,
    /// Parameter list as written in a JSON schema
    pub source: Option<Value>,
}

impl NestedRule {
    /// Delegate the whole record to `presenter`
    pub fn new(presenter: impl Into<String>) -> Self {
        Self {
            presenter: presenter.into(),
            path: WHOLE_RECORD.to_string(),
            transformer: None,
            args: SmallVec::new(),
            source: None,
        }
    }

    /// Delegate the sub-record at `path` instead of the whole record
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Override the nested presenter's transformer
    pub fn with_transformer(mut self, transformer: impl Into<String>) -> Self {
        self.transformer = Some(transformer.into());
        self
    }

    /// Append an extra constructor argument
    pub fn arg(mut self, value: Value) -> Self {
        self.args.push(value);
        self
    }

    /// Wire representation of this rule
    ///
    /// Used verbatim as the output value when the identifier resolves to
    /// something that cannot present. Rules compiled from JSON reproduce their
    /// parameter list exactly as written.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(self.presenter.clone(), self.params());
        Value::Object(map)
    }

    fn params(&self) -> Value {
        if let Some(source) = &self.source {
            return source.clone();
        }

        let mut params = Vec::with_capacity(2 + self.args.len());
        params.push(Value::String(self.path.clone()));
        params.push(
            self.transformer
                .as_ref()
                .map_or(Value::Null, |t| Value::String(t.clone())),
        );
        params.extend(self.args.iter().cloned());
        Value::Array(params)
    }
}
