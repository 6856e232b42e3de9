//! Presento Test Utilities
//!
//! This crate provides shared fixtures and helpers for the Presento test suites.

use serde_json::{json, Map, Value};

/// Builder for creating test records with common patterns
///
/// Fields keep insertion order.
pub struct RecordBuilder {
    fields: Map<String, Value>,
}

impl RecordBuilder {
    /// Create a new record builder
    pub fn new() -> Self {
        Self { fields: Map::new() }
    }

    /// Add a field with a string value
    pub fn string(mut self, key: &str, value: &str) -> Self {
        self.fields
            .insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Add a field with an integer value
    pub fn int(mut self, key: &str, value: i64) -> Self {
        self.fields.insert(key.to_string(), Value::Number(value.into()));
        self
    }

    /// Add a field with a boolean value
    pub fn bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), Value::Bool(value));
        self
    }

    /// Add a field with a null value
    pub fn null(mut self, key: &str) -> Self {
        self.fields.insert(key.to_string(), Value::Null);
        self
    }

    /// Add a field holding a nested record
    pub fn record(mut self, key: &str, value: RecordBuilder) -> Self {
        self.fields.insert(key.to_string(), value.build());
        self
    }

    /// Add a field holding a sequence of nested records
    pub fn records(mut self, key: &str, values: Vec<RecordBuilder>) -> Self {
        let items = values.into_iter().map(RecordBuilder::build).collect();
        self.fields.insert(key.to_string(), Value::Array(items));
        self
    }

    /// Add a field with an arbitrary value
    pub fn value(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    /// Build the record
    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A project owned by the sample user
pub fn sample_project(id: i64, name: &str, url: &str, license: &str, created_at: &str) -> RecordBuilder {
    RecordBuilder::new()
        .int("id", id)
        .string("name", name)
        .string("url", url)
        .string("license", license)
        .string("created_at", created_at)
}

/// The user record exercised throughout the presenter tests
pub fn sample_user() -> Value {
    RecordBuilder::new()
        .int("id", 123456)
        .string("name", "Nahid Bin Azhar")
        .string("email", "talk@nahid.im")
        .int("type", 1)
        .int("is_active", 1)
        .string("created_at", "2018-01-02 02:03:04")
        .string("updated_at", "2018-01-02 02:03:04")
        .string("deleted_at", "2018-01-02 02:03:04")
        .records(
            "projects",
            vec![
                sample_project(
                    1,
                    "Laravel Talk",
                    "https://github.com/nahid/talk",
                    "CC0",
                    "2016-02-02 02:03:04",
                ),
                sample_project(
                    2,
                    "JsonQ",
                    "https://github.com/nahid/jsonq",
                    "MIT",
                    "2018-01-02 02:03:04",
                ),
            ],
        )
        .build()
}

/// A record whose every field is null
pub fn null_fields(fields: &[&str]) -> Value {
    fields
        .iter()
        .fold(RecordBuilder::new(), |builder, field| builder.null(field))
        .build()
}

/// Nested tree of `depth` levels, each holding a `child`
pub fn nested_chain(depth: usize) -> Value {
    let mut value = json!({"leaf": true});
    for level in (0..depth).rev() {
        value = json!({"level": level, "child": value});
    }
    value
}

/// Install a tracing subscriber that writes through the test harness
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::TRACE)
        .try_init();
}
