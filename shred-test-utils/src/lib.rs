//! Shred Test Utilities
//!
//! This crate provides shared testing utilities and helpers for the shred
//! workspace: builders for self-describing envelopes and canned inputs.

use serde_json::{json, Value};

/// Schema URI of the standard contexts envelope
pub const CONTEXTS_ENVELOPE_SCHEMA: &str =
    "iglu:com.snowplowanalytics.snowplow/contexts/jsonschema/1-0-0";
/// Schema URI of the standard unstructured-event envelope
pub const UNSTRUCT_ENVELOPE_SCHEMA: &str =
    "iglu:com.snowplowanalytics.snowplow/unstruct_event/jsonschema/1-0-0";

/// Builder for contexts envelopes
pub struct EnvelopeBuilder {
    schema: String,
    entries: Vec<Value>,
}

impl EnvelopeBuilder {
    /// Create a new builder with the standard contexts envelope schema
    pub fn new() -> Self {
        Self {
            schema: CONTEXTS_ENVELOPE_SCHEMA.to_string(),
            entries: Vec::new(),
        }
    }

    /// Override the envelope's own schema tag
    pub fn envelope_schema(mut self, schema: &str) -> Self {
        self.schema = schema.to_string();
        self
    }

    /// Add a well-formed sub-document
    pub fn context(mut self, schema: &str, data: Value) -> Self {
        self.entries.push(json!({"schema": schema, "data": data}));
        self
    }

    /// Add a sub-document without a `data` field
    pub fn missing_data(mut self, schema: &str) -> Self {
        self.entries.push(json!({ "schema": schema }));
        self
    }

    /// Add a sub-document without a `schema` field
    pub fn missing_schema(mut self, data: Value) -> Self {
        self.entries.push(json!({ "data": data }));
        self
    }

    /// Add an arbitrary raw entry
    pub fn raw(mut self, entry: Value) -> Self {
        self.entries.push(entry);
        self
    }

    /// Build the envelope value
    pub fn build(self) -> Value {
        json!({"schema": self.schema, "data": self.entries})
    }

    /// Build the envelope as JSON text
    pub fn build_text(self) -> String {
        self.build().to_string()
    }
}

impl Default for EnvelopeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an unstructured-event envelope
pub fn unstruct_envelope(schema: &str, data: Value) -> Value {
    json!({
        "schema": UNSTRUCT_ENVELOPE_SCHEMA,
        "data": {"schema": schema, "data": data}
    })
}

/// Generate envelopes with various patterns
pub struct TestDataGenerator;

impl TestDataGenerator {
    /// Two contexts sharing a model plus one distinct context
    pub fn duplicated_contexts() -> Value {
        EnvelopeBuilder::new()
            .envelope_schema("any")
            .context(
                "iglu:com.acme/duplicated/jsonschema/20-0-5",
                json!({"value": 1}),
            )
            .context(
                "iglu:com.acme/duplicated/jsonschema/20-0-5",
                json!({"value": 2}),
            )
            .context(
                "iglu:com.acme/unduplicated/jsonschema/1-0-0",
                json!({"type": "test"}),
            )
            .build()
    }

    /// Three malformed contexts: bad URI, missing schema, missing data
    pub fn malformed_contexts() -> Value {
        EnvelopeBuilder::new()
            .envelope_schema("any")
            .context("failing", json!({"value": 1}))
            .missing_schema(json!({"value": 2}))
            .missing_data("iglu:com.acme/unduplicated/jsonschema/1-0-0")
            .build()
    }

    /// Social interaction unstructured event
    pub fn social_interaction() -> Value {
        unstruct_envelope(
            "iglu:com.snowplowanalytics.snowplow/social_interaction/jsonschema/1-0-0",
            json!({"action": "like", "network": "fb"}),
        )
    }

    /// A large contexts envelope cycling through `schemas` distinct models
    pub fn large_contexts(count: usize, schemas: usize) -> Value {
        let schemas = schemas.max(1);
        (0..count)
            .fold(EnvelopeBuilder::new(), |builder, i| {
                builder.context(
                    &format!("iglu:com.acme.load/entity_{}/jsonschema/1-0-{}", i % schemas, i % 7),
                    json!({"id": i, "label": format!("entity {}", i)}),
                )
            })
            .build()
    }
}

/// Utility functions for test assertions
pub mod assertions {
    use serde_json::Value;

    /// Assert that two JSON values are semantically equal (ignoring formatting)
    pub fn assert_json_equal(actual: &Value, expected: &Value, context: &str) {
        if actual != expected {
            panic!(
                "JSON assertion failed in {}:\nExpected: {}\nActual: {}",
                context,
                serde_json::to_string_pretty(expected).unwrap_or_default(),
                serde_json::to_string_pretty(actual).unwrap_or_default()
            );
        }
    }

    /// Assert that two JSON objects list the same keys in the same order
    pub fn assert_key_order(actual: &Value, expected: &[&str]) {
        let keys: Vec<&str> = actual
            .as_object()
            .map(|obj| obj.keys().map(String::as_str).collect())
            .unwrap_or_default();
        if keys != expected {
            panic!(
                "Key order assertion failed:\nExpected: {:?}\nActual: {:?}",
                expected, keys
            );
        }
    }
}
