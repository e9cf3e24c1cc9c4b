//! Sub-document validation
//!
//! Every self-describing sub-document must be an object holding a `schema`
//! URI and a `data` payload. Validation returns failures as messages so a
//! shredding pass can report every malformed entry at once.

use crate::constants::{DATA_FIELD, MISSING_FIELD_MESSAGE, SCHEMA_FIELD};
use crate::schema_key::SchemaKey;
use crate::types::ShredKind;
use serde_json::Value;

/// A sub-document that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidEntry<'a> {
    /// Schema URI exactly as it appeared in the input
    pub schema: &'a str,
    /// Parsed schema reference
    pub key: SchemaKey,
    /// Payload, passed through without inspection
    pub data: &'a Value,
}

impl ValidEntry<'_> {
    /// Storage field name of this entry for the given kind
    pub fn field_name(&self, kind: ShredKind) -> String {
        self.key.field_name(kind)
    }
}

/// Validate one sub-document, returning its parts or a failure message.
pub fn validate_entry(entry: &Value) -> Result<ValidEntry<'_>, String> {
    let Some(object) = entry.as_object() else {
        return Err(MISSING_FIELD_MESSAGE.to_string());
    };

    let Some(data) = object.get(DATA_FIELD) else {
        return Err(MISSING_FIELD_MESSAGE.to_string());
    };

    let schema = match object.get(SCHEMA_FIELD) {
        None => return Err(MISSING_FIELD_MESSAGE.to_string()),
        Some(Value::String(schema)) => schema.as_str(),
        Some(other) => {
            return Err(format!(
                "Schema field of custom context must be a string, found {}.",
                json_type_name(other)
            ))
        }
    };

    let key = SchemaKey::parse(schema)
        .map_err(|err| format!("Could not derive field name from custom context: {}.", err))?;

    Ok(ValidEntry { schema, key, data })
}

/// Human-readable JSON type name used in messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_entry() {
        let value = json!({
            "schema": "iglu:com.acme/unduplicated/jsonschema/1-0-0",
            "data": {"type": "test"}
        });
        let entry = validate_entry(&value).unwrap();
        assert_eq!(entry.schema, "iglu:com.acme/unduplicated/jsonschema/1-0-0");
        assert_eq!(entry.data, &json!({"type": "test"}));
        assert_eq!(
            entry.field_name(ShredKind::Contexts),
            "contexts_com_acme_unduplicated_1"
        );
    }

    #[test]
    fn test_data_may_be_any_json_type() {
        for data in [json!(null), json!(1), json!("s"), json!([1, 2]), json!(true)] {
            let value = json!({"schema": "iglu:com.acme/x/jsonschema/1-0-0", "data": data});
            assert_eq!(validate_entry(&value).unwrap().data, &data);
        }
    }

    #[test]
    fn test_missing_data_and_missing_schema_share_message() {
        let missing_data = json!({"schema": "iglu:com.acme/x/jsonschema/1-0-0"});
        let missing_schema = json!({"data": {"value": 2}});
        assert_eq!(validate_entry(&missing_data).unwrap_err(), MISSING_FIELD_MESSAGE);
        assert_eq!(validate_entry(&missing_schema).unwrap_err(), MISSING_FIELD_MESSAGE);
    }

    #[test]
    fn test_missing_data_checked_before_schema_shape() {
        let value = json!({"schema": "failing"});
        assert_eq!(validate_entry(&value).unwrap_err(), MISSING_FIELD_MESSAGE);
    }

    #[test]
    fn test_non_object_entry() {
        for value in [json!([1]), json!("context"), json!(null)] {
            assert_eq!(validate_entry(&value).unwrap_err(), MISSING_FIELD_MESSAGE);
        }
    }

    #[test]
    fn test_non_string_schema() {
        let value = json!({"schema": 42, "data": {}});
        let msg = validate_entry(&value).unwrap_err();
        assert_eq!(
            msg,
            "Schema field of custom context must be a string, found number."
        );
    }

    #[test]
    fn test_bad_schema_uri() {
        let value = json!({"schema": "failing", "data": {"value": 1}});
        let msg = validate_entry(&value).unwrap_err();
        assert!(msg.starts_with("Could not derive field name from custom context"));
        assert!(msg.contains("'failing'"));
    }
}
