//! Context and unstructured-event shredding
//!
//! Shredding turns a self-describing envelope into flat fields keyed by the
//! derived schema name. Contexts group every sub-document sharing a field
//! name into one array; an unstructured event yields exactly one field.
//!
//! A contexts pass examines every entry before failing, so the resulting
//! [`ShredError::Shredding`] lists each malformed sub-document. Any failure
//! voids the whole envelope.

use crate::constants::DATA_FIELD;
use crate::entry::{json_type_name, validate_entry};
use crate::error::{Result, ShredError};
use crate::limits::Limits;
use crate::types::ShredKind;
use ahash::RandomState;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Contexts grouped by derived field name
///
/// Field names keep first-occurrence order and values keep input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShreddedContexts {
    fields: Vec<(String, Vec<Value>)>,
    index: HashMap<String, usize, RandomState>,
}

impl ShreddedContexts {
    fn push(&mut self, field_name: String, data: Value) {
        match self.index.get(&field_name) {
            Some(&slot) => self.fields[slot].1.push(data),
            None => {
                self.index.insert(field_name.clone(), self.fields.len());
                self.fields.push((field_name, vec![data]));
            }
        }
    }

    /// Number of distinct field names
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no contexts were present
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Values shredded under `field_name`
    pub fn get(&self, field_name: &str) -> Option<&[Value]> {
        self.index
            .get(field_name)
            .map(|&slot| self.fields[slot].1.as_slice())
    }

    /// Field names in first-occurrence order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate fields and their values in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.fields
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Total number of shredded values across all fields
    pub fn value_count(&self) -> usize {
        self.fields.iter().map(|(_, values)| values.len()).sum()
    }

    /// Convert into an ordered JSON object of field name to array
    pub fn into_json_map(self) -> Map<String, Value> {
        self.fields
            .into_iter()
            .map(|(name, values)| (name, Value::Array(values)))
            .collect()
    }
}

impl IntoIterator for ShreddedContexts {
    type Item = (String, Vec<Value>);
    type IntoIter = std::vec::IntoIter<(String, Vec<Value>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl Serialize for ShreddedContexts {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, values) in &self.fields {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

/// A single shredded unstructured event
#[derive(Debug, Clone, PartialEq)]
pub struct ShreddedUnstruct {
    /// Derived field name, prefixed with `unstruct_event`
    pub field_name: String,
    /// Event payload
    pub data: Value,
}

impl ShreddedUnstruct {
    /// Convert into a single-entry JSON object
    pub fn into_json_map(self) -> Map<String, Value> {
        let mut map = Map::with_capacity(1);
        map.insert(self.field_name, self.data);
        map
    }
}

impl Serialize for ShreddedUnstruct {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field_name, &self.data)?;
        map.end()
    }
}

/// Options for a [`Shredder`]
#[derive(Debug, Clone, Default)]
pub struct ShredOptions {
    /// Input limits
    pub limits: Limits,
}

/// Shreds envelopes under a fixed set of options
#[derive(Debug, Clone, Default)]
pub struct Shredder {
    options: ShredOptions,
}

impl Shredder {
    /// Create a shredder, rejecting limits above the hard maximums
    pub fn new(options: ShredOptions) -> Result<Self> {
        options.limits.validate()?;
        Ok(Self { options })
    }

    /// Options in effect
    pub fn options(&self) -> &ShredOptions {
        &self.options
    }

    /// Parse and shred a contexts envelope
    pub fn parse_contexts(&self, text: &str) -> Result<ShreddedContexts> {
        let envelope = self.parse_envelope(text)?;
        self.shred_contexts(&envelope)
    }

    /// Parse and shred an unstructured-event envelope
    pub fn parse_unstruct(&self, text: &str) -> Result<ShreddedUnstruct> {
        let envelope = self.parse_envelope(text)?;
        self.shred_unstruct(&envelope)
    }

    /// Shred an already parsed contexts envelope
    pub fn shred_contexts(&self, envelope: &Value) -> Result<ShreddedContexts> {
        let entries = match envelope_data(envelope, ShredKind::Contexts)? {
            Value::Array(entries) => entries,
            other => {
                return Err(ShredError::MalformedInput(format!(
                    "contexts envelope '{}' must be an array, found {}",
                    DATA_FIELD,
                    json_type_name(other)
                )))
            }
        };
        self.options.limits.check_entry_count(entries.len())?;

        let mut shredded = ShreddedContexts::default();
        let mut messages = Vec::new();

        for (idx, entry) in entries.iter().enumerate() {
            match validate_entry(entry) {
                Ok(valid) => {
                    shredded.push(valid.field_name(ShredKind::Contexts), valid.data.clone());
                }
                Err(message) => {
                    trace!(entry = idx, %message, "rejected context");
                    messages.push(message);
                }
            }
        }

        debug!(
            entries = entries.len(),
            fields = shredded.len(),
            errors = messages.len(),
            "shredded contexts"
        );

        if !messages.is_empty() {
            return Err(ShredError::Shredding { messages });
        }
        Ok(shredded)
    }

    /// Shred an already parsed unstructured-event envelope
    pub fn shred_unstruct(&self, envelope: &Value) -> Result<ShreddedUnstruct> {
        let entry = envelope_data(envelope, ShredKind::UnstructEvent)?;
        if !entry.is_object() {
            return Err(ShredError::MalformedInput(format!(
                "unstruct envelope '{}' must be an object, found {}",
                DATA_FIELD,
                json_type_name(entry)
            )));
        }

        let valid = validate_entry(entry).map_err(|message| {
            trace!(%message, "rejected unstruct event");
            ShredError::Shredding {
                messages: vec![message],
            }
        })?;

        let field_name = valid.field_name(ShredKind::UnstructEvent);
        debug!(field = %field_name, "shredded unstruct event");

        Ok(ShreddedUnstruct {
            field_name,
            data: valid.data.clone(),
        })
    }

    /// Shred `text` as `kind` and return the fields as a JSON object
    pub fn shred_to_json(&self, kind: ShredKind, text: &str) -> Result<Map<String, Value>> {
        match kind {
            ShredKind::Contexts => self.parse_contexts(text).map(ShreddedContexts::into_json_map),
            ShredKind::UnstructEvent => {
                self.parse_unstruct(text).map(ShreddedUnstruct::into_json_map)
            }
        }
    }

    fn parse_envelope(&self, text: &str) -> Result<Value> {
        self.options.limits.check_input_len(text.len())?;
        Ok(serde_json::from_str(text)?)
    }
}

fn envelope_data(envelope: &Value, kind: ShredKind) -> Result<&Value> {
    let object = envelope.as_object().ok_or_else(|| {
        ShredError::MalformedInput(format!(
            "{} envelope must be a JSON object, found {}",
            kind,
            json_type_name(envelope)
        ))
    })?;

    object.get(DATA_FIELD).ok_or_else(|| {
        ShredError::MalformedInput(format!(
            "{} envelope has no '{}' field",
            kind, DATA_FIELD
        ))
    })
}

/// Shred a contexts envelope with default limits
///
/// ```
/// let text = r#"{
///     "schema": "iglu:com.snowplowanalytics.snowplow/contexts/jsonschema/1-0-0",
///     "data": [
///         {"schema": "iglu:com.acme/user/jsonschema/1-0-0", "data": {"id": 7}}
///     ]
/// }"#;
/// let contexts = shred_format::parse_contexts(text).unwrap();
/// assert_eq!(contexts.get("contexts_com_acme_user_1").unwrap().len(), 1);
/// ```
pub fn parse_contexts(text: &str) -> Result<ShreddedContexts> {
    Shredder::default().parse_contexts(text)
}

/// Shred an unstructured-event envelope with default limits
pub fn parse_unstruct(text: &str) -> Result<ShreddedUnstruct> {
    Shredder::default().parse_unstruct(text)
}

/// Shred a parsed contexts envelope with default limits
pub fn shred_contexts(envelope: &Value) -> Result<ShreddedContexts> {
    Shredder::default().shred_contexts(envelope)
}

/// Shred a parsed unstructured-event envelope with default limits
pub fn shred_unstruct(envelope: &Value) -> Result<ShreddedUnstruct> {
    Shredder::default().shred_unstruct(envelope)
}
