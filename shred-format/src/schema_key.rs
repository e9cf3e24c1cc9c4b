//! Iglu schema URI parsing and field-name derivation
//!
//! A schema URI has the shape `iglu:{vendor}/{name}/{format}/{model}-{revision}-{addition}`.
//! Only vendor, name and model contribute to the derived field name, so all
//! revisions and additions of one model shred into the same column.

use crate::constants::{IGLU_URI_SCHEME, SCHEMA_PATH_PARTS, SCHEMA_VER_PARTS};
use crate::types::ShredKind;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reasons a schema URI could not be decomposed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaKeyError {
    /// URI does not start with `iglu:`.
    #[error("schema URI '{uri}' does not start with 'iglu:'")]
    MissingScheme {
        /// Offending URI
        uri: String,
    },
    /// Path after the scheme is not `vendor/name/format/version`.
    #[error("schema URI '{uri}' has {found} path segment(s), expected 4")]
    WrongPathSegments {
        /// Offending URI
        uri: String,
        /// Number of `/`-separated segments found
        found: usize,
    },
    /// One of the path segments is empty.
    #[error("schema URI '{uri}' has an empty {segment}")]
    EmptySegment {
        /// Offending URI
        uri: String,
        /// Name of the empty segment
        segment: &'static str,
    },
    /// Version is not `model-revision-addition`.
    #[error("schema URI '{uri}' has version '{version}' with {found} part(s), expected 3")]
    WrongVersionParts {
        /// Offending URI
        uri: String,
        /// Version segment
        version: String,
        /// Number of `-`-separated parts found
        found: usize,
    },
    /// A version component is empty or contains a non-digit.
    #[error("schema URI '{uri}' has non-numeric version component '{component}'")]
    InvalidVersionComponent {
        /// Offending URI
        uri: String,
        /// Component that failed to parse
        component: String,
    },
}

/// SchemaVer triple `model-revision-addition`
///
/// Components are kept as their digit text so field names reproduce the
/// model exactly as written, leading zeros and all.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaVer {
    /// Breaking-change counter; the only part kept in field names
    pub model: String,
    /// Counter for changes that may invalidate some historical data
    pub revision: String,
    /// Counter for fully backwards-compatible changes
    pub addition: String,
}

impl fmt::Display for SchemaVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.model, self.revision, self.addition)
    }
}

/// Parsed Iglu schema reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaKey {
    /// Reverse-domain vendor, e.g. `com.snowplowanalytics.snowplow`
    pub vendor: String,
    /// Schema name
    pub name: String,
    /// Schema format, usually `jsonschema`
    pub format: String,
    /// Version triple
    pub version: SchemaVer,
}

impl SchemaKey {
    /// Parse a schema URI
    pub fn parse(uri: &str) -> Result<Self, SchemaKeyError> {
        let path = uri
            .strip_prefix(IGLU_URI_SCHEME)
            .ok_or_else(|| SchemaKeyError::MissingScheme {
                uri: uri.to_string(),
            })?;

        let segments: Vec<&str> = path.split('/').collect();
        if segments.len() != SCHEMA_PATH_PARTS {
            return Err(SchemaKeyError::WrongPathSegments {
                uri: uri.to_string(),
                found: segments.len(),
            });
        }

        let names = ["vendor", "name", "format", "version"];
        for (segment, label) in segments.iter().zip(names) {
            if segment.is_empty() {
                return Err(SchemaKeyError::EmptySegment {
                    uri: uri.to_string(),
                    segment: label,
                });
            }
        }

        let version = parse_schema_ver(uri, segments[3])?;

        Ok(SchemaKey {
            vendor: segments[0].to_string(),
            name: segments[1].to_string(),
            format: segments[2].to_string(),
            version,
        })
    }

    /// Render the `{vendor}_{name}_{model}` fragment with dots in the vendor
    /// replaced by underscores
    pub fn field_fragment(&self) -> String {
        format!(
            "{}_{}_{}",
            self.vendor.replace('.', "_"),
            self.name,
            self.version.model
        )
    }

    /// Full field name for the given shredding kind
    pub fn field_name(&self, kind: ShredKind) -> String {
        format!("{}_{}", kind.prefix(), self.field_fragment())
    }
}

impl fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}/{}/{}/{}",
            IGLU_URI_SCHEME, self.vendor, self.name, self.format, self.version
        )
    }
}

impl FromStr for SchemaKey {
    type Err = SchemaKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemaKey::parse(s)
    }
}

fn parse_schema_ver(uri: &str, version: &str) -> Result<SchemaVer, SchemaKeyError> {
    let parts: Vec<&str> = version.split('-').collect();
    if parts.len() != SCHEMA_VER_PARTS {
        return Err(SchemaKeyError::WrongVersionParts {
            uri: uri.to_string(),
            version: version.to_string(),
            found: parts.len(),
        });
    }

    if let Some(part) = parts
        .iter()
        .find(|part| part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()))
    {
        return Err(SchemaKeyError::InvalidVersionComponent {
            uri: uri.to_string(),
            component: part.to_string(),
        });
    }

    Ok(SchemaVer {
        model: parts[0].to_string(),
        revision: parts[1].to_string(),
        addition: parts[2].to_string(),
    })
}

/// Derive the storage field name for a schema URI, e.g.
/// `iglu:com.acme/link_click/jsonschema/1-0-1` with [`ShredKind::Contexts`]
/// becomes `contexts_com_acme_link_click_1`.
pub fn derive_field_name(kind: ShredKind, uri: &str) -> Result<String, SchemaKeyError> {
    SchemaKey::parse(uri).map(|key| key.field_name(kind))
}
