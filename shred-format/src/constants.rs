//! Constants shared by schema key derivation and shredding

/// URI scheme every self-describing schema reference starts with.
pub const IGLU_URI_SCHEME: &str = "iglu:";

/// Field-name prefix for shredded contexts.
pub const CONTEXTS_PREFIX: &str = "contexts";
/// Field-name prefix for shredded unstructured events.
pub const UNSTRUCT_EVENT_PREFIX: &str = "unstruct_event";

/// Key holding the schema URI in envelopes and sub-documents.
pub const SCHEMA_FIELD: &str = "schema";
/// Key holding the payload in envelopes and sub-documents.
pub const DATA_FIELD: &str = "data";

/// Message reported when a sub-document lacks `schema` or `data`.
/// Both missing-field cases use this exact text.
pub const MISSING_FIELD_MESSAGE: &str = "Could not extract inner data field from custom context.";

/// Number of `/`-separated parts after the URI scheme.
pub const SCHEMA_PATH_PARTS: usize = 4;
/// Number of `-`-separated parts in a SchemaVer version.
pub const SCHEMA_VER_PARTS: usize = 3;
