//! Shred Format - Core primitives for Iglu JSON shredding
//!
//! This crate turns self-describing analytics payloads into flat,
//! columnar-ready fields with no I/O dependencies. It includes:
//!
//! - Schema URI parsing and field-name derivation
//! - Sub-document validation
//! - Contexts and unstructured-event shredding
//! - Error types
//! - Input limits
//!
//! ```
//! let text = r#"{
//!     "schema": "iglu:com.snowplowanalytics.snowplow/unstruct_event/jsonschema/1-0-0",
//!     "data": {
//!         "schema": "iglu:com.snowplowanalytics.snowplow/link_click/jsonschema/1-0-1",
//!         "data": {"targetUrl": "https://example.com"}
//!     }
//! }"#;
//! let event = shred_format::parse_unstruct(text).unwrap();
//! assert_eq!(
//!     event.field_name,
//!     "unstruct_event_com_snowplowanalytics_snowplow_link_click_1"
//! );
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod entry;
pub mod error;
pub mod limits;
pub mod schema_key;
pub mod shred;
pub mod types;

// Re-export commonly used types
pub use entry::{validate_entry, ValidEntry};
pub use error::{Result, ShredError};
pub use limits::Limits;
pub use schema_key::{derive_field_name, SchemaKey, SchemaKeyError, SchemaVer};
pub use shred::{
    parse_contexts, parse_unstruct, shred_contexts, shred_unstruct, ShredOptions,
    ShreddedContexts, ShreddedUnstruct, Shredder,
};
pub use types::ShredKind;

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_outputs_are_send_and_sync() {
        assert_send_sync::<ShreddedContexts>();
        assert_send_sync::<ShreddedUnstruct>();
        assert_send_sync::<Shredder>();
        assert_send_sync::<ShredError>();
    }
}
