//! Shredding mode enumeration

use crate::constants::{CONTEXTS_PREFIX, UNSTRUCT_EVENT_PREFIX};
use std::fmt;

/// Kind of self-describing payload being shredded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShredKind {
    /// Array of custom contexts, grouped per schema
    Contexts,
    /// Single unstructured (self-describing) event
    UnstructEvent,
}

impl ShredKind {
    /// Field-name prefix used for derived keys of this kind
    pub fn prefix(&self) -> &'static str {
        match self {
            ShredKind::Contexts => CONTEXTS_PREFIX,
            ShredKind::UnstructEvent => UNSTRUCT_EVENT_PREFIX,
        }
    }
}

impl fmt::Display for ShredKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}
