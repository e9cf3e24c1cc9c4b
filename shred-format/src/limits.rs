//! Input limits and configuration

use crate::error::{Result, ShredError};

/// Limits applied to envelope text before and during shredding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum envelope text length in bytes (default: 16 MiB, hard: 256 MiB)
    pub max_input_bytes: usize,
    /// Maximum sub-documents per contexts envelope (default: 65,536, hard: 1,048,576)
    pub max_entries: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_bytes: 16 * 1024 * 1024,
            max_entries: 65_536,
        }
    }
}

impl Limits {
    /// Hard maximum limits that cannot be exceeded
    pub fn hard_maximums() -> Self {
        Self {
            max_input_bytes: 256 * 1024 * 1024,
            max_entries: 1_048_576,
        }
    }

    /// Validate limits against hard maximums
    pub fn validate(&self) -> Result<()> {
        let hard = Self::hard_maximums();

        if self.max_input_bytes > hard.max_input_bytes {
            return Err(ShredError::LimitExceeded(format!(
                "max_input_bytes {} exceeds hard limit {}",
                self.max_input_bytes, hard.max_input_bytes
            )));
        }

        if self.max_entries > hard.max_entries {
            return Err(ShredError::LimitExceeded(format!(
                "max_entries {} exceeds hard limit {}",
                self.max_entries, hard.max_entries
            )));
        }

        Ok(())
    }

    pub(crate) fn check_input_len(&self, len: usize) -> Result<()> {
        if len > self.max_input_bytes {
            return Err(ShredError::LimitExceeded(format!(
                "input of {} bytes exceeds max_input_bytes {}",
                len, self.max_input_bytes
            )));
        }
        Ok(())
    }

    pub(crate) fn check_entry_count(&self, count: usize) -> Result<()> {
        if count > self.max_entries {
            return Err(ShredError::LimitExceeded(format!(
                "envelope with {} entries exceeds max_entries {}",
                count, self.max_entries
            )));
        }
        Ok(())
    }
}
