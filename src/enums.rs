// src/enums.rs
//! Public enums and small value types used throughout the crate
//!
//! Central location for the key lifecycle states and the version label
//! that ties envelopes back to registry entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle state of one key generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyStatus {
    /// Usable for new encryption
    Active,
    /// Decrypt-only, kept for backward compatibility
    Retired,
    /// Past the retention window; decryption fails fast
    Expired,
}

/// Opaque key-version label (`"v1"`, `"v2"`, ...)
///
/// Labels are printable ASCII without `':'` (the envelope separator).
/// Ordering between versions is registration order in the registry,
/// never lexicographic comparison of labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionTag(String);

impl VersionTag {
    pub fn new(label: impl Into<String>) -> Result<Self, CoreError> {
        let label = label.into();
        if label.is_empty() {
            return Err(CoreError::Validation(
                "version label must not be empty".into(),
            ));
        }
        if !label.bytes().all(|b| b.is_ascii_graphic() && b != b':') {
            return Err(CoreError::Validation(format!(
                "version label {label:?} must be printable ASCII without ':'"
            )));
        }
        Ok(Self(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for VersionTag {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VersionTag> for String {
    fn from(tag: VersionTag) -> Self {
        tag.0
    }
}
