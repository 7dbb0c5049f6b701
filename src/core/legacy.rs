// src/core/legacy.rs
//! Pre-versioning ciphertext support
//!
//! Values written before key versioning existed carry no version prefix.
//! They are attributed to the oldest registered key, the version that was
//! active when versioning was introduced.
//
// TODO: remove this module once a rotation audit confirms zero unversioned
// envelopes remain in storage.

use crate::aliases::FieldKey32;
use crate::core::cipher;
use crate::core::envelope::{self, Envelope};
use crate::error::CoreError;
use crate::registry::KeyRegistry;

pub type Result<T> = std::result::Result<T, CoreError>;

/// True when `raw` carries no colon-delimited version prefix
pub fn is_legacy(raw: &str) -> bool {
    !raw.contains(crate::consts::VERSION_SEPARATOR)
}

/// Resolve the key legacy data is attributed to: the oldest registered version
///
/// If an installation performed more than one un-versioned key change
/// historically, this attribution is wrong; the correct key cannot be
/// recovered from the ciphertext alone.
pub(crate) fn legacy_key(registry: &KeyRegistry) -> Result<FieldKey32> {
    if !crate::config::load().features.allow_legacy_decrypt {
        return Err(CoreError::Validation(
            "legacy unversioned ciphertext support is disabled".into(),
        ));
    }
    let oldest = registry.oldest_version()?;
    crate::core::field::checked_key(registry, &oldest)
}

/// Decrypt a legacy (unprefixed) envelope with the oldest registered key
pub fn decrypt_legacy(registry: &KeyRegistry, raw: &str) -> Result<Vec<u8>> {
    match envelope::parse(raw)? {
        Envelope::Legacy { nonce, ciphertext } => {
            tracing::debug!("decrypting legacy unversioned envelope");
            let key = legacy_key(registry)?;
            cipher::decrypt_to_vec(&nonce, &ciphertext, key.expose_secret(), None)
        }
        Envelope::Versioned { version, .. } => Err(CoreError::Validation(format!(
            "expected legacy envelope, found version {version}"
        ))),
    }
}
