// src/core/field.rs
//! Field adapter: the persistence layer's entry point
//!
//! Two pure functions make any text column transparently encrypted.
//! Null passes through unchanged; the empty string is stored verbatim so a
//! zero-length value never produces a cipher call.

use crate::aliases::FieldKey32;
use crate::core::cipher;
use crate::core::envelope::{self, Envelope};
use crate::core::legacy;
use crate::enums::{KeyStatus, VersionTag};
use crate::error::CoreError;
use crate::registry::KeyRegistry;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Look up `version` for decryption, failing fast on expired keys
pub(crate) fn checked_key(registry: &KeyRegistry, version: &VersionTag) -> Result<FieldKey32> {
    if registry.status(version)? == KeyStatus::Expired {
        return Err(CoreError::KeyVersionExpired {
            version: version.as_str().to_owned(),
        });
    }
    registry.get_key(version)
}

/// Encrypt one text field under the registry's current active key
pub fn encrypt_for_storage(
    registry: &KeyRegistry,
    plaintext: Option<&str>,
) -> Result<Option<String>> {
    let Some(plaintext) = plaintext else {
        return Ok(None);
    };
    if plaintext.is_empty() {
        // Empty marker: round-trips exactly, leaks no length-zero pattern.
        return Ok(Some(String::new()));
    }
    let (version, key) = registry.current_key()?;
    let (nonce, ciphertext) = cipher::encrypt_to_vec(plaintext.as_bytes(), key.expose_secret(), None)?;
    Ok(Some(envelope::format(&version, &nonce, &ciphertext)))
}

/// Decrypt one stored field, resolving the key from the envelope itself
pub fn decrypt_from_storage(
    registry: &KeyRegistry,
    stored: Option<&str>,
) -> Result<Option<String>> {
    let Some(stored) = stored else {
        return Ok(None);
    };
    if stored.is_empty() {
        return Ok(Some(String::new()));
    }
    let plaintext = match envelope::parse(stored)? {
        Envelope::Versioned {
            version,
            nonce,
            ciphertext,
        } => {
            let key = checked_key(registry, &version)?;
            cipher::decrypt_to_vec(&nonce, &ciphertext, key.expose_secret(), None)?
        }
        Envelope::Legacy { nonce, ciphertext } => {
            tracing::debug!("decrypting legacy unversioned envelope");
            let key = legacy::legacy_key(registry)?;
            cipher::decrypt_to_vec(&nonce, &ciphertext, key.expose_secret(), None)?
        }
    };
    String::from_utf8(plaintext)
        .map(Some)
        .map_err(|_| CoreError::Validation("decrypted field is not valid UTF-8".into()))
}
