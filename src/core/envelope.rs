// src/core/envelope.rs
//! Versioned ciphertext envelope codec
//!
//! Wire format: `"<version>:<base64(nonce || ciphertext || tag)>"`, ASCII,
//! standard base64 alphabet, no newlines. Input without the colon-delimited
//! prefix parses as [`Envelope::Legacy`]; which key that maps to is decided
//! by the legacy shim, not here.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::consts::{NONCE_LEN, TAG_LEN, VERSION_SEPARATOR};
use crate::enums::VersionTag;
use crate::error::CoreError;

pub type Result<T> = std::result::Result<T, CoreError>;

/// One encrypted value, its format decided once at parse time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// Post-versioning format with an explicit key-version prefix
    Versioned {
        version: VersionTag,
        nonce: [u8; NONCE_LEN],
        ciphertext: Vec<u8>,
    },
    /// Pre-versioning format; implicitly attributed to the oldest
    /// registered version
    Legacy {
        nonce: [u8; NONCE_LEN],
        ciphertext: Vec<u8>,
    },
}

impl Envelope {
    /// Key-version label, if the envelope carries one
    pub fn version(&self) -> Option<&VersionTag> {
        match self {
            Envelope::Versioned { version, .. } => Some(version),
            Envelope::Legacy { .. } => None,
        }
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        match self {
            Envelope::Versioned { nonce, .. } | Envelope::Legacy { nonce, .. } => nonce,
        }
    }

    /// Ciphertext with the trailing GCM tag
    pub fn ciphertext(&self) -> &[u8] {
        match self {
            Envelope::Versioned { ciphertext, .. } | Envelope::Legacy { ciphertext, .. } => {
                ciphertext
            }
        }
    }
}

/// Format one encrypted value under `version`
///
/// Pure formatter: which version is current is the caller's decision.
pub fn format(version: &VersionTag, nonce: &[u8; NONCE_LEN], ciphertext_with_tag: &[u8]) -> String {
    let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext_with_tag.len());
    payload.extend_from_slice(nonce);
    payload.extend_from_slice(ciphertext_with_tag);
    format!(
        "{}{}{}",
        version,
        VERSION_SEPARATOR,
        STANDARD.encode(payload)
    )
}

/// Parse a stored envelope back into its tagged form
pub fn parse(raw: &str) -> Result<Envelope> {
    match raw.split_once(VERSION_SEPARATOR) {
        Some((label, payload)) => {
            let version = VersionTag::new(label)?;
            let (nonce, ciphertext) = decode_payload(payload)?;
            Ok(Envelope::Versioned {
                version,
                nonce,
                ciphertext,
            })
        }
        // No separator anywhere: the whole value is legacy base64.
        None => {
            let (nonce, ciphertext) = decode_payload(raw)?;
            Ok(Envelope::Legacy { nonce, ciphertext })
        }
    }
}

fn decode_payload(payload: &str) -> Result<([u8; NONCE_LEN], Vec<u8>)> {
    let bytes = STANDARD
        .decode(payload)
        .map_err(|_| CoreError::Validation("envelope payload is not valid base64".into()))?;
    if bytes.len() < NONCE_LEN + TAG_LEN {
        return Err(CoreError::Validation(format!(
            "envelope payload too short: {} bytes",
            bytes.len()
        )));
    }
    let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_LEN);
    let nonce: [u8; NONCE_LEN] = nonce_bytes
        .try_into()
        .expect("split_at yields NONCE_LEN bytes");
    Ok((nonce, ciphertext.to_vec()))
}
