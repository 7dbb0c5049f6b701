// src/key_ops.rs
//! Key generation and fingerprinting utilities
//!
//! New keys are generated here; registry entries and log lines identify
//! keys by a short BLAKE3 fingerprint, never by the bytes themselves.

use crate::aliases::{FieldKey32, SecureRandomExt};
use crate::consts::FINGERPRINT_LEN_HEX;

pub type Key = FieldKey32;

/// Generate a new random 256-bit field key
#[inline]
pub fn generate_key() -> Key {
    FieldKey32::random()
}

/// Short BLAKE3 digest of the key bytes, safe to include in logs
pub fn key_fingerprint(key: &FieldKey32) -> String {
    let mut hex = blake3::hash(key.expose_secret()).to_hex().to_string();
    hex.truncate(FINGERPRINT_LEN_HEX);
    hex
}
