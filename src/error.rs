// src/error.rs
//! Public error type for the entire crate
//!
//! Variants carry version labels, lengths and record identifiers only;
//! never key bytes, never plaintext.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed input rejected before any cryptography happens
    #[error("invalid input: {0}")]
    Validation(String),

    /// Authentication or decryption failure; the cause is deliberately
    /// not distinguished (wrong key, corruption and tampering all look alike)
    #[error("decryption failed")]
    DecryptionFailed,

    /// Envelope references a version the registry does not know
    #[error("unknown key version: {version}")]
    KeyVersionNotFound { version: String },

    /// Version is past its retention window and refuses to decrypt
    #[error("key version {version} is expired")]
    KeyVersionExpired { version: String },

    /// Registry was never initialized with an active key
    #[error("no active encryption key registered")]
    NoActiveKey,

    /// Keyfile could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Keyfile could not be parsed
    #[error("keyfile parse error: {0}")]
    Keyfile(#[from] serde_json::Error),
}
