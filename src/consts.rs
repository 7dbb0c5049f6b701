// src/consts.rs
//! Shared constants: security parameters and defaults

/// AES-256 key length in bytes
pub const KEY_LEN: usize = 32;

/// AES-GCM nonce length in bytes (96-bit, the standard size)
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes
pub const TAG_LEN: usize = 16;

/// Separator between the version label and the base64 payload in an envelope
// Standard base64 never emits ':', so any ':' marks a versioned envelope
pub const VERSION_SEPARATOR: char = ':';

/// Default key age before rotation is due (HIPAA-driven retention policy)
pub const DEFAULT_MAX_KEY_AGE_DAYS: i64 = 90;

/// Hex characters of a BLAKE3 key fingerprint kept for log lines
pub const FINGERPRINT_LEN_HEX: usize = 16;
