// src/aliases.rs
//! Re-exports secure-gate's ergonomic secret types
//!
//! These are the canonical key-material types used throughout field-vault.

pub use secure_gate::{
    dynamic_alias, fixed_alias, random_alias, SecureConversionsExt, SecureRandomExt,
};

// Fixed-size secrets
fixed_alias!(FieldKey32, 32); // 256-bit AES-GCM field key

// Dynamic secrets
dynamic_alias!(KeyMaterial, Vec<u8>); // raw key bytes in flight from a key source
