// src/lib.rs
//! field-vault: field-level encryption at rest with versioned keys
//!
//! Features:
//! - AES-256-GCM authenticated encryption per text field
//! - Self-describing `"v2:<base64>"` envelope format
//! - Key registry with an active/retired/expired lifecycle
//! - 90-day rotation planning and idempotent batch re-encryption
//! - Legacy (unversioned) ciphertext fallback via the oldest key

pub mod aliases;
pub mod config;
pub mod consts;
pub mod core;
pub mod enums;
pub mod error;
pub mod key_ops;
pub mod keysource;
pub mod registry;
pub mod rotation;

// Re-export everything users need at the crate root
pub use aliases::{FieldKey32, KeyMaterial, SecureConversionsExt, SecureRandomExt};
pub use config::load as load_config;
pub use crate::core::{decrypt_from_storage, encrypt_for_storage, Envelope};
pub use crate::core::Result as CoreResult;
pub use enums::{KeyStatus, VersionTag};
pub use error::CoreError;
pub use key_ops::generate_key;
pub use keysource::{FetchedKey, JsonKeyfileSource, KeySource, StaticKeySource};
pub use registry::{KeyRegistry, KeyVersionInfo};
pub use rotation::{keys_needing_rotation, list_stale_versions, reencrypt, reencrypt_batch, BatchReport};
