// src/keysource.rs
//! Key acquisition boundary
//!
//! The engine never talks to a secret store directly: it consumes
//! [`KeySource`] once at startup and again when an operator rotates.
//! Production wiring (cloud secret manager, environment, files) is an
//! adapter behind this trait.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::aliases::KeyMaterial;
use crate::enums::VersionTag;
use crate::error::CoreError;

pub type Result<T> = std::result::Result<T, CoreError>;

/// One key generation as delivered by a source
#[derive(Clone)]
pub struct FetchedKey {
    pub version: VersionTag,
    pub key: KeyMaterial,
    pub created_at: DateTime<Utc>,
}

pub trait KeySource {
    /// Enumerate all key generations, oldest first
    fn fetch_keys(&self) -> Result<Vec<FetchedKey>>;
}

/// In-memory source for tests and embedded callers
pub struct StaticKeySource {
    keys: Vec<FetchedKey>,
}

impl StaticKeySource {
    pub fn new(keys: Vec<FetchedKey>) -> Self {
        Self { keys }
    }
}

impl KeySource for StaticKeySource {
    fn fetch_keys(&self) -> Result<Vec<FetchedKey>> {
        Ok(self.keys.clone())
    }
}

/// JSON keyfile adapter
///
/// File format, oldest entry first:
/// `[{"version": "v1", "key_hex": "<64 hex chars>", "created_at": "2025-01-01T00:00:00Z"}]`
pub struct JsonKeyfileSource {
    path: PathBuf,
}

#[derive(Deserialize)]
struct KeyfileEntry {
    version: VersionTag,
    key_hex: String,
    created_at: DateTime<Utc>,
}

impl JsonKeyfileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Keyfile location from the loaded config
    pub fn from_config() -> Self {
        Self::new(&crate::config::load().keys.keyfile)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeySource for JsonKeyfileSource {
    fn fetch_keys(&self) -> Result<Vec<FetchedKey>> {
        let content = std::fs::read_to_string(&self.path)?;
        let entries: Vec<KeyfileEntry> = serde_json::from_str(&content)?;
        let mut keys = Vec::with_capacity(entries.len());
        for entry in entries {
            let bytes = hex::decode(&entry.key_hex).map_err(|_| {
                CoreError::Validation(format!(
                    "keyfile entry {}: key_hex is not valid hex",
                    entry.version
                ))
            })?;
            keys.push(FetchedKey {
                version: entry.version,
                key: KeyMaterial::new(bytes),
                created_at: entry.created_at,
            });
        }
        Ok(keys)
    }
}
