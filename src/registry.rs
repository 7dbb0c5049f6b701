// src/registry.rs
//! In-memory key registry: version to key material, lifecycle, ages
//!
//! One registry instance is constructed at startup from a key source and
//! handed to every component that needs it. At most one Active version
//! exists at any time; registering a new key demotes the previous Active
//! version to Retired inside the same write-lock section, so concurrent
//! readers never observe zero or two Active keys.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aliases::FieldKey32;
use crate::consts::KEY_LEN;
use crate::enums::{KeyStatus, VersionTag};
use crate::error::CoreError;
use crate::key_ops::key_fingerprint;
use crate::keysource::KeySource;

pub type Result<T> = std::result::Result<T, CoreError>;

/// One registered key generation
struct KeyVersion {
    version: VersionTag,
    key: FieldKey32,
    created_at: DateTime<Utc>,
    status: KeyStatus,
    fingerprint: String,
}

/// Metadata snapshot of one version: everything except the key bytes
#[derive(Debug, Clone, Serialize)]
pub struct KeyVersionInfo {
    pub version: VersionTag,
    pub status: KeyStatus,
    pub created_at: DateTime<Utc>,
    pub fingerprint: String,
}

struct Inner {
    // Registration order, oldest first. Labels are opaque; their text is
    // never compared for ordering.
    versions: Vec<KeyVersion>,
    active: Option<usize>,
}

impl Inner {
    fn find(&self, version: &VersionTag) -> Result<&KeyVersion> {
        self.versions
            .iter()
            .find(|k| &k.version == version)
            .ok_or_else(|| CoreError::KeyVersionNotFound {
                version: version.as_str().to_owned(),
            })
    }
}

pub struct KeyRegistry {
    inner: RwLock<Inner>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                versions: Vec::new(),
                active: None,
            }),
        }
    }

    /// Populate from a key source, oldest first; the last key becomes Active
    pub fn from_source(source: &dyn KeySource) -> Result<Self> {
        let registry = Self::new();
        let fetched = source.fetch_keys()?;
        let count = fetched.len();
        for entry in fetched {
            registry.register_key(entry.version, entry.key.expose_secret(), entry.created_at)?;
        }
        tracing::info!(keys = count, "key registry initialized from source");
        Ok(registry)
    }

    /// Register `version` as the new Active key
    ///
    /// Rejects key material that is not exactly 32 bytes and labels that are
    /// already known. Callers needing idempotent startup should check
    /// [`KeyRegistry::contains`] first.
    pub fn register_key(
        &self,
        version: VersionTag,
        key_bytes: &[u8],
        created_at: DateTime<Utc>,
    ) -> Result<()> {
        if key_bytes.len() != KEY_LEN {
            return Err(CoreError::Validation(format!(
                "key for version {version} must be exactly {KEY_LEN} bytes, got {}",
                key_bytes.len()
            )));
        }
        let key = FieldKey32::new(
            <[u8; KEY_LEN]>::try_from(key_bytes).expect("length checked above"),
        );
        let fingerprint = key_fingerprint(&key);

        let mut inner = self.write();
        if inner.versions.iter().any(|k| k.version == version) {
            return Err(CoreError::Validation(format!(
                "key version already registered: {version}"
            )));
        }
        if let Some(idx) = inner.active {
            inner.versions[idx].status = KeyStatus::Retired;
        }
        inner.versions.push(KeyVersion {
            version: version.clone(),
            key,
            created_at,
            status: KeyStatus::Active,
            fingerprint: fingerprint.clone(),
        });
        inner.active = Some(inner.versions.len() - 1);
        drop(inner);

        tracing::info!(
            version = %version,
            fingerprint = %fingerprint,
            "registered new active encryption key"
        );
        Ok(())
    }

    /// True when `version` is already known, whatever its status
    pub fn contains(&self, version: &VersionTag) -> bool {
        self.read().versions.iter().any(|k| &k.version == version)
    }

    /// Neutral key lookup: Active, Retired and Expired versions all resolve
    ///
    /// Callers that must reject Expired keys check the status explicitly.
    pub fn get_key(&self, version: &VersionTag) -> Result<FieldKey32> {
        let inner = self.read();
        let entry = inner.find(version)?;
        Ok(FieldKey32::new(*entry.key.expose_secret()))
    }

    pub fn status(&self, version: &VersionTag) -> Result<KeyStatus> {
        Ok(self.read().find(version)?.status)
    }

    /// The sole Active version
    pub fn current_version(&self) -> Result<VersionTag> {
        let inner = self.read();
        inner
            .active
            .map(|i| inner.versions[i].version.clone())
            .ok_or(CoreError::NoActiveKey)
    }

    /// Active version and its key in one lock acquisition
    pub fn current_key(&self) -> Result<(VersionTag, FieldKey32)> {
        let inner = self.read();
        let idx = inner.active.ok_or(CoreError::NoActiveKey)?;
        let entry = &inner.versions[idx];
        Ok((
            entry.version.clone(),
            FieldKey32::new(*entry.key.expose_secret()),
        ))
    }

    /// Every known version, oldest first, without key bytes
    pub fn all_versions(&self) -> Vec<KeyVersionInfo> {
        self.read()
            .versions
            .iter()
            .map(|k| KeyVersionInfo {
                version: k.version.clone(),
                status: k.status,
                created_at: k.created_at,
                fingerprint: k.fingerprint.clone(),
            })
            .collect()
    }

    /// The version legacy (unprefixed) ciphertext is attributed to
    pub fn oldest_version(&self) -> Result<VersionTag> {
        self.read()
            .versions
            .first()
            .map(|k| k.version.clone())
            .ok_or(CoreError::NoActiveKey)
    }

    /// Retire a key for good: Retired to Expired
    ///
    /// The Active key cannot be expired; expiring an already-Expired version
    /// is a no-op.
    pub fn mark_expired(&self, version: &VersionTag) -> Result<()> {
        let mut inner = self.write();
        let entry = inner
            .versions
            .iter_mut()
            .find(|k| &k.version == version)
            .ok_or_else(|| CoreError::KeyVersionNotFound {
                version: version.as_str().to_owned(),
            })?;
        match entry.status {
            KeyStatus::Active => Err(CoreError::Validation(format!(
                "cannot expire the active key version {version}"
            ))),
            KeyStatus::Expired => Ok(()),
            KeyStatus::Retired => {
                entry.status = KeyStatus::Expired;
                drop(inner);
                tracing::info!(version = %version, "encryption key expired");
                Ok(())
            }
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("key registry lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("key registry lock poisoned")
    }
}

impl Default for KeyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
