// src/rotation.rs
//! Rotation planning and batch re-encryption
//!
//! Staleness is a pure function of registry state and a clock reading.
//! Re-encryption is idempotent: an envelope already tagged with the current
//! version is returned untouched, so an interrupted batch can simply be
//! re-run from the start.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Duration, Utc};

use crate::core::cipher;
use crate::core::envelope::{self, Envelope};
use crate::core::{field, legacy};
use crate::enums::{KeyStatus, VersionTag};
use crate::error::CoreError;
use crate::registry::KeyRegistry;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Every Active or Retired key older than `max_age`, oldest first
///
/// Expired keys are already out of service and are not reported.
pub fn keys_needing_rotation(
    registry: &KeyRegistry,
    now: DateTime<Utc>,
    max_age: Duration,
) -> Vec<VersionTag> {
    registry
        .all_versions()
        .into_iter()
        .filter(|info| info.status != KeyStatus::Expired)
        .filter(|info| now.signed_duration_since(info.created_at) > max_age)
        .map(|info| info.version)
        .collect()
}

/// Stale versions as of now; `None` uses the configured default age policy
pub fn list_stale_versions(registry: &KeyRegistry, max_age_days: Option<i64>) -> Vec<VersionTag> {
    let days = max_age_days.unwrap_or_else(|| crate::config::load().rotation.max_key_age_days);
    keys_needing_rotation(registry, Utc::now(), Duration::days(days))
}

/// Re-wrap one stored envelope under the current active key
///
/// `old_version` is the version the caller believes produced the envelope;
/// legacy envelopes are attributed to the oldest registered version, and a
/// mismatch is a `Validation` error. An envelope already tagged with the
/// current version is returned byte-identical before any cipher work.
pub fn reencrypt(
    registry: &KeyRegistry,
    old_envelope: &str,
    old_version: &VersionTag,
) -> Result<String> {
    let parsed = envelope::parse(old_envelope)?;
    let current = registry.current_version()?;
    if parsed.version() == Some(&current) {
        return Ok(old_envelope.to_owned());
    }
    let attributed = match parsed.version() {
        Some(v) => v.clone(),
        None => registry.oldest_version()?,
    };
    if &attributed != old_version {
        return Err(CoreError::Validation(format!(
            "envelope is attributed to version {attributed}, caller expected {old_version}"
        )));
    }
    rewrap(registry, &parsed, &current)
}

fn rewrap(registry: &KeyRegistry, parsed: &Envelope, current: &VersionTag) -> Result<String> {
    let plaintext = match parsed {
        Envelope::Versioned {
            version,
            nonce,
            ciphertext,
        } => {
            let key = field::checked_key(registry, version)?;
            cipher::decrypt_to_vec(nonce, ciphertext, key.expose_secret(), None)?
        }
        Envelope::Legacy { nonce, ciphertext } => {
            let key = legacy::legacy_key(registry)?;
            cipher::decrypt_to_vec(nonce, ciphertext, key.expose_secret(), None)?
        }
    };
    let key = registry.get_key(current)?;
    let (nonce, ciphertext) = cipher::encrypt_to_vec(&plaintext, key.expose_secret(), None)?;
    Ok(envelope::format(current, &nonce, &ciphertext))
}

/// Result of one batch run
#[derive(Debug)]
pub struct BatchReport {
    /// Records rewritten under the current key: (record id, new envelope)
    pub updated: Vec<(String, String)>,
    /// Records already tagged with the current version
    pub skipped: usize,
    /// True when the cancel flag stopped the run early
    pub cancelled: bool,
}

/// Drive re-encryption over `(record_id, envelope)` pairs
///
/// The cancel flag is checked between records, never mid-cipher; a cancelled
/// or failed run is safe to restart because already-migrated records are
/// skipped without cipher work. Per-record errors stop the run and propagate.
pub fn reencrypt_batch<I>(
    registry: &KeyRegistry,
    records: I,
    cancel: &AtomicBool,
) -> Result<BatchReport>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut report = BatchReport {
        updated: Vec::new(),
        skipped: 0,
        cancelled: false,
    };
    let current = registry.current_version()?;
    for (record_id, raw) in records {
        if cancel.load(Ordering::Relaxed) {
            report.cancelled = true;
            break;
        }
        let parsed = match envelope::parse(&raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(record = %record_id, "re-encryption failed: bad envelope");
                return Err(err);
            }
        };
        if parsed.version() == Some(&current) {
            report.skipped += 1;
            continue;
        }
        match rewrap(registry, &parsed, &current) {
            Ok(new_envelope) => report.updated.push((record_id, new_envelope)),
            Err(err) => {
                tracing::warn!(record = %record_id, "re-encryption failed");
                return Err(err);
            }
        }
    }
    tracing::info!(
        updated = report.updated.len(),
        skipped = report.skipped,
        cancelled = report.cancelled,
        "re-encryption batch finished"
    );
    Ok(report)
}
