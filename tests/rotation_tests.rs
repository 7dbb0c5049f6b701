// tests/rotation_tests.rs
mod common;
mod support;

use std::sync::atomic::AtomicBool;

use chrono::{Duration, Utc};

use field_vault::core::cipher::encrypt_to_vec;
use field_vault::core::envelope;
use field_vault::core::field::{decrypt_from_storage, encrypt_for_storage};
use field_vault::error::CoreError;
use field_vault::registry::KeyRegistry;
use field_vault::rotation::{
    keys_needing_rotation, list_stale_versions, reencrypt, reencrypt_batch,
};

use support::{legacy_envelope, registry_v1, registry_v1_v2, test_key, vtag};

/// Envelope under an arbitrary registered version, bypassing the field adapter
fn envelope_under(registry: &KeyRegistry, version: &str, plaintext: &[u8]) -> String {
    let version = vtag(version);
    let key = registry.get_key(&version).unwrap();
    let (nonce, ciphertext) = encrypt_to_vec(plaintext, key.expose_secret(), None).unwrap();
    envelope::format(&version, &nonce, &ciphertext)
}

#[test]
fn test_fresh_keys_are_not_stale() {
    let registry = registry_v1(); // created ten days ago
    let due = keys_needing_rotation(&registry, Utc::now(), Duration::days(90));
    assert!(due.is_empty());
}

#[test]
fn test_stale_keys_reported_oldest_first() {
    let registry = KeyRegistry::new();
    registry
        .register_key(vtag("v1"), &test_key(0x11), Utc::now() - Duration::days(120))
        .unwrap();
    registry
        .register_key(vtag("v2"), &test_key(0x22), Utc::now() - Duration::days(100))
        .unwrap();
    registry
        .register_key(vtag("v3"), &test_key(0x33), Utc::now())
        .unwrap();

    let due = keys_needing_rotation(&registry, Utc::now(), Duration::days(90));
    assert_eq!(due, [vtag("v1"), vtag("v2")]);
}

#[test]
fn test_expired_keys_not_reported() {
    let registry = KeyRegistry::new();
    registry
        .register_key(vtag("v1"), &test_key(0x11), Utc::now() - Duration::days(200))
        .unwrap();
    registry
        .register_key(vtag("v2"), &test_key(0x22), Utc::now() - Duration::days(100))
        .unwrap();
    registry
        .register_key(vtag("v3"), &test_key(0x33), Utc::now())
        .unwrap();
    registry.mark_expired(&vtag("v1")).unwrap();

    let due = keys_needing_rotation(&registry, Utc::now(), Duration::days(90));
    assert_eq!(due, [vtag("v2")]);
}

#[test]
fn test_active_key_can_be_stale() {
    let registry = KeyRegistry::new();
    registry
        .register_key(vtag("v1"), &test_key(0x11), Utc::now() - Duration::days(120))
        .unwrap();

    let due = keys_needing_rotation(&registry, Utc::now(), Duration::days(90));
    assert_eq!(due, [vtag("v1")]);
}

#[test]
fn test_list_stale_versions_default_policy() {
    let registry = KeyRegistry::new();
    registry
        .register_key(vtag("v1"), &test_key(0x11), Utc::now() - Duration::days(120))
        .unwrap();
    registry
        .register_key(vtag("v2"), &test_key(0x22), Utc::now())
        .unwrap();

    // Built-in policy is 90 days.
    assert_eq!(list_stale_versions(&registry, None), [vtag("v1")]);
    assert_eq!(list_stale_versions(&registry, Some(30)), [vtag("v1")]);
    assert!(list_stale_versions(&registry, Some(365)).is_empty());
}

#[test]
fn test_reencrypt_migrates_to_current_version() {
    common::setup();
    let registry = registry_v1();
    let old = encrypt_for_storage(&registry, Some("Patient reports knee pain"))
        .unwrap()
        .unwrap();
    registry
        .register_key(vtag("v2"), &test_key(0x22), Utc::now())
        .unwrap();

    let new = reencrypt(&registry, &old, &vtag("v1")).unwrap();
    assert!(new.starts_with("v2:"));
    assert_eq!(
        decrypt_from_storage(&registry, Some(&new)).unwrap().unwrap(),
        "Patient reports knee pain"
    );
}

#[test]
fn test_reencrypt_already_current_is_byte_identical() {
    let registry = registry_v1_v2();
    let envelope = encrypt_for_storage(&registry, Some("already migrated"))
        .unwrap()
        .unwrap();

    let unchanged = reencrypt(&registry, &envelope, &vtag("v2")).unwrap();
    assert_eq!(unchanged, envelope);
}

#[test]
fn test_reencrypt_rejects_version_mismatch() {
    let registry = registry_v1_v2();
    registry
        .register_key(vtag("v3"), &test_key(0x33), Utc::now())
        .unwrap();
    let old = envelope_under(&registry, "v1", b"mislabeled row");

    let err = reencrypt(&registry, &old, &vtag("v2"));
    assert!(matches!(err, Err(CoreError::Validation(_))));
}

#[test]
fn test_reencrypt_upgrades_legacy() {
    let registry = registry_v1_v2();
    let old = legacy_envelope(b"pre-versioning row", &test_key(0x11));

    let new = reencrypt(&registry, &old, &vtag("v1")).unwrap();
    assert!(new.starts_with("v2:"));
    assert_eq!(
        decrypt_from_storage(&registry, Some(&new)).unwrap().unwrap(),
        "pre-versioning row"
    );
}

#[test]
fn test_reencrypt_legacy_rejects_wrong_attribution() {
    let registry = registry_v1_v2();
    let old = legacy_envelope(b"pre-versioning row", &test_key(0x11));

    // Legacy data belongs to the oldest version, not v2.
    let err = reencrypt(&registry, &old, &vtag("v2"));
    assert!(matches!(err, Err(CoreError::Validation(_))));
}

#[test]
fn test_reencrypt_from_expired_version_fails_fast() {
    let registry = registry_v1_v2();
    let old = envelope_under(&registry, "v1", b"stranded row");
    registry.mark_expired(&vtag("v1")).unwrap();

    let err = reencrypt(&registry, &old, &vtag("v1"));
    assert!(matches!(err, Err(CoreError::KeyVersionExpired { .. })));
}

#[test]
fn test_reencrypt_batch_mixed_records() {
    common::setup();
    let registry = registry_v1();
    let old_a = encrypt_for_storage(&registry, Some("record a")).unwrap().unwrap();
    let old_b = encrypt_for_storage(&registry, Some("record b")).unwrap().unwrap();
    registry
        .register_key(vtag("v2"), &test_key(0x22), Utc::now())
        .unwrap();
    let fresh = encrypt_for_storage(&registry, Some("record c")).unwrap().unwrap();

    let cancel = AtomicBool::new(false);
    let records = vec![
        ("a".to_string(), old_a),
        ("c".to_string(), fresh),
        ("b".to_string(), old_b),
    ];
    let report = reencrypt_batch(&registry, records, &cancel).unwrap();

    assert_eq!(report.skipped, 1);
    assert!(!report.cancelled);
    assert_eq!(report.updated.len(), 2);
    for (id, envelope) in &report.updated {
        assert!(envelope.starts_with("v2:"));
        let plaintext = decrypt_from_storage(&registry, Some(envelope)).unwrap().unwrap();
        assert_eq!(plaintext, format!("record {id}"));
    }
}

#[test]
fn test_reencrypt_batch_stops_when_cancelled() {
    let registry = registry_v1_v2();
    let old = envelope_under(&registry, "v1", b"never reached");

    let cancel = AtomicBool::new(true);
    let report = reencrypt_batch(&registry, vec![("a".to_string(), old)], &cancel).unwrap();

    assert!(report.cancelled);
    assert!(report.updated.is_empty());
    assert_eq!(report.skipped, 0);
}

#[test]
fn test_reencrypt_batch_propagates_record_errors() {
    let registry = registry_v1_v2();
    let records = vec![("bad".to_string(), "###not-an-envelope".to_string())];

    let err = reencrypt_batch(&registry, records, &AtomicBool::new(false));
    assert!(matches!(err, Err(CoreError::Validation(_))));
}

#[test]
fn test_reencrypt_batch_requires_active_key() {
    let registry = KeyRegistry::new();
    let err = reencrypt_batch(&registry, Vec::new(), &AtomicBool::new(false));
    assert!(matches!(err, Err(CoreError::NoActiveKey)));
}
