// tests/support.rs
//! Shared fixtures: registries, keys and envelope builders

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{Duration, Utc};

use field_vault::core::cipher::encrypt_to_vec;
use field_vault::enums::VersionTag;
use field_vault::registry::KeyRegistry;

#[allow(dead_code)]
pub fn vtag(label: &str) -> VersionTag {
    VersionTag::new(label).unwrap()
}

#[allow(dead_code)]
pub fn test_key(seed: u8) -> Vec<u8> {
    vec![seed; 32]
}

/// Registry with `v1` active, created ten days ago
#[allow(dead_code)]
pub fn registry_v1() -> KeyRegistry {
    let registry = KeyRegistry::new();
    registry
        .register_key(vtag("v1"), &test_key(0x11), Utc::now() - Duration::days(10))
        .unwrap();
    registry
}

/// Registry with `v1` retired and `v2` active
#[allow(dead_code)]
pub fn registry_v1_v2() -> KeyRegistry {
    let registry = registry_v1();
    registry
        .register_key(vtag("v2"), &test_key(0x22), Utc::now())
        .unwrap();
    registry
}

/// Build an unprefixed (pre-versioning) envelope for `plaintext` under `key`
#[allow(dead_code)]
pub fn legacy_envelope(plaintext: &[u8], key: &[u8]) -> String {
    let (nonce, ciphertext) = encrypt_to_vec(plaintext, key, None).unwrap();
    let mut payload = nonce.to_vec();
    payload.extend_from_slice(&ciphertext);
    STANDARD.encode(payload)
}
