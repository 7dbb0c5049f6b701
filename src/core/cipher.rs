// src/core/cipher.rs
//! Pure AEAD primitives: no I/O, no registry
//!
//! Raw AES-256-GCM encryption/decryption of in-memory buffers. Everything
//! above this layer (envelopes, version resolution) lives elsewhere.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use aes_gcm::{Aes256Gcm, Nonce};

use crate::consts::{KEY_LEN, NONCE_LEN};
use crate::error::CoreError;

pub type Result<T> = std::result::Result<T, CoreError>;

fn build_cipher(key: &[u8]) -> Result<Aes256Gcm> {
    // Exact length or nothing; a key is never truncated or padded.
    if key.len() != KEY_LEN {
        return Err(CoreError::Validation(format!(
            "key must be exactly {KEY_LEN} bytes, got {}",
            key.len()
        )));
    }
    Aes256Gcm::new_from_slice(key)
        .map_err(|_| CoreError::Validation(format!("key must be exactly {KEY_LEN} bytes")))
}

/// Encrypt `plaintext` under `key` with a fresh random nonce
///
/// Returns the nonce and the ciphertext with the 16-byte GCM tag appended.
/// `aad`, when present, must be supplied unchanged at decryption.
pub fn encrypt_to_vec(
    plaintext: &[u8],
    key: &[u8],
    aad: Option<&[u8]>,
) -> Result<([u8; NONCE_LEN], Vec<u8>)> {
    let cipher = build_cipher(key)?;

    // Fresh OS-CSPRNG nonce on every call; never derived from a counter.
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(
            &nonce,
            Payload {
                msg: plaintext,
                aad: aad.unwrap_or_default(),
            },
        )
        .map_err(|_| CoreError::Validation("plaintext too large for AES-GCM".into()))?;

    Ok((nonce.into(), ciphertext))
}

/// Decrypt and authenticate `ciphertext_with_tag`
///
/// Wrong key, corrupted ciphertext and tampering all surface as the single
/// generic [`CoreError::DecryptionFailed`].
pub fn decrypt_to_vec(
    nonce: &[u8; NONCE_LEN],
    ciphertext_with_tag: &[u8],
    key: &[u8],
    aad: Option<&[u8]>,
) -> Result<Vec<u8>> {
    let cipher = build_cipher(key)?;
    cipher
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: ciphertext_with_tag,
                aad: aad.unwrap_or_default(),
            },
        )
        .map_err(|_| CoreError::DecryptionFailed)
}
