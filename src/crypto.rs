//! At-rest encryption for the stored session token.
//!
//! The encrypted file is a small JSON envelope of base64 fields:
//! `{ "s": salt, "n": nonce, "ct": ciphertext }`. The key is derived from an
//! operator secret with PBKDF2-HMAC-SHA256 and the ciphertext is sealed with
//! AES-256-GCM, so tampering is detected by the authentication tag.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::debug;

/// PBKDF2 iteration count for key derivation.
pub const KDF_ITERATIONS: u32 = 200_000;

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// Serialized form of an encrypted token file.
#[derive(Debug, Serialize, Deserialize)]
pub struct EncryptedBlob {
    /// base64 KDF salt
    pub s: String,
    /// base64 AES-GCM nonce
    pub n: String,
    /// base64 ciphertext (includes the auth tag)
    pub ct: String,
}

fn derive_key(secret: &str, salt: &[u8]) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(secret.as_bytes(), salt, KDF_ITERATIONS, &mut key);
    key
}

/// Encrypt `plaintext` under a key derived from `secret`.
///
/// A fresh random salt and nonce are generated per call, so sealing the same
/// plaintext twice never reuses a nonce.
pub fn seal(plaintext: &[u8], secret: &str) -> Result<EncryptedBlob> {
    let mut salt = [0u8; SALT_LEN];
    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    rand::thread_rng().fill_bytes(&mut nonce);

    let key = derive_key(secret, &salt);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| anyhow::anyhow!("encryption failed"))
        .context("Failed to seal token")?;

    Ok(EncryptedBlob {
        s: BASE64.encode(salt),
        n: BASE64.encode(nonce),
        ct: BASE64.encode(ciphertext),
    })
}

/// Decrypt a blob with a key derived from `secret`.
///
/// Fails closed: any malformed field, wrong secret, or tampered ciphertext
/// yields `None`. Callers treat that as "no usable token" rather than an
/// error, so a bad secret never aborts a run.
pub fn open(blob: &EncryptedBlob, secret: &str) -> Option<Vec<u8>> {
    let salt = BASE64.decode(&blob.s).ok()?;
    let nonce = BASE64.decode(&blob.n).ok()?;
    let ciphertext = BASE64.decode(&blob.ct).ok()?;

    if salt.is_empty() || nonce.len() != NONCE_LEN || ciphertext.is_empty() {
        debug!("Encrypted blob has malformed fields");
        return None;
    }

    let key = derive_key(secret, &salt);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    match cipher.decrypt(Nonce::from_slice(&nonce), ciphertext.as_slice()) {
        Ok(plaintext) => Some(plaintext),
        Err(_) => {
            debug!("Decryption failed (wrong secret or tampered blob)");
            None
        }
    }
}

#[cfg(test)]
#[path = "crypto_test.rs"]
mod crypto_test;
