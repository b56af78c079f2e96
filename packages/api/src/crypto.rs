//! # Cryptographic utilities for sealing session payloads
//!
//! Session cookies are opaque to the browser: the payload is encrypted and
//! authenticated with **AES-256-GCM** under a key derived from the server-held
//! signing secret.
//!
//! ## Key
//!
//! [`SealingKey::derive`] hashes the configured secret with SHA-256 behind a fixed
//! domain label, so any non-empty secret string yields a 32-byte key. The same key
//! serves both [`seal`](SealingKey::seal) and [`open`](SealingKey::open); per-token
//! uniqueness comes from the random 12-byte nonce.
//!
//! ## Wire layout
//!
//! `nonce (12 bytes) || ciphertext || tag (16 bytes)`. The GCM tag covers the whole
//! ciphertext, so flipping any bit of the sealed bytes makes [`open`](SealingKey::open)
//! fail.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use sha2::{Digest, Sha256};

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;
const KEY_LABEL: &[u8] = b"dashboard-session-v1:";

/// Symmetric key used to seal and open session payloads.
#[derive(Clone)]
pub struct SealingKey {
    key: [u8; 32],
}

impl SealingKey {
    /// Derive the 32-byte key from the configured secret.
    pub fn derive(secret: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(KEY_LABEL);
        hasher.update(secret.as_bytes());
        let digest = hasher.finalize();
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        Self { key }
    }

    /// Encrypt data using AES-256-GCM with a random 12-byte nonce.
    /// Returns `nonce || ciphertext`.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, String> {
        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| format!("Failed to create cipher: {}", e))?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| format!("Encryption failed: {}", e))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    /// Decrypt `nonce || ciphertext`. `None` on truncated input or a failed tag.
    pub fn open(&self, sealed: &[u8]) -> Option<Vec<u8>> {
        if sealed.len() < NONCE_LEN + TAG_LEN {
            return None;
        }
        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
        let cipher = Aes256Gcm::new_from_slice(&self.key).ok()?;
        cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .ok()
    }
}

impl std::fmt::Debug for SealingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SealingKey(..)")
    }
}
