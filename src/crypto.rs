// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/typogram

//! Symmetric encryption of the secret payload.
//!
//! Key derivation is PBKDF2-HMAC-SHA256 with 2^20 iterations. The salt is
//! steganographically bound to the cover text: the first 16 bytes of
//! `SHA-256(coverText)` (or of the empty string in `nosalt` mode),
//! concatenated with a fresh 2-byte random "extra salt" that travels in
//! plaintext at the front of the payload so the decoder can rebuild the
//! same derivation salt.
//!
//! Two cipher modes share one payload layout,
//! `[extraSalt][ciphertext][authTag]`:
//!
//! - unauthenticated (default): 48 derived bytes — AES-256-CTR with
//!   key = first 32, initial counter block = last 16. No tag. A wrong
//!   password yields garbage, silently; that is inherent to unauthenticated
//!   symmetric decryption and deliberate here (plausible deniability).
//! - authenticated: 44 derived bytes — AES-256-GCM with key = first 32,
//!   nonce = last 12, and a 16-byte tag appended to the ciphertext. A wrong
//!   password is a hard [`TypoError::DecryptionFailed`].

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use ctr::cipher::{KeyIvInit, StreamCipher};
use pbkdf2::pbkdf2_hmac;
use rand::Rng;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::TypoError;
use crate::format::{self, SecretFormat};

type Aes256Ctr = ctr::Ctr128BE<aes::Aes256>;

/// PBKDF2 iteration count.
pub const KDF_ITERATIONS: u32 = 0x10_0000;
/// Length of the cover-text half of the derivation salt.
pub const COVER_SALT_LEN: usize = 16;
/// Length of the random extra salt stored in the payload.
pub const EXTRA_SALT_LEN: usize = 2;
/// GCM authentication tag length.
pub const TAG_LEN: usize = 16;

/// Derived key length for CTR mode: 32-byte key + 16-byte counter block.
const CTR_KEY_LEN: usize = 48;
/// Derived key length for GCM mode: 32-byte key + 12-byte nonce.
const GCM_KEY_LEN: usize = 44;

/// Derive `length` key bytes from a password and salt.
/// An empty password is valid and treated as the empty string.
fn derive_key(password: &str, salt: &[u8], length: usize) -> Zeroizing<Vec<u8>> {
    let mut key = Zeroizing::new(vec![0u8; length]);
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, KDF_ITERATIONS, &mut key);
    key
}

/// The cover-text half of the derivation salt: first 16 bytes of the
/// SHA-256 digest of the cover text (or of `""` in nosalt mode).
pub fn cover_salt(cover_text: &str, nosalt: bool) -> [u8; COVER_SALT_LEN] {
    let material = if nosalt { "" } else { cover_text };
    let digest = Sha256::digest(material.as_bytes());
    digest[..COVER_SALT_LEN].try_into().expect("SHA-256 digest is 32 bytes")
}

/// Encrypt raw bytes under a password-derived key.
pub fn encrypt(data: &[u8], password: &str, salt: &[u8], authenticated: bool) -> Vec<u8> {
    if authenticated {
        let key = derive_key(password, salt, GCM_KEY_LEN);
        let cipher = Aes256Gcm::new_from_slice(&key[..32]).expect("valid key length");
        let nonce = Nonce::from_slice(&key[32..]);
        // Appends the 16-byte tag; layout matches [ciphertext][authTag].
        cipher.encrypt(nonce, data).expect("AES-GCM encrypt should not fail")
    } else {
        let key = derive_key(password, salt, CTR_KEY_LEN);
        let mut cipher =
            Aes256Ctr::new_from_slices(&key[..32], &key[32..]).expect("valid key/iv length");
        let mut out = data.to_vec();
        cipher.apply_keystream(&mut out);
        out
    }
}

/// Decrypt the exact inverse of [`encrypt`].
///
/// In authenticated mode the trailing 16-byte tag is verified; a mismatch
/// is [`TypoError::DecryptionFailed`]. In unauthenticated mode decryption
/// cannot fail — a wrong password just produces garbage bytes.
pub fn decrypt(
    data: &[u8],
    password: &str,
    salt: &[u8],
    authenticated: bool,
) -> Result<Vec<u8>, TypoError> {
    if authenticated {
        if data.len() < TAG_LEN {
            return Err(TypoError::PayloadTooShort);
        }
        let key = derive_key(password, salt, GCM_KEY_LEN);
        let cipher = Aes256Gcm::new_from_slice(&key[..32]).expect("valid key length");
        let nonce = Nonce::from_slice(&key[32..]);
        cipher.decrypt(nonce, data).map_err(|_| TypoError::DecryptionFailed)
    } else {
        Ok(encrypt(data, password, salt, false)) // CTR is an involution
    }
}

/// Encrypt a secret for embedding.
///
/// Returns the payload `[extraSalt: 0 or 2][ciphertext][authTag: 0 or 16]`.
/// `nosalt` drops the extra salt entirely (deterministic output for a given
/// password and secret).
pub fn encrypt_secret<R: Rng>(
    secret: &str,
    secret_format: SecretFormat,
    password: &str,
    cover_text: &str,
    nosalt: bool,
    authenticated: bool,
    rng: &mut R,
) -> Result<Vec<u8>, TypoError> {
    let plain = format::secret_to_bytes(secret, secret_format)?;

    let mut extra = Vec::new();
    if !nosalt {
        let mut bytes = [0u8; EXTRA_SALT_LEN];
        rng.fill(&mut bytes);
        extra.extend_from_slice(&bytes);
    }

    let mut salt = cover_salt(cover_text, nosalt).to_vec();
    salt.extend_from_slice(&extra);

    let encrypted = encrypt(&plain, password, &salt, authenticated);

    let mut payload = extra;
    payload.extend_from_slice(&encrypted);
    Ok(payload)
}

/// Decrypt a payload reconstructed by the extractor.
///
/// Splits off the leading extra salt (unless `nosalt`), rebuilds the
/// derivation salt from the original cover text, and mirrors the secret's
/// textual format on output.
pub fn decrypt_payload(
    payload: &[u8],
    secret_format: SecretFormat,
    password: &str,
    cover_text: &str,
    nosalt: bool,
    authenticated: bool,
) -> Result<String, TypoError> {
    let begin = if nosalt { 0 } else { EXTRA_SALT_LEN };
    if payload.len() < begin {
        return Err(TypoError::PayloadTooShort);
    }

    let mut salt = cover_salt(cover_text, nosalt).to_vec();
    salt.extend_from_slice(&payload[..begin]);

    let plain = decrypt(&payload[begin..], password, &salt, authenticated)?;
    format::bytes_to_secret(&plain, secret_format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::from_seed([42u8; 32])
    }

    #[test]
    fn ctr_roundtrip() {
        let salt = [1u8; 18];
        let ct = encrypt(b"attack at dawn", "pw", &salt, false);
        assert_ne!(ct, b"attack at dawn");
        let pt = decrypt(&ct, "pw", &salt, false).unwrap();
        assert_eq!(pt, b"attack at dawn");
    }

    #[test]
    fn ctr_wrong_password_yields_garbage_not_error() {
        let salt = [1u8; 18];
        let ct = encrypt(b"attack at dawn", "pw", &salt, false);
        let pt = decrypt(&ct, "other", &salt, false).unwrap();
        assert_ne!(pt, b"attack at dawn");
    }

    #[test]
    fn gcm_roundtrip_and_tag_length() {
        let salt = [2u8; 18];
        let ct = encrypt(b"msg", "pw", &salt, true);
        assert_eq!(ct.len(), 3 + TAG_LEN);
        assert_eq!(decrypt(&ct, "pw", &salt, true).unwrap(), b"msg");
    }

    #[test]
    fn gcm_wrong_password_fails_hard() {
        let salt = [2u8; 18];
        let ct = encrypt(b"msg", "pw", &salt, true);
        assert!(matches!(
            decrypt(&ct, "other", &salt, true),
            Err(TypoError::DecryptionFailed)
        ));
    }

    #[test]
    fn gcm_truncated_payload_is_too_short() {
        assert!(matches!(
            decrypt(&[0u8; 8], "pw", &[0u8; 16], true),
            Err(TypoError::PayloadTooShort)
        ));
    }

    #[test]
    fn payload_roundtrip_with_extra_salt() {
        let cover = "The quick brown fox jumps over the lazy dog.";
        let payload =
            encrypt_secret("hi", SecretFormat::Text, "pw", cover, false, false, &mut rng())
                .unwrap();
        assert_eq!(payload.len(), EXTRA_SALT_LEN + 2);
        let secret =
            decrypt_payload(&payload, SecretFormat::Text, "pw", cover, false, false).unwrap();
        assert_eq!(secret, "hi");
    }

    #[test]
    fn nosalt_payload_is_deterministic_and_unsalted() {
        let cover = "Some cover text.";
        let a = encrypt_secret("hi", SecretFormat::Text, "pw", cover, true, false, &mut rng())
            .unwrap();
        let b = encrypt_secret("hi", SecretFormat::Text, "pw", cover, true, false, &mut rng())
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2, "no extra salt bytes in nosalt mode");
        // nosalt derivation ignores the cover text entirely.
        let secret =
            decrypt_payload(&a, SecretFormat::Text, "pw", "different text", true, false).unwrap();
        assert_eq!(secret, "hi");
    }

    #[test]
    fn salt_binds_payload_to_cover_text() {
        let payload =
            encrypt_secret("hi", SecretFormat::Text, "pw", "cover one", false, true, &mut rng())
                .unwrap();
        assert!(matches!(
            decrypt_payload(&payload, SecretFormat::Text, "pw", "cover two", false, true),
            Err(TypoError::DecryptionFailed)
        ));
    }

    #[test]
    fn cover_salt_is_digest_prefix() {
        let salt = cover_salt("abc", false);
        // SHA-256("abc") = ba7816bf...
        assert_eq!(&salt[..4], &[0xba, 0x78, 0x16, 0xbf]);
        assert_eq!(cover_salt("abc", true), cover_salt("", false));
    }
}
