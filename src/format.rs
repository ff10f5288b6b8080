// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/typogram

//! Textual encodings of the secret.
//!
//! The secret handed to the embedder may be plain UTF-8 text, or hex/base64
//! that must first be decoded to raw bytes. Decoding mirrors the chosen
//! format on output, so a hex-encoded secret round-trips as hex.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::error::TypoError;

/// How the secret string maps to payload bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecretFormat {
    /// The secret is UTF-8 text; its bytes are embedded as-is.
    #[default]
    Text,
    /// The secret is hexadecimal. An odd-length string is left-padded with
    /// one `0`.
    Hex,
    /// The secret is standard base64.
    Base64,
}

/// Decode a secret string into the bytes to encrypt.
pub fn secret_to_bytes(secret: &str, format: SecretFormat) -> Result<Vec<u8>, TypoError> {
    match format {
        SecretFormat::Text => Ok(secret.as_bytes().to_vec()),
        SecretFormat::Hex => {
            let padded;
            let s = if secret.len() % 2 == 1 {
                padded = format!("0{secret}");
                &padded
            } else {
                secret
            };
            hex::decode(s).map_err(|_| TypoError::InvalidSecretEncoding)
        }
        SecretFormat::Base64 => BASE64.decode(secret).map_err(|_| TypoError::InvalidSecretEncoding),
    }
}

/// Encode decrypted bytes back into the secret's textual form.
pub fn bytes_to_secret(bytes: &[u8], format: SecretFormat) -> Result<String, TypoError> {
    match format {
        SecretFormat::Text => {
            String::from_utf8(bytes.to_vec()).map_err(|_| TypoError::InvalidUtf8)
        }
        SecretFormat::Hex => Ok(hex::encode(bytes)),
        SecretFormat::Base64 => Ok(BASE64.encode(bytes)),
    }
}
