// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/typogram

//! Error types for the typo steganography pipeline.
//!
//! [`TypoError`] covers all failure modes from rule loading through
//! encryption, embedding, and extraction. All failures are value-level;
//! nothing in this crate terminates the process.

use core::fmt;

/// Errors that can occur while building a context, encoding, or decoding.
#[derive(Debug)]
pub enum TypoError {
    /// A rule file record could not be turned into a rule (bad regex or
    /// missing replacement field).
    InvalidRule {
        /// Name of the rule set being parsed.
        set: String,
        /// 1-based line number of the offending record.
        line: usize,
        /// What went wrong.
        reason: String,
    },
    /// The cover text cannot hold the payload at any density multiplier.
    CoverTextTooShort,
    /// The recovered payload is shorter than the fixed header it must carry.
    PayloadTooShort,
    /// AES-GCM authentication failed (wrong password or corrupted payload).
    DecryptionFailed,
    /// The secret string is not valid hex/base64 for the chosen format.
    InvalidSecretEncoding,
    /// The decrypted secret is not valid UTF-8.
    InvalidUtf8,
    /// The operation was cancelled by the caller.
    Cancelled,
}

impl fmt::Display for TypoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRule { set, line, reason } => {
                write!(f, "invalid rule in set '{set}' at line {line}: {reason}")
            }
            Self::CoverTextTooShort => write!(f, "not enough cover text for this secret"),
            Self::PayloadTooShort => write!(f, "recovered payload too short to decrypt"),
            Self::DecryptionFailed => write!(f, "decryption failed (wrong password?)"),
            Self::InvalidSecretEncoding => write!(f, "secret is not valid for the chosen format"),
            Self::InvalidUtf8 => write!(f, "decrypted secret is not valid UTF-8"),
            Self::Cancelled => write!(f, "operation cancelled by caller"),
        }
    }
}

impl std::error::Error for TypoError {}
