// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/typogram

//! # typogram
//!
//! Text steganography engine that hides an encrypted secret in the
//! misspellings of an otherwise-ordinary text. Each deliberate typo carries
//! four bits (the low nibble of the first byte of the typo's SHA-256
//! digest); the typos are spread over the cover text at an adaptive density
//! so the result still reads like careless typing, not like a cipher.
//!
//! The secret is encrypted before embedding: PBKDF2-HMAC-SHA256 key
//! derivation salted with a digest of the cover text itself, then
//! AES-256-CTR (default, deniable) or AES-256-GCM (authenticated).
//!
//! Typos come from weighted rule sets — common misspellings, grammar slips,
//! and mutations synthesized from a keyboard layout, the latter filtered
//! through a trigram plausibility check so only typing-shaped errors
//! survive.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use typogram::{encode, decode_markup, Context, EncodeOptions, DecodeOptions, OutputStyle};
//!
//! let ctx = Context::builder().build().unwrap();
//! let opts = EncodeOptions { style: OutputStyle::Markup, ..Default::default() };
//! let marked = encode(&ctx, cover_text, "meet at dawn", "passphrase", &opts).unwrap();
//! let secret = decode_markup(&marked, "passphrase", &DecodeOptions::default()).unwrap();
//! assert_eq!(secret, "meet at dawn");
//! ```

pub mod context;
pub mod crypto;
pub mod dict;
pub mod embed;
pub mod error;
pub mod extract;
pub mod format;
pub mod progress;
pub mod rules;
pub mod typo;

pub use context::{Context, ContextBuilder};
pub use dict::{trigrams, Dictionary};
pub use embed::{encode, encode_with_rng, EncodeOptions, OutputStyle};
pub use error::TypoError;
pub use extract::{
    decode_markup, decode_typos, decode_with_original, extract_typos, extract_typos_from_markup,
    DecodeOptions,
};
pub use format::SecretFormat;
pub use typo::{generate_typos, query, word_value, TypoCandidate};
