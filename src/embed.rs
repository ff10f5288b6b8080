// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/typogram

//! Adaptive-density embedding of an encrypted payload into cover text.
//!
//! Each typo carries one nibble (the [`word_value`](crate::typo::word_value)
//! of the chosen mutation), so a payload of `n` bytes needs `2n` typos —
//! plus, by default, a coin-flipped extra typo carrying a random nibble so
//! the typo count is not always even. The target density is
//! `(2n + extra) / coverLength`; a running rate bar throttles typo emission
//! so the typos spread evenly instead of clustering at the front.
//!
//! A word where no candidate matches the required nibble is a silent miss,
//! not a failure: the bar simply lets more typos through later. If a full
//! scan places too few nibbles, the whole scan restarts from the original
//! payload with the density multiplied by 1.1, up to a 10x cap; past the
//! cap the cover text is judged too short.

use rand::Rng;

use crate::context::Context;
use crate::crypto;
use crate::error::TypoError;
use crate::format::SecretFormat;
use crate::progress;
use crate::typo::{generate_typos, is_word_char, word_value};

/// Density multiplier growth per retry.
const MULTIPLIER_STEP: f64 = 1.1;
/// Density multiplier cap; beyond this the cover text is too short.
const MULTIPLIER_CAP: f64 = 10.0;

/// How an accepted typo is written into the output text.
#[derive(Debug, Clone, Copy)]
pub enum OutputStyle {
    /// The typo replaces the word with no marker; decoding requires the
    /// original text.
    Plain,
    /// Reversible inline markup `{[s/<typo>/<original>/]}`; decoding needs
    /// no original.
    Markup,
    /// The typo is passed through a styling function (e.g. terminal
    /// colors). Not mechanically decodable; decoding requires the original
    /// text and the styled output stripped back to plain text.
    Decorated(fn(&str) -> String),
}

/// Options for [`encode`].
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
    pub style: OutputStyle,
    /// No randomness at all: no extra salt, no extra typo, no shuffling
    /// (the caller must also skip [`Context::shuffle`]). Implies `nosalt`.
    pub deterministic: bool,
    /// Derive the key from the empty-string digest and skip the extra salt.
    pub nosalt: bool,
    /// AES-256-GCM with a 16-byte tag instead of AES-256-CTR.
    pub authenticated: bool,
    pub format: SecretFormat,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            style: OutputStyle::Plain,
            deterministic: false,
            nosalt: false,
            authenticated: false,
            format: SecretFormat::Text,
        }
    }
}

/// Encode a secret into cover text using thread-local randomness.
pub fn encode(
    ctx: &Context,
    cover_text: &str,
    secret: &str,
    password: &str,
    options: &EncodeOptions,
) -> Result<String, TypoError> {
    encode_with_rng(ctx, cover_text, secret, password, options, &mut rand::thread_rng())
}

/// Encode a secret into cover text with an injected random source.
///
/// The randomness feeds the extra salt and the optional extra typo;
/// deterministic mode draws nothing from `rng`.
pub fn encode_with_rng<R: Rng>(
    ctx: &Context,
    cover_text: &str,
    secret: &str,
    password: &str,
    options: &EncodeOptions,
    rng: &mut R,
) -> Result<String, TypoError> {
    progress::init(0);

    let nosalt = options.deterministic || options.nosalt;
    let payload = crypto::encrypt_secret(
        secret,
        options.format,
        password,
        cover_text,
        nosalt,
        options.authenticated,
        rng,
    )?;
    log::debug!("encrypted payload: {} bytes", payload.len());

    // One in two times add an extra meaningless typo so the typo count is
    // not always even. The extractor discards it by truncation.
    let mut extra = [0u8; 2];
    let mut odd = false;
    if !options.deterministic {
        rng.fill(&mut extra);
        odd = extra[1] >= 128;
    }

    let cover_len = cover_text.chars().count();
    if cover_len == 0 {
        return Err(TypoError::CoverTextTooShort);
    }

    // Target fraction of characters after which each typo should appear.
    let density = (payload.len() * 2 + usize::from(odd)) as f64 / cover_len as f64;
    log::debug!("target density: {:.4} per thousand", density * 1000.0);

    let mut multiplier = 1.0_f64;
    loop {
        log::debug!("trying multiplier {multiplier:.4}");

        let attempt =
            attempt_embed(ctx, cover_text, &payload, &extra, odd, density * multiplier, options.style);
        progress::advance();

        if let Some(text) = attempt {
            progress::finish();
            return Ok(text);
        }

        multiplier *= MULTIPLIER_STEP;
        if multiplier > MULTIPLIER_CAP {
            return Err(TypoError::CoverTextTooShort);
        }
        progress::check_cancelled()?;
    }
}

/// One full scan of the cover text at a fixed target density.
///
/// Returns the completed text if every payload nibble was placed, `None`
/// otherwise. Each attempt starts from the original payload, so an
/// attempt's outcome depends only on the multiplier.
fn attempt_embed(
    ctx: &Context,
    cover_text: &str,
    payload: &[u8],
    extra: &[u8; 2],
    odd: bool,
    target_density: f64,
    style: OutputStyle,
) -> Option<String> {
    let mut working = payload.to_vec();
    let mut odd_pending = odd;

    let mut out = String::with_capacity(cover_text.len() + 64);
    let mut word = String::new();
    let mut count = 0usize; // typos emitted
    let mut scanned = 0usize; // characters consumed

    for (pos, c) in cover_text.char_indices() {
        if is_word_char(c) {
            word.push(c);
            scanned += 1;
            continue;
        }

        if !word.is_empty() {
            // Offset into the payload: two typos per byte.
            let offset = count >> 1;

            let candidate = if offset < working.len() {
                // Let the next typo through only while the realized rate
                // lags the target.
                let bar = if scanned == 0 || target_density <= 0.0 {
                    0.0
                } else {
                    count as f64 / scanned as f64 / target_density
                };
                if bar < 1.0 {
                    pick_typo(ctx, &word, working[offset] & 0x0F)
                } else {
                    None
                }
            } else if odd_pending {
                // Payload done; throw in the extra typo.
                pick_typo(ctx, &word, extra[0] & 0x0F)
            } else {
                None
            };

            match candidate {
                Some(typo) => {
                    let replacement = render(&typo, &word, style);

                    if offset < working.len() {
                        // Bring the next 4 bits into position.
                        working[offset] >>= 4;
                    } else {
                        odd_pending = false;
                    }
                    count += 1;

                    if count >> 1 >= payload.len() && !odd_pending {
                        // Every nibble placed; append the rest unchanged.
                        out.push_str(&replacement);
                        out.push_str(&cover_text[pos..]);
                        return Some(out);
                    }
                    out.push_str(&replacement);
                }
                None => out.push_str(&word),
            }
            word.clear();
        }

        out.push(c);
        scanned += 1;
    }

    // Trailing word with no boundary after it; never a typo carrier.
    if !word.is_empty() {
        out.push_str(&word);
    }

    if count >> 1 >= payload.len() {
        Some(out)
    } else {
        log::debug!("placed {count} of {} nibbles", payload.len() * 2 + usize::from(odd));
        None
    }
}

/// First generated candidate whose value matches the required nibble.
fn pick_typo(ctx: &Context, word: &str, nibble: u8) -> Option<String> {
    generate_typos(ctx, word).into_iter().find(|c| word_value(c) == nibble)
}

fn render(typo: &str, original: &str, style: OutputStyle) -> String {
    match style {
        OutputStyle::Plain => typo.to_string(),
        OutputStyle::Markup => format!("{{[s/{typo}/{original}/]}}"),
        OutputStyle::Decorated(f) => f(typo),
    }
}
