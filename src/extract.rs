// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/typogram

//! Recovering the typo channel from modified text.
//!
//! Two front ends feed the same decoder: a character-level diff against the
//! original cover text, and a parser for the inline markup
//! `{[s/<typo>/<correction>/]}`. Either way the result is the ordered typo
//! list; [`decode_typos`] turns it back into payload bytes (two typos per
//! byte, low nibble first) and hands them to the crypto layer.
//!
//! An odd typo count means the embedder appended its meaningless extra
//! typo; the trailing entry is dropped with a warning. Decoding is lossy by
//! construction there — the extra nibble never carried data.

use crate::crypto;
use crate::error::TypoError;
use crate::format::SecretFormat;
use crate::progress;
use crate::typo::{is_word_char, word_value};

/// Options for the decode entry points.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Must match the encoder: derive the key from the empty-string digest
    /// and expect no extra salt. Covers deterministic encodes too.
    pub nosalt: bool,
    /// Must match the encoder: AES-256-GCM with tag verification.
    pub authenticated: bool,
    pub format: SecretFormat,
}

/// Diff the modified text against the original and collect the changed
/// words, in text order.
///
/// The scan walks both texts in lockstep; at the first differing character
/// the surrounding word in the modified text is captured whole, and the
/// offset between the two texts is adjusted by the length difference of the
/// two words. This handles substitutions, insertions (`storage` →
/// `storabge`) and deletions without any alignment search, because typos
/// never cross word boundaries.
pub fn extract_typos(original: &str, modified: &str) -> Vec<String> {
    let orig: Vec<char> = original.chars().collect();
    let modi: Vec<char> = modified.chars().collect();

    let mut typos = Vec::new();
    let mut offset: isize = 0;
    let mut i = 0usize;

    while i < orig.len() {
        let j = i as isize + offset;
        if j < 0 || j as usize >= modi.len() {
            break;
        }
        let j = j as usize;

        if orig[i] == modi[j] {
            i += 1;
            continue;
        }

        // Expand the mismatch to the word around it, in both texts. The
        // characters before the mismatch match, so both words start at the
        // same distance back.
        let mut start = j;
        while start > 0 && is_word_char(modi[start - 1]) {
            start -= 1;
        }
        let mut end = j;
        while end < modi.len() && is_word_char(modi[end]) {
            end += 1;
        }

        let mut orig_end = i;
        while orig_end < orig.len() && is_word_char(orig[orig_end]) {
            orig_end += 1;
        }
        let orig_start = i - (j - start);

        typos.push(modi[start..end].iter().collect());

        offset += (end - start) as isize - (orig_end - orig_start) as isize;
        i = orig_end;
    }

    typos
}

/// Parse marked-up text: collect the typos and substitute each correction
/// back, restoring the original cover text.
///
/// A malformed token (an opener without its delimiters) stops the parse;
/// everything from the last well-formed token onward is passed through
/// verbatim.
pub fn extract_typos_from_markup(text: &str) -> (Vec<String>, String) {
    let mut typos = Vec::new();
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("{[s/") {
        let after = &rest[start + 4..];
        let Some(mid) = after.find('/') else { break };
        let Some(close) = after[mid + 1..].find("/]}") else { break };

        out.push_str(&rest[..start]);
        out.push_str(&after[mid + 1..mid + 1 + close]);
        typos.push(after[..mid].to_string());

        rest = &after[mid + 1 + close + 3..];
    }
    out.push_str(rest);

    (typos, out)
}

/// Pack typo values into payload bytes, low nibble first.
pub(crate) fn pack_nibbles(values: &[u8]) -> Vec<u8> {
    let mut payload = vec![0u8; values.len() / 2];
    for (i, v) in values.iter().enumerate() {
        if i % 2 == 0 {
            payload[i / 2] = v & 0x0F;
        } else {
            payload[i / 2] |= (v & 0x0F) << 4;
        }
    }
    payload
}

/// Decode a typo list back into the secret.
///
/// `cover_text` must be the original, typo-free text; it feeds the salt
/// derivation. Fewer than two typos cannot carry a payload.
pub fn decode_typos(
    typos: &[String],
    password: &str,
    cover_text: &str,
    options: &DecodeOptions,
) -> Result<String, TypoError> {
    // Fresh operation: clear any cancellation left over from a previous one.
    progress::init(0);

    let mut values: Vec<u8> = typos.iter().map(|t| word_value(t)).collect();
    if values.len() % 2 == 1 {
        log::warn!("odd typo count {}, dropping the trailing typo", values.len());
        values.pop();
    }
    if values.is_empty() {
        return Err(TypoError::PayloadTooShort);
    }
    // The expensive part is the key derivation below.
    progress::check_cancelled()?;

    let payload = pack_nibbles(&values);
    crypto::decrypt_payload(
        &payload,
        options.format,
        password,
        cover_text,
        options.nosalt,
        options.authenticated,
    )
}

/// Decode by diffing the modified text against the original cover text.
pub fn decode_with_original(
    original: &str,
    modified: &str,
    password: &str,
    options: &DecodeOptions,
) -> Result<String, TypoError> {
    let typos = extract_typos(original, modified);
    log::debug!("extracted {} typos from diff", typos.len());
    decode_typos(&typos, password, original, options)
}

/// Decode self-contained marked-up text; no original needed.
pub fn decode_markup(
    marked: &str,
    password: &str,
    options: &DecodeOptions,
) -> Result<String, TypoError> {
    let (typos, original) = extract_typos_from_markup(marked);
    log::debug!("extracted {} typos from markup", typos.len());
    decode_typos(&typos, password, &original, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_finds_substituted_word() {
        let typos = extract_typos("I saw the cat.", "I saw teh cat.");
        assert_eq!(typos, ["teh"]);
    }

    #[test]
    fn diff_handles_insertions_and_deletions() {
        // Inserted character shifts the rest of the text right.
        let typos = extract_typos("the storage area", "the storabge area");
        assert_eq!(typos, ["storabge"]);
        // Deleted character shifts it left.
        let typos = extract_typos("a letter arrived today", "a leter arrived today");
        assert_eq!(typos, ["leter"]);
    }

    #[test]
    fn diff_collects_multiple_typos_in_order() {
        let typos = extract_typos(
            "Nobody wanted to mention the letter that arrived.",
            "Nobody watned to mention teh leter that arrived.",
        );
        assert_eq!(typos, ["watned", "teh", "leter"]);
    }

    #[test]
    fn diff_of_identical_texts_is_empty() {
        assert!(extract_typos("same text", "same text").is_empty());
        assert!(extract_typos("", "").is_empty());
    }

    #[test]
    fn markup_token_is_parsed_and_reverted() {
        let (typos, original) = extract_typos_from_markup("I saw {[s/teh/the/]} cat.");
        assert_eq!(typos, ["teh"]);
        assert_eq!(original, "I saw the cat.");
    }

    #[test]
    fn markup_parses_adjacent_tokens() {
        let (typos, original) =
            extract_typos_from_markup("{[s/teh/the/]}{[s/taeble/table/]} stands");
        assert_eq!(typos, ["teh", "taeble"]);
        assert_eq!(original, "thetable stands");
    }

    #[test]
    fn malformed_markup_stops_at_last_good_token() {
        let (typos, original) = extract_typos_from_markup("{[s/teh/the/]} and {[s/broken");
        assert_eq!(typos, ["teh"]);
        assert_eq!(original, "the and {[s/broken");
    }

    #[test]
    fn plain_text_has_no_markup_typos() {
        let (typos, original) = extract_typos_from_markup("nothing marked here");
        assert!(typos.is_empty());
        assert_eq!(original, "nothing marked here");
    }

    #[test]
    fn nibbles_pack_low_first() {
        assert_eq!(pack_nibbles(&[0x6, 0xA]), vec![0xA6]);
        assert_eq!(pack_nibbles(&[0x1, 0x2, 0x3, 0x4]), vec![0x21, 0x43]);
    }

    #[test]
    fn no_typos_is_too_short() {
        assert!(matches!(
            decode_typos(&[], "pw", "cover", &DecodeOptions::default()),
            Err(TypoError::PayloadTooShort)
        ));
    }

    #[test]
    fn odd_typo_count_drops_trailing_entry() {
        // Three typos cannot form whole bytes; the trailing one is treated
        // as the encoder's meaningless extra typo and discarded, so the
        // result equals decoding the two-typo prefix. Hex format keeps the
        // unauthenticated decrypt from tripping over UTF-8.
        let typos: Vec<String> =
            ["teh", "hte", "taeble"].iter().map(|s| s.to_string()).collect();
        let opts = DecodeOptions {
            nosalt: true,
            format: crate::format::SecretFormat::Hex,
            ..Default::default()
        };
        let odd = decode_typos(&typos, "pw", "cover", &opts).unwrap();
        let even = decode_typos(&typos[..2], "pw", "cover", &opts).unwrap();
        assert_eq!(odd, even, "trailing typo must not influence the payload");
    }

    #[test]
    fn stale_cancellation_does_not_affect_fresh_decode() {
        crate::progress::cancel();
        let result = decode_markup(
            "I saw {[s/teh/the/]} cat and {[s/hte/the/]} dog.",
            "pw",
            &DecodeOptions { nosalt: true, ..Default::default() },
        );
        assert!(
            !matches!(result, Err(TypoError::Cancelled)),
            "a cancel from a previous operation must not abort a new decode"
        );
    }
}
