// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/typogram

//! Typo generation and the word value function.
//!
//! [`generate_typos`] applies the context's rule sets, in order, to a single
//! word and returns the deduplicated mutations in generation order. That
//! order is a priority order: the embedder takes the first candidate whose
//! [`word_value`] equals the nibble it needs, so rule order and weighting
//! directly control which typo is preferred.
//!
//! [`word_value`] maps any word to the low nibble of the first byte of its
//! SHA-256 digest. It is fixed and password-independent: the same word
//! always carries the same 4 bits, which is what lets the extractor read
//! the channel back without any shared state.

use std::collections::HashSet;

use fancy_regex::Regex;
use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};

use crate::context::Context;
use crate::dict::trigrams;
use crate::rules::KEYBOARD_RULESET;

/// Shape of an encodable word: optional leading apostrophe, letters, at
/// most one hyphen, optional inner/trailing apostrophe. Rejects pure
/// punctuation, numbers, and multi-hyphen compounds.
static WORD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new("^'?[A-Za-z]+-?[A-Za-z]+'?[A-Za-z]'?$").expect("word pattern is valid")
});

/// Characters that make up a word in cover text: letters, apostrophe, hyphen.
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '\'' || c == '-'
}

/// True if the word has a shape the typo generator will touch.
pub(crate) fn is_encodable_word(word: &str) -> bool {
    WORD_PATTERN.is_match(word).unwrap_or(false)
}

/// The value of a word: the low half of the first octet of its SHA-256
/// digest. E.g. `colour` is 6 (digest `d6838c35...`).
pub fn word_value(word: &str) -> u8 {
    Sha256::digest(word.as_bytes())[0] & 0x0F
}

/// Generate the distinct mutations of a word, in priority order.
///
/// For each rule set in the context's order, every rule (weighted entries
/// included) is applied to the word. A result is skipped if it equals the
/// input, was already produced (first occurrence wins), or — for the
/// `keyboard` set only — fails the plausibility check. Words that do not
/// match the encodable shape produce no mutations at all.
pub fn generate_typos(ctx: &Context, word: &str) -> Vec<String> {
    if !is_encodable_word(word) {
        return Vec::new();
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut collection = Vec::new();

    for name in ctx.order() {
        let Some(set) = ctx.ruleset(name) else {
            continue; // ruleset named in the order but never loaded
        };
        let filtered = name == KEYBOARD_RULESET;

        for rule in set.entries() {
            let Some(mutation) = rule.apply(word) else {
                continue;
            };
            if mutation == word || seen.contains(&mutation) {
                continue;
            }
            if filtered && !ctx.dictionary().is_plausible(&mutation) {
                continue;
            }
            seen.insert(mutation.clone());
            collection.push(mutation);
        }
    }

    collection
}

/// A generated typo with its channel value and plausibility score.
#[derive(Debug, Clone, PartialEq)]
pub struct TypoCandidate {
    pub typo: String,
    /// The 4-bit value the typo would carry.
    pub value: u8,
    /// Mean dictionary occurrence count over the typo's trigrams.
    pub score: f64,
}

/// Inspect the channel for a single word: every generated typo with its
/// nibble value and plausibility score, best-scoring first.
pub fn query(ctx: &Context, word: &str) -> Vec<TypoCandidate> {
    let mut data: Vec<TypoCandidate> = generate_typos(ctx, word)
        .into_iter()
        .map(|typo| {
            let value = word_value(&typo);
            let grams = trigrams(&typo.to_lowercase());
            let hits: u64 = grams.iter().map(|g| u64::from(ctx.dictionary().count(g))).sum();
            let score = hits as f64 / grams.len() as f64;
            TypoCandidate { typo, value, score }
        })
        .collect();

    data.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Context {
        Context::builder().build().unwrap()
    }

    #[test]
    fn word_value_of_colour_is_six() {
        assert_eq!(word_value("colour"), 6);
    }

    #[test]
    fn word_value_is_a_nibble() {
        for word in ["a", "hello", "Steganography", "don't"] {
            assert!(word_value(word) <= 0x0F);
        }
    }

    #[test]
    fn word_shape_filter() {
        assert!(is_encodable_word("cat"));
        assert!(is_encodable_word("Steganography"));
        assert!(is_encodable_word("don't"));
        assert!(is_encodable_word("well-known"));
        assert!(!is_encodable_word("it"), "two-letter words are too short");
        assert!(!is_encodable_word("123"));
        assert!(!is_encodable_word("..."));
        assert!(!is_encodable_word("a-b-c"));
        assert!(!is_encodable_word(""));
    }

    #[test]
    fn non_word_yields_no_typos() {
        let ctx = ctx();
        assert!(generate_typos(&ctx, "42").is_empty());
        assert!(generate_typos(&ctx, "!").is_empty());
    }

    #[test]
    fn mutations_are_distinct_and_differ_from_input() {
        let ctx = ctx();
        let typos = generate_typos(&ctx, "their");
        assert!(!typos.is_empty(), "'their' should produce at least 'there'");
        let mut unique: Vec<&String> = typos.iter().collect();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), typos.len(), "duplicates in {typos:?}");
        assert!(typos.iter().all(|t| t != "their"));
    }

    #[test]
    fn earlier_ruleset_wins_for_a_given_mutation() {
        // Both sets can produce "teh"; it must be attributed to the first.
        let ctx = Context::builder()
            .ruleset_source("first", "the\tteh\n")
            .ruleset_source("second", "^the$\tteh\nthe\tthe-alt\n")
            .rulesets("first second")
            .build()
            .unwrap();
        let typos = generate_typos(&ctx, "the");
        assert_eq!(typos[0], "teh");
        assert_eq!(typos.iter().filter(|t| *t == "teh").count(), 1);
    }

    #[test]
    fn keyboard_mutations_pass_plausibility() {
        let ctx = ctx();
        for typo in generate_typos(&ctx, "information") {
            // File rules may produce anything; keyboard results must be
            // plausible. Rather than attribute each typo, check the weaker
            // invariant: anything implausible must come from a file rule.
            if !ctx.dictionary().is_plausible(&typo) {
                let from_files = ["misspelling", "grammatical"].iter().any(|name| {
                    ctx.ruleset(name)
                        .map(|set| set.entries().any(|r| r.apply("information").as_deref() == Some(typo.as_str())))
                        .unwrap_or(false)
                });
                assert!(from_files, "implausible keyboard typo leaked: {typo}");
            }
        }
    }

    #[test]
    fn query_reports_values_and_scores_sorted() {
        let ctx = ctx();
        let report = query(&ctx, "there");
        assert!(!report.is_empty());
        for pair in report.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for candidate in &report {
            assert_eq!(candidate.value, word_value(&candidate.typo));
        }
    }
}
