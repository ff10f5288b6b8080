// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/typogram

//! Trigram frequency dictionary for the plausibility filter.
//!
//! Keyboard-synthesized typos can look obviously mechanical ("informatjon").
//! To weed those out, every candidate is broken into 3-character sequences
//! with `^`/`$` boundary markers and checked against a frequency table built
//! from a reference word list. A candidate is plausible only if *every one*
//! of its trigrams occurs in the table — a single unseen trigram rejects it.
//!
//! Only mutations from the `keyboard` rule set are filtered this way;
//! file-defined rule sets are trusted as already plausible.

use std::collections::HashMap;

/// Return the 3-character sequences for a word, boundary markers included.
///
/// For `"hello"`: `^he`, `lo$`, `hel`, `ell`, `llo`. Words shorter than two
/// characters produce degenerate boundary trigrams (`^a` / `a$`), which is
/// consistent between dictionary construction and lookup.
pub fn trigrams(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();

    let head: String = chars.iter().take(2).collect();
    let tail: String = chars[n.saturating_sub(2)..].iter().collect();

    let mut seq = Vec::with_capacity(n.max(2));
    seq.push(format!("^{head}"));
    seq.push(format!("{tail}$"));

    for window in chars.windows(3) {
        seq.push(window.iter().collect());
    }

    seq
}

/// Occurrence counts of trigrams across a reference word list.
/// Built once per context, read-only thereafter.
#[derive(Debug, Default)]
pub struct Dictionary {
    counts: HashMap<String, u32>,
}

impl Dictionary {
    /// Build the dictionary from a newline-delimited word list.
    pub fn from_words(list: &str) -> Self {
        let mut counts = HashMap::new();
        for word in list.lines().filter(|w| !w.is_empty()) {
            for gram in trigrams(word) {
                *counts.entry(gram).or_insert(0) += 1;
            }
        }
        Dictionary { counts }
    }

    /// Occurrence count of a single trigram (0 if never seen).
    pub fn count(&self, gram: &str) -> u32 {
        self.counts.get(gram).copied().unwrap_or(0)
    }

    /// A word is plausible iff every trigram of its lowercased form has a
    /// strictly positive count. Exactly all of them — "most" is not enough.
    pub fn is_plausible(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        trigrams(&lower).iter().all(|g| self.count(g) > 0)
    }

    /// Number of distinct trigrams in the table.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if the table is empty (no word list was supplied).
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
