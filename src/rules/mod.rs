// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/typogram

//! Substitution rule model.
//!
//! A [`Rule`] is a regular expression plus a replacement template with an
//! integer weight. A [`RuleSet`] stores each distinct rule once and keeps a
//! separate *evaluation order* with one slot per weight unit, so a weight-4
//! rule is tried four times as often as a weight-1 rule without duplicating
//! the compiled regex. Shuffling (non-deterministic encode mode) permutes
//! the evaluation order only.
//!
//! Patterns use `fancy-regex` because the keyboard transposition rule needs
//! a backreference inside a negative lookahead (`(?!\2)`). Replacement
//! templates reference capture groups as `$1`, `$2`, ... (`${1}` and `$$`
//! are also accepted).

pub mod keyboard;
pub mod loader;

use fancy_regex::{Captures, Regex};

/// Name of the synthesized keyboard-adjacency rule set.
pub const KEYBOARD_RULESET: &str = "keyboard";

/// A single substitution rule: pattern, replacement template, weight.
/// Immutable once created.
#[derive(Debug)]
pub struct Rule {
    pattern: Regex,
    replacement: String,
    weight: u32,
}

impl Rule {
    /// Compile a rule. A weight of 0 is treated as 1.
    pub fn new(pattern: &str, replacement: &str, weight: u32) -> Result<Self, fancy_regex::Error> {
        Ok(Rule {
            pattern: Regex::new(pattern)?,
            replacement: replacement.to_string(),
            weight: weight.max(1),
        })
    }

    /// The rule's weight (always >= 1).
    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// The source pattern.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Apply the rule to a word, replacing the first match.
    ///
    /// Returns `None` when the pattern does not match. The result may still
    /// equal the input (e.g. an identity replacement); the generator is
    /// responsible for discarding those.
    pub fn apply(&self, word: &str) -> Option<String> {
        // A backtracking blowup on a pathological user pattern is treated as
        // a non-match rather than an error; the generator moves on.
        let caps = match self.pattern.captures(word) {
            Ok(Some(caps)) => caps,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("rule '{}' failed on '{word}': {e}", self.pattern.as_str());
                return None;
            }
        };
        let whole = caps.get(0)?;

        let mut out = String::with_capacity(word.len() + 4);
        out.push_str(&word[..whole.start()]);
        expand_template(&caps, &self.replacement, &mut out);
        out.push_str(&word[whole.end()..]);
        Some(out)
    }
}

/// Expand `$n` / `${n}` group references in a replacement template.
///
/// `$$` emits a literal `$`. A reference to a group the pattern does not
/// define is kept verbatim; a defined-but-unmatched group expands to the
/// empty string.
fn expand_template(caps: &Captures<'_>, template: &str, out: &mut String) {
    let chars: Vec<char> = template.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '$' {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        if i + 1 < chars.len() && chars[i + 1] == '$' {
            out.push('$');
            i += 2;
            continue;
        }

        let (digits_start, braced) = if i + 1 < chars.len() && chars[i + 1] == '{' {
            (i + 2, true)
        } else {
            (i + 1, false)
        };

        let mut j = digits_start;
        while j < chars.len() && chars[j].is_ascii_digit() {
            j += 1;
        }
        let well_formed = j > digits_start && (!braced || (j < chars.len() && chars[j] == '}'));

        if well_formed {
            let num: usize = chars[digits_start..j].iter().collect::<String>().parse().unwrap_or(usize::MAX);
            if num < caps.len() {
                if let Some(group) = caps.get(num) {
                    out.push_str(group.as_str());
                }
                i = if braced { j + 1 } else { j };
                continue;
            }
        }

        out.push('$');
        i += 1;
    }
}

/// A named, ordered collection of rules with weighted evaluation order.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    /// Indices into `rules`, one entry per weight unit, in evaluation order.
    order: Vec<usize>,
}

impl RuleSet {
    pub fn new() -> Self {
        RuleSet::default()
    }

    /// Append a rule; its weight determines how many evaluation slots it gets.
    pub fn push(&mut self, rule: Rule) {
        let idx = self.rules.len();
        let weight = rule.weight as usize;
        self.rules.push(rule);
        self.order.extend(std::iter::repeat(idx).take(weight));
    }

    /// Rules in evaluation order; a weight-`w` rule is yielded `w` times.
    pub fn entries(&self) -> impl Iterator<Item = &Rule> {
        self.order.iter().map(|&i| &self.rules[i])
    }

    /// Number of distinct rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Number of evaluation slots (sum of weights).
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Fisher-Yates shuffle of the evaluation order.
    ///
    /// Uses `u32` for the random range so the permutation is identical on
    /// 32-bit and 64-bit platforms given the same seeded generator.
    pub fn shuffle<R: rand::Rng>(&mut self, rng: &mut R) {
        for i in (1..self.order.len()).rev() {
            let j = rng.gen_range(0..=(i as u32)) as usize;
            self.order.swap(i, j);
        }
    }
}
