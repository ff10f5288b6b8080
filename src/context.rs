// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/typogram

//! The per-operation context: rule registry, rule-set order, dictionary.
//!
//! There is no process-global state. A [`Context`] is built once via
//! [`ContextBuilder`], is immutable afterwards (apart from the explicit
//! [`Context::shuffle`] pass for non-deterministic encoding), and is passed
//! by reference into the typo generator and the embedder. Concurrent
//! callers simply build their own contexts.
//!
//! The builder ships usable defaults embedded in the binary: the reference
//! word list, a QWERTY layout, and the `misspelling`/`grammatical` rule
//! sets, so `ContextBuilder::new().build()` works without touching disk.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::dict::Dictionary;
use crate::error::TypoError;
use crate::rules::keyboard;
use crate::rules::loader::{parse_tabular, DirSource, RulesetSource};
use crate::rules::{RuleSet, KEYBOARD_RULESET};

/// Bundled reference word list (builds the plausibility dictionary).
const DEFAULT_WORDS: &str = include_str!("../assets/words.txt");
/// Bundled `misspelling` rule set.
const DEFAULT_MISSPELLING: &str = include_str!("../assets/misspelling.rules");
/// Bundled `grammatical` rule set.
const DEFAULT_GRAMMATICAL: &str = include_str!("../assets/grammatical.rules");

/// Name of the rule set installed by a full override file.
const CUSTOM_RULESET: &str = "custom";

/// Immutable rule registry + rule-set order + plausibility dictionary.
#[derive(Debug)]
pub struct Context {
    registry: HashMap<String, RuleSet>,
    order: Vec<String>,
    dictionary: Dictionary,
}

impl Context {
    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    /// Look up a rule set by name. Names in the order that were never
    /// loaded resolve to `None` and are skipped by the generator.
    pub fn ruleset(&self, name: &str) -> Option<&RuleSet> {
        self.registry.get(name)
    }

    /// Rule-set names in evaluation order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Randomly permute the evaluation order of every rule set.
    ///
    /// Call this before a non-deterministic encode to avoid a fixed
    /// first-match bias; deterministic mode must skip it.
    pub fn shuffle<R: rand::Rng>(&mut self, rng: &mut R) {
        for name in &self.order {
            if let Some(set) = self.registry.get_mut(name) {
                set.shuffle(rng);
            }
        }
    }
}

/// Builder for [`Context`]. All inputs are plain strings; file lookup only
/// happens when a [`search_dir`](ContextBuilder::search_dir) is configured.
#[derive(Debug, Default)]
pub struct ContextBuilder {
    dictionary: Option<String>,
    keyboard: Option<String>,
    rulesets: Option<String>,
    ruleset_file: Option<String>,
    search_dir: Option<PathBuf>,
    sources: HashMap<String, String>,
}

impl ContextBuilder {
    pub fn new() -> Self {
        ContextBuilder::default()
    }

    /// Replace the bundled word list with a custom newline-delimited one.
    pub fn dictionary(mut self, words: &str) -> Self {
        self.dictionary = Some(words.to_string());
        self
    }

    /// Replace the QWERTY layout with a custom keyboard grid.
    pub fn keyboard(mut self, layout: &str) -> Self {
        self.keyboard = Some(layout.to_string());
        self
    }

    /// Explicit comma/space-separated rule-set order, e.g. `"misspelling,
    /// grammatical"`. The keyboard set is still appended last unless named.
    pub fn rulesets(mut self, spec: &str) -> Self {
        self.rulesets = Some(spec.to_string());
        self
    }

    /// Full override: the contents of a single rule file that replaces the
    /// entire rule-set order with one set named `custom`.
    pub fn ruleset_file(mut self, contents: &str) -> Self {
        self.ruleset_file = Some(contents.to_string());
        self
    }

    /// Directory searched for `<name>.rules` files when resolving named
    /// rule sets that have no in-memory source.
    pub fn search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dir = Some(dir.into());
        self
    }

    /// Register the contents of a named rule set directly. Takes precedence
    /// over the search directory and the bundled defaults.
    pub fn ruleset_source(mut self, name: &str, contents: &str) -> Self {
        self.sources.insert(name.to_string(), contents.to_string());
        self
    }

    /// Resolve a name: explicit sources, then the search directory, then
    /// the bundled defaults.
    fn read_source(&self, name: &str) -> Option<String> {
        if let Some(text) = self.sources.get(name) {
            return Some(text.clone());
        }
        if let Some(dir) = &self.search_dir {
            if let Some(text) = DirSource::new(dir).read(name) {
                return Some(text);
            }
        }
        match name {
            "misspelling" => Some(DEFAULT_MISSPELLING.to_string()),
            "grammatical" => Some(DEFAULT_GRAMMATICAL.to_string()),
            _ => None,
        }
    }

    pub fn build(self) -> Result<Context, TypoError> {
        let dictionary =
            Dictionary::from_words(self.dictionary.as_deref().unwrap_or(DEFAULT_WORDS));

        let mut registry = HashMap::new();
        registry.insert(
            KEYBOARD_RULESET.to_string(),
            keyboard::synthesize(self.keyboard.as_deref().unwrap_or(keyboard::QWERTY)),
        );

        let order = if let Some(contents) = &self.ruleset_file {
            // A full override drops every other set, keyboard included.
            registry.insert(CUSTOM_RULESET.to_string(), parse_tabular(CUSTOM_RULESET, contents)?);
            vec![CUSTOM_RULESET.to_string()]
        } else {
            let mut order: Vec<String> = match &self.rulesets {
                Some(spec) => spec
                    .split([' ', ','])
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
                None => ["misspelling", "grammatical"]
                    .iter()
                    .filter(|name| self.read_source(name).is_some())
                    .map(|name| name.to_string())
                    .collect(),
            };

            for name in &order {
                if registry.contains_key(name) {
                    continue; // already loaded (memoized by name)
                }
                match self.read_source(name) {
                    Some(contents) => {
                        registry.insert(name.clone(), parse_tabular(name, &contents)?);
                    }
                    None => log::warn!("ruleset '{name}' not found, skipping"),
                }
            }

            if !order.iter().any(|n| n == KEYBOARD_RULESET) {
                order.push(KEYBOARD_RULESET.to_string());
            }
            order
        };

        Ok(Context { registry, order, dictionary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_build_has_bundled_sets() {
        let ctx = Context::builder().build().unwrap();
        assert_eq!(ctx.order(), &["misspelling", "grammatical", "keyboard"]);
        assert!(ctx.ruleset("misspelling").is_some());
        assert!(ctx.ruleset("grammatical").is_some());
        assert!(!ctx.ruleset("keyboard").unwrap().is_empty());
        assert!(!ctx.dictionary().is_empty());
    }

    #[test]
    fn explicit_order_appends_keyboard_last() {
        let ctx = Context::builder().rulesets("grammatical, misspelling").build().unwrap();
        assert_eq!(ctx.order(), &["grammatical", "misspelling", "keyboard"]);
    }

    #[test]
    fn keyboard_named_explicitly_is_not_duplicated() {
        let ctx = Context::builder().rulesets("keyboard misspelling").build().unwrap();
        assert_eq!(ctx.order(), &["keyboard", "misspelling"]);
    }

    #[test]
    fn override_file_replaces_order_entirely() {
        let ctx = Context::builder().ruleset_file("teh\tthe\n").build().unwrap();
        assert_eq!(ctx.order(), &["custom"]);
        assert_eq!(ctx.ruleset("custom").unwrap().rule_count(), 1);
    }

    #[test]
    fn unknown_ruleset_is_skipped_not_fatal() {
        let ctx = Context::builder().rulesets("no-such-set misspelling").build().unwrap();
        assert!(ctx.ruleset("no-such-set").is_none());
        assert!(ctx.ruleset("misspelling").is_some());
        // The order still names the missing set; the generator skips it.
        assert_eq!(ctx.order()[0], "no-such-set");
    }

    #[test]
    fn duplicate_name_in_list_loads_once() {
        let once = Context::builder().rulesets("misspelling").build().unwrap();
        let twice = Context::builder().rulesets("misspelling misspelling").build().unwrap();
        assert_eq!(
            once.ruleset("misspelling").unwrap().rule_count(),
            twice.ruleset("misspelling").unwrap().rule_count(),
            "loading the same named set twice must not concatenate"
        );
    }

    #[test]
    fn in_memory_source_overrides_bundled_default() {
        let ctx = Context::builder()
            .ruleset_source("misspelling", "a\tb\n")
            .rulesets("misspelling")
            .build()
            .unwrap();
        assert_eq!(ctx.ruleset("misspelling").unwrap().rule_count(), 1);
    }
}
