// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/typogram

//! Keyboard-adjacency rule synthesis.
//!
//! Derives an entire rule set of plausible "fat-finger" typos from a
//! keyboard layout grid. For every alphabetic key and each alphabetic
//! horizontal neighbor, four families of rules are generated:
//!
//! - insertion of the neighbor before or after the key ("fat fingers"),
//! - substitution of the key by the neighbor (wrong key),
//! - transposition of the key with the following letter,
//! - a shift typo ("THe"-style slips at the start of a word).
//!
//! Insertion and substitution patterns require two characters on each side
//! that are neither the key nor the neighbor, which guards against chained
//! typos stacking up in one spot.

use super::{Rule, RuleSet};

/// Default layout: physical rows of a QWERTY keyboard, left to right,
/// top to bottom. Trailing spaces pad the shorter rows.
pub const QWERTY: &str = "1234567890-= \nQWERTYUIOP[]\\\nASDFGHJKL;'  \nZXCVBNM,./   ";

/// Synthesize the `keyboard` rule set from a layout grid.
///
/// Rows may have different lengths; non-alphabetic keys produce no rules.
/// Case-insensitive: keys are lowercased before rule derivation.
pub fn synthesize(layout: &str) -> RuleSet {
    let grid: Vec<Vec<char>> = layout
        .split('\n')
        .map(|row| row.chars().collect::<Vec<char>>())
        .filter(|row| !row.is_empty())
        .collect();

    let mut set = RuleSet::new();
    let mut add = |pattern: String, replacement: String, weight: u32| {
        let rule = Rule::new(&pattern, &replacement, weight)
            .expect("synthesized keyboard pattern is valid");
        set.push(rule);
    };

    for row in &grid {
        for (j, key) in row.iter().enumerate() {
            let c = key.to_ascii_lowercase();
            if !c.is_ascii_lowercase() {
                continue;
            }

            for k in [j.wrapping_sub(1), j + 1] {
                let Some(x) = row.get(k).map(|n| n.to_ascii_lowercase()) else {
                    continue;
                };
                if !x.is_ascii_lowercase() {
                    continue;
                }

                let p = format!("([^{c}{x}][^{c}{x}]){c}([^{c}{x}][^{c}{x}])");

                // Insertions (aka "fat fingers").
                add(p.clone(), format!("$1{c}{x}$2"), 4);
                add(p.clone(), format!("$1{x}{c}$2"), 1);

                // Substitutions (wrong key).
                add(p, format!("$1{x}$2"), 1);
            }

            // Transpositions.
            add(format!("([^{c}]){c}([a-z])(?!\\2)"), format!("$1$2{c}"), 4);

            // Shift typos (e.g. "THe").
            add(format!("^([A-Z]){c}"), format!("$1{}", c.to_ascii_uppercase()), 1);
        }
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_key_row_rule_counts() {
        // 'a' and 'b' each see one alphabetic neighbor: 3 neighbor rules
        // (weights 4+1+1) plus transposition (4) and shift (1) per key.
        let set = synthesize("ab");
        assert_eq!(set.rule_count(), 10);
        assert_eq!(set.len(), 22);
    }

    #[test]
    fn non_alphabetic_keys_are_skipped() {
        let set = synthesize("12-=");
        assert!(set.is_empty());
    }

    #[test]
    fn insertion_rule_matches_guarded_context() {
        let set = synthesize("ab");
        // First rule: ([^ab][^ab])a([^ab][^ab]) -> $1ab$2, from key 'a'.
        let rule = set.entries().next().unwrap();
        assert_eq!(rule.apply("storage").as_deref(), Some("storabge"));
        // Too close to the word edge: no two guard characters on the left.
        assert_eq!(rule.apply("age"), None);
    }

    #[test]
    fn shift_rule_uppercases_second_letter() {
        let set = synthesize("h");
        let shift = set
            .entries()
            .find(|r| r.pattern().starts_with('^'))
            .unwrap();
        assert_eq!(shift.apply("The").as_deref(), Some("THe"));
        assert_eq!(shift.apply("the"), None);
    }

    #[test]
    fn qwerty_layout_produces_rules_for_all_letters() {
        let set = synthesize(QWERTY);
        // 26 letters, each with transposition + shift; most with neighbors.
        assert!(set.rule_count() > 26 * 2);
        // 'q' neighbor 'w': insertion pattern present.
        assert!(set
            .entries()
            .any(|r| r.pattern().contains("([^qw][^qw])q([^qw][^qw])")));
    }
}
