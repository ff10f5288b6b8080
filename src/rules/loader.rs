// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/typogram

//! Rule-set file parsing and lookup.
//!
//! Rule files are newline-delimited tab-separated records:
//!
//! ```text
//! pattern<TAB>replacement[<TAB>weight]
//! ```
//!
//! Lines beginning with `#` (and empty lines) are ignored. `pattern` is a
//! regular expression; capture groups are referenced in `replacement` as
//! `$1`, `$2`, ... A missing or non-numeric weight defaults to 1.
//!
//! [`RulesetSource`] abstracts where named rule sets come from, so the
//! context builder can resolve `misspelling` to an in-memory string, a
//! `<dir>/misspelling.rules` file, or a built-in default without the core
//! ever doing I/O itself.

use std::fs;
use std::path::PathBuf;

use crate::error::TypoError;
use super::{Rule, RuleSet};

/// Parse tabular rule records into a rule set.
///
/// `name` is used for error reporting only.
pub fn parse_tabular(name: &str, data: &str) -> Result<RuleSet, TypoError> {
    let mut set = RuleSet::new();

    for (idx, line) in data.split('\n').enumerate() {
        // Keep only lines whose first character is not '#'; empty lines
        // have no first character and are dropped too.
        if !line.chars().next().is_some_and(|c| c != '#') {
            continue;
        }

        let mut fields = line.split('\t');
        let pattern = fields.next().unwrap_or_default();
        let Some(replacement) = fields.next() else {
            return Err(TypoError::InvalidRule {
                set: name.to_string(),
                line: idx + 1,
                reason: "missing replacement field".to_string(),
            });
        };
        let weight = fields
            .next()
            .and_then(|w| w.trim().parse::<u32>().ok())
            .unwrap_or(1);

        let rule = Rule::new(pattern, replacement, weight).map_err(|e| TypoError::InvalidRule {
            set: name.to_string(),
            line: idx + 1,
            reason: e.to_string(),
        })?;
        set.push(rule);
    }

    Ok(set)
}

/// Resolves a rule-set name to its file contents, or `None` if the set is
/// unavailable. Unavailable sets are skipped with a diagnostic rather than
/// failing the whole context build.
pub trait RulesetSource {
    fn read(&self, name: &str) -> Option<String>;
}

/// Looks up `<dir>/<name>.rules` on disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirSource { dir: dir.into() }
    }
}

impl RulesetSource for DirSource {
    fn read(&self, name: &str) -> Option<String> {
        fs::read_to_string(self.dir.join(format!("{name}.rules"))).ok()
    }
}
