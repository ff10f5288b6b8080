// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/typogram

//! Global progress tracking and cancellation.
//!
//! The density-search loop in the embedder is a bounded hot scan per
//! attempt, so cancellation is only checked between attempts. Interactive
//! callers set the flag from another thread via [`cancel`]; atomics make
//! that safe without any locking.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::error::TypoError;

static STEP: AtomicU32 = AtomicU32::new(0);
static TOTAL: AtomicU32 = AtomicU32::new(0);
static CANCELLED: AtomicBool = AtomicBool::new(false);

/// Reset progress to 0 and set the total step count.
/// Also resets the cancellation flag so a fresh operation starts clean.
/// A total of 0 means indeterminate (the retry count is not known upfront).
pub fn init(total: u32) {
    CANCELLED.store(false, Ordering::Relaxed);
    STEP.store(0, Ordering::Relaxed);
    TOTAL.store(total, Ordering::Relaxed);
}

/// Request cancellation of the current encode or decode operation.
///
/// The embedder checks this flag before each density-search retry and
/// returns `Err(TypoError::Cancelled)` when set.
pub fn cancel() {
    CANCELLED.store(true, Ordering::Relaxed);
}

/// Returns `true` if cancellation has been requested.
pub fn is_cancelled() -> bool {
    CANCELLED.load(Ordering::Relaxed)
}

/// Check for cancellation and return an error if requested.
pub fn check_cancelled() -> Result<(), TypoError> {
    if is_cancelled() {
        Err(TypoError::Cancelled)
    } else {
        Ok(())
    }
}

/// Advance progress by one step.
/// Step is capped at total so the caller never observes "12/10".
pub fn advance() {
    let total = TOTAL.load(Ordering::Relaxed);
    if total == 0 {
        STEP.fetch_add(1, Ordering::Relaxed);
    } else {
        let _ = STEP.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |s| {
            if s + 1 < total { Some(s + 1) } else { Some(s) }
        });
    }
}

/// Read the current (step, total) progress.
pub fn get() -> (u32, u32) {
    (STEP.load(Ordering::Relaxed), TOTAL.load(Ordering::Relaxed))
}

/// Mark progress as complete (step = total).
pub fn finish() {
    let t = TOTAL.load(Ordering::Relaxed);
    STEP.store(t, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_sets_flag() {
        init(0);
        assert!(check_cancelled().is_ok());
        cancel();
        assert!(matches!(check_cancelled(), Err(TypoError::Cancelled)));
        init(0);
        assert!(check_cancelled().is_ok());
    }

    #[test]
    fn advance_caps_at_total() {
        init(2);
        advance();
        advance();
        advance();
        let (step, total) = get();
        assert!(step <= total);
        finish();
        assert_eq!(get().0, 2);
    }
}
