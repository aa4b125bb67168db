// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Inline ghost completion: a non-popup continuation of the current buffer
//! taken from history.
//!
//! The candidate is the most recently committed entry whose lower-cased
//! form starts with the whole buffer's lower-cased form and is strictly
//! longer.  Acceptance replaces the entire buffer with that entry — never
//! just the visible suffix — so the buffer cannot drift from the model.

/// Find the ghost suggestion for `buffer_text`, newest entries first.
pub(crate) fn compute(entries: &[String], buffer_text: &str) -> Option<String> {
    if buffer_text.is_empty() {
        return None;
    }
    let prefix = buffer_text.to_lowercase();
    entries
        .iter()
        .rev()
        .find(|e| {
            let lowered = e.to_lowercase();
            lowered.len() > prefix.len() && lowered.starts_with(&prefix)
        })
        .cloned()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
