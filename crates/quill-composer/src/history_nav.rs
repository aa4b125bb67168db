// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! History navigation: Up/Down cycling through committed entries while the
//! suggestion session is closed.
//!
//! Navigation never mutates the history itself.  The draft captured on
//! entry is restored exactly once, when the user steps past the newest
//! entry; any other edit abandons it.

/// What a navigation step decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NavOutcome {
    /// Replace the buffer with this text (cursor goes to end-of-text).
    Replace(String),
    /// The key was consumed but the buffer stays as it is (e.g. Up at the
    /// oldest entry).
    Consumed,
    /// Not in a state where this key means navigation.
    Ignored,
}

/// Up/Down navigation state: current index into the entries (oldest first)
/// and the preserved draft.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    index: Option<usize>,
    draft: String,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_navigating(&self) -> bool {
        self.index.is_some()
    }

    /// Currently displayed entry index, oldest = 0.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Step one entry older (Up).
    ///
    /// Enters navigation at the newest entry when the buffer is effectively
    /// empty; otherwise ignored.
    pub(crate) fn older(&mut self, entries: &[String], buffer_text: &str, buffer_empty: bool) -> NavOutcome {
        match self.index {
            None => {
                if !buffer_empty || entries.is_empty() {
                    return NavOutcome::Ignored;
                }
                let newest = entries.len() - 1;
                self.index = Some(newest);
                self.draft = buffer_text.to_string();
                NavOutcome::Replace(entries[newest].clone())
            }
            Some(0) => NavOutcome::Consumed,
            Some(i) => {
                self.index = Some(i - 1);
                NavOutcome::Replace(entries[i - 1].clone())
            }
        }
    }

    /// Step one entry newer (Down); past the newest entry the draft is
    /// restored and navigation ends.
    pub(crate) fn newer(&mut self, entries: &[String]) -> NavOutcome {
        match self.index {
            None => NavOutcome::Ignored,
            Some(i) if i + 1 >= entries.len() => {
                self.index = None;
                NavOutcome::Replace(std::mem::take(&mut self.draft))
            }
            Some(i) => {
                self.index = Some(i + 1);
                NavOutcome::Replace(entries[i + 1].clone())
            }
        }
    }

    /// The user typed something else: leave navigation, keep their edit,
    /// and drop the draft.
    pub(crate) fn abandon(&mut self) {
        self.index = None;
        self.draft.clear();
    }

    /// Full reset, used on scope changes and after a commit.
    pub fn reset(&mut self) {
        self.abandon();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
