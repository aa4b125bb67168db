// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Scope-keyed history with the default-scope migration rule.
//!
//! Before any workspace is known the composer commits under
//! [`DEFAULT_SCOPE`].  The first time a real scope is activated while still
//! empty, the default-scoped entries are migrated into it — once, for the
//! first such scope only.  Later scopes start empty.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{HistoryStore, PromptHistory};

/// Scope used before the host has assigned a workspace id.
pub const DEFAULT_SCOPE: &str = "default";

/// Map of scope id → prompt history, with one active scope.
pub struct ScopedHistory {
    scopes: HashMap<String, PromptHistory>,
    active: String,
    cap: usize,
    /// Set once the default-scope entries have been handed to a real scope.
    migrated: bool,
}

impl ScopedHistory {
    pub fn new(cap: usize) -> Self {
        Self {
            scopes: HashMap::new(),
            active: DEFAULT_SCOPE.to_string(),
            cap,
            migrated: false,
        }
    }

    /// The currently active scope id.
    pub fn active_scope(&self) -> &str {
        &self.active
    }

    /// Entries of the active scope, oldest first.
    pub fn entries(&self) -> &[String] {
        self.scopes
            .get(&self.active)
            .map(PromptHistory::entries)
            .unwrap_or(&[])
    }

    /// Switch the active scope, loading it from `store` on first use.
    ///
    /// Migration: the very first non-default scope that is activated while
    /// empty inherits the default scope's entries.  This happens at most
    /// once per process.
    pub fn activate(&mut self, scope: &str, store: &mut dyn HistoryStore) {
        if self.active == scope && self.scopes.contains_key(scope) {
            return;
        }
        self.ensure_loaded(scope, store);

        if scope != DEFAULT_SCOPE && !self.migrated {
            let target_empty = self.scopes.get(scope).map(PromptHistory::is_empty).unwrap_or(true);
            if target_empty {
                self.ensure_loaded(DEFAULT_SCOPE, store);
                let defaults = self
                    .scopes
                    .get(DEFAULT_SCOPE)
                    .map(|h| h.entries().to_vec())
                    .unwrap_or_default();
                if !defaults.is_empty() {
                    debug!(scope, entries = defaults.len(), "migrating default-scoped history");
                    let migrated = PromptHistory::from_entries(defaults, self.cap);
                    if let Err(e) = store.save(scope, migrated.entries()) {
                        warn!(scope, error = %e, "failed to persist migrated history");
                    }
                    self.scopes.insert(scope.to_string(), migrated);
                    self.migrated = true;
                }
            }
        }

        self.active = scope.to_string();
    }

    /// Commit `input` to the active scope and persist it.
    /// Returns `true` when an entry was appended.
    pub fn commit(&mut self, input: &str, store: &mut dyn HistoryStore) -> bool {
        let active = self.active.clone();
        self.ensure_loaded(&active, store);
        let history = self
            .scopes
            .entry(active.clone())
            .or_insert_with(|| PromptHistory::new(self.cap));
        if !history.commit(input) {
            return false;
        }
        if let Err(e) = store.save(&active, history.entries()) {
            warn!(scope = %active, error = %e, "failed to persist history");
        }
        true
    }

    fn ensure_loaded(&mut self, scope: &str, store: &mut dyn HistoryStore) {
        if !self.scopes.contains_key(scope) {
            let loaded = PromptHistory::from_entries(store.load(scope), self.cap);
            self.scopes.insert(scope.to_string(), loaded);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
