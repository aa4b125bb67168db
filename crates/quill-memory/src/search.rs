// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The memory-search interface the composer talks to.
//!
//! The real backend is external (vector store, SQLite, a service); the
//! composer only needs an idempotent query call.  [`InMemoryStore`] is the
//! reference implementation used by tests and the CLI.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::MemoryNote;

/// Error raised by a memory backend.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("memory backend error: {0}")]
    Backend(String),
}

/// Scope-keyed note lookup.  Implementations must be safe to call
/// repeatedly with the same arguments.
#[async_trait]
pub trait MemorySearch: Send + Sync {
    /// Return up to `limit` notes in `scope` matching `query`, best first.
    ///
    /// An empty query returns the most recently updated notes.
    async fn search(
        &self,
        scope: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MemoryNote>, SearchError>;
}

// ── In-memory store ───────────────────────────────────────────────────────────

/// Volatile note store with case-insensitive substring matching.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    notes: RwLock<Vec<MemoryNote>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notes(notes: Vec<MemoryNote>) -> Self {
        Self { notes: RwLock::new(notes) }
    }

    pub fn insert(&self, note: MemoryNote) {
        self.notes.write().expect("note store poisoned").push(note);
    }
}

#[async_trait]
impl MemorySearch for InMemoryStore {
    async fn search(
        &self,
        scope: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MemoryNote>, SearchError> {
        let needle = query.trim().to_lowercase();
        let notes = self.notes.read().map_err(|e| SearchError::Backend(e.to_string()))?;

        let mut hits: Vec<MemoryNote> = notes
            .iter()
            .filter(|n| n.scope == scope)
            .filter(|n| {
                needle.is_empty()
                    || n.title.to_lowercase().contains(&needle)
                    || n.body.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        hits.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        hits.truncate(limit);
        Ok(hits)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
