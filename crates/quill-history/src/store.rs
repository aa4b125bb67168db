// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Persistence for composer history, keyed by logical scope (workspace id).
//!
//! The store is best-effort: a missing or corrupt payload loads as an empty
//! list so the composer keeps working.  Only `save` reports errors, and the
//! callers treat those as non-fatal too.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::warn;

/// Error raised when persisting history fails.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("writing history file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("encoding history payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Scope-keyed storage for committed composer inputs.
pub trait HistoryStore: Send {
    /// Load the entries stored for `scope`, oldest first.
    ///
    /// Missing or unreadable data loads as an empty list, never an error.
    fn load(&self, scope: &str) -> Vec<String>;

    /// Replace the entries stored for `scope`.
    fn save(&mut self, scope: &str, entries: &[String]) -> Result<(), StoreError>;
}

// ── In-memory store ───────────────────────────────────────────────────────────

/// Volatile store used by tests and as a fallback when no data dir exists.
#[derive(Debug, Default)]
pub struct MemoryStore {
    scopes: HashMap<String, Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self, scope: &str) -> Vec<String> {
        self.scopes.get(scope).cloned().unwrap_or_default()
    }

    fn save(&mut self, scope: &str, entries: &[String]) -> Result<(), StoreError> {
        self.scopes.insert(scope.to_string(), entries.to_vec());
        Ok(())
    }
}

// ── JSON file store ───────────────────────────────────────────────────────────

/// Returns the default location of the history file:
/// `$XDG_DATA_HOME/quill/history.json` (i.e. `~/.local/share/quill/history.json`).
pub fn history_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".local")
                .join("share")
        })
        .join("quill")
        .join("history.json")
}

/// One JSON file holding a map of scope id → entries.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by the default XDG data-dir location.
    pub fn new() -> Self {
        Self { path: history_path() }
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn read_map(&self) -> HashMap<String, Vec<String>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(_) => return HashMap::new(),
        };
        match serde_json::from_str(&text) {
            Ok(map) => map,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt history file, starting empty");
                HashMap::new()
            }
        }
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self, scope: &str) -> Vec<String> {
        self.read_map().remove(scope).unwrap_or_default()
    }

    fn save(&mut self, scope: &str, entries: &[String]) -> Result<(), StoreError> {
        let mut map = self.read_map();
        map.insert(scope.to_string(), entries.to_vec());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let payload = serde_json::to_string_pretty(&map)?;
        std::fs::write(&self.path, payload).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
