// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
use serde::{Deserialize, Serialize};

/// Serde default helper — returns `true`.
///
/// Used for config fields that should be enabled unless the user explicitly
/// sets them to `false`.  `#[serde(default)]` on a `bool` always falls back
/// to `bool::default()` (i.e. `false`), so a named function is required.
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub triggers: TriggersConfig,
}

/// Composer prompt-history settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of committed entries kept per scope.  Oldest entries
    /// are evicted first once the cap is reached.
    #[serde(default = "HistoryConfig::default_cap")]
    pub cap: usize,
}

impl HistoryConfig {
    fn default_cap() -> usize {
        100
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { cap: Self::default_cap() }
    }
}

/// Memory-search settings for the `@@` suggestion source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Milliseconds to wait after the last keystroke before issuing a lookup.
    #[serde(default = "MemoryConfig::default_debounce_ms")]
    pub debounce_ms: u64,
    /// Maximum number of memory notes requested per lookup.
    #[serde(default = "MemoryConfig::default_limit")]
    pub limit: usize,
}

impl MemoryConfig {
    fn default_debounce_ms() -> u64 {
        120
    }
    fn default_limit() -> usize {
        20
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            debounce_ms: Self::default_debounce_ms(),
            limit: Self::default_limit(),
        }
    }
}

/// File/directory suggestion settings for the `@` source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Maximum number of suggestions shown for an empty query.  Non-empty
    /// queries are served from a pre-filtered list and are not capped here.
    #[serde(default = "FilesConfig::default_empty_query_cap")]
    pub empty_query_cap: usize,
}

impl FilesConfig {
    fn default_empty_query_cap() -> usize {
        25
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self { empty_query_cap: Self::default_empty_query_cap() }
    }
}

/// Per-trigger enable switches.  Disabling a trigger removes its marker from
/// the resolver entirely; the composer behaves as if that source did not
/// exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggersConfig {
    /// `/` — built-in and custom commands.
    #[serde(default = "default_true")]
    pub commands: bool,
    /// `$` — skills and prompt templates.
    #[serde(default = "default_true")]
    pub skills: bool,
    /// `@` — workspace files and directories.
    #[serde(default = "default_true")]
    pub files: bool,
    /// `@@` — stored manual-memory notes.
    #[serde(default = "default_true")]
    pub memory: bool,
}

impl Default for TriggersConfig {
    fn default() -> Self {
        Self {
            commands: true,
            skills: true,
            files: true,
            memory: true,
        }
    }
}
