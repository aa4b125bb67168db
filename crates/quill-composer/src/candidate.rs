// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The suggestion item shared by all providers and the insertion engine.

/// What kind of source produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// Built-in command from the static list.
    Command,
    /// Command-literal entry pinned ahead of the sorted command list.
    CommandLiteral,
    /// Skill tag.
    Skill,
    /// Prompt/custom-command template (may carry a placeholder).
    Prompt,
    /// Workspace file.
    File,
    /// Workspace directory (inserted with a trailing `/`).
    Directory,
    /// Manual-memory note.
    Memory,
}

/// One selectable suggestion.
///
/// `id` is the identity — unique within a single candidate list.  The
/// insertion engine uses `insert_text` (falling back to `label`) and the
/// optional `cursor_offset` into the inserted text.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    pub insert_text: Option<String>,
    pub cursor_offset: Option<usize>,
    pub kind: CandidateKind,
    pub is_directory: bool,
    pub memory_id: Option<String>,
}

impl Candidate {
    /// A plain candidate whose id, label, and inserted text coincide.
    pub fn simple(label: impl Into<String>, kind: CandidateKind) -> Self {
        let label = label.into();
        Self {
            id: label.clone(),
            label,
            description: None,
            insert_text: None,
            cursor_offset: None,
            kind,
            is_directory: false,
            memory_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_insert_text(mut self, text: impl Into<String>) -> Self {
        self.insert_text = Some(text.into());
        self
    }

    pub fn with_cursor_offset(mut self, offset: usize) -> Self {
        self.cursor_offset = Some(offset);
        self
    }

    /// The text the insertion engine will place in the buffer.
    pub fn insertion(&self) -> &str {
        self.insert_text.as_deref().unwrap_or(&self.label)
    }
}
