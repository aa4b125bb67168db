// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Candidate providers: one module per suggestion source.
//!
//! Providers are synchronous and pure — they turn already-loaded lists into
//! ranked [`Candidate`](crate::Candidate) vectors.  The memory source is the
//! exception; its lookup is asynchronous and lives in `quill-memory`, with
//! only the note→candidate mapping here.

mod commands;
mod files;
mod memory;
mod skills;

pub use commands::{CommandProvider, CommandSpec};
pub use files::FileProvider;
pub use skills::{SkillProvider, SkillSpec};

pub(crate) use memory::candidates_from_notes;

use crate::Candidate;

/// Case-insensitive substring match against a label and optional description.
pub(crate) fn substring_match(query: &str, label: &str, description: Option<&str>) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    label.to_lowercase().contains(&needle)
        || description
            .map(|d| d.to_lowercase().contains(&needle))
            .unwrap_or(false)
}

/// Drop candidates whose id repeats an earlier one; id uniqueness within a
/// list is an invariant the session relies on.
pub(crate) fn dedupe_by_id(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = std::collections::HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.id.clone()))
        .collect()
}
