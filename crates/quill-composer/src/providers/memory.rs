// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Mapping from memory notes to candidates for the `@@` source.
//!
//! The lookup itself is asynchronous and debounced; see
//! `quill_memory::DebouncedSearch`.  Memory candidates carry no insert
//! text — applying one removes the trigger range and records the note in
//! the manual selection instead.

use quill_memory::MemoryNote;

use crate::{Candidate, CandidateKind};

pub(crate) fn candidates_from_notes(notes: &[MemoryNote]) -> Vec<Candidate> {
    notes
        .iter()
        .map(|note| {
            let mut c = Candidate::simple(note.title.clone(), CandidateKind::Memory);
            c.id = note.id.clone();
            c.memory_id = Some(note.id.clone());
            if !note.body.is_empty() {
                let preview: String = note.body.chars().take(80).collect();
                c.description = Some(preview);
            }
            c
        })
        .collect()
}
