// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The insertion engine: turn an accepted candidate plus the session's
//! trigger range into one atomic buffer replacement.
//!
//! Range math is defensive throughout — live input means the range may be
//! stale by the time a candidate is applied, so every boundary is clamped
//! instead of trusted.

use crate::buffer::snap_boundary;
use crate::{Candidate, CandidateKind, Trigger};

/// The result of applying a candidate: the replacement buffer, the new
/// cursor, and (for memory candidates) the selected note id.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Application {
    pub text: String,
    pub cursor: usize,
    pub memory_id: Option<String>,
}

/// Apply `candidate` over the query `range` of `text`.
///
/// For `@`/`@@` the marker itself is removed along with the query; for `/`
/// and `$` the marker stays and only the query is replaced.
pub(crate) fn apply(
    text: &str,
    trigger: Trigger,
    range: (usize, usize),
    candidate: &Candidate,
) -> Application {
    let len = text.len();
    let start = snap_boundary(text, range.0.min(len));
    let end = snap_boundary(text, range.1.min(len)).max(start);

    let trigger_start = match trigger {
        Trigger::File | Trigger::Memory => {
            let marker = trigger.marker();
            if start >= marker.len() && &text[start - marker.len()..start] == marker {
                start - marker.len()
            } else {
                // Marker not where the range claims; replace the query only.
                start
            }
        }
        Trigger::Command | Trigger::Skill => start,
    };

    // Memory candidates consume the trigger range and leave nothing behind.
    if trigger == Trigger::Memory && candidate.kind == CandidateKind::Memory {
        let new_text = format!("{}{}", &text[..trigger_start], &text[end..]);
        return Application {
            text: new_text,
            cursor: trigger_start,
            memory_id: candidate.memory_id.clone(),
        };
    }

    let mut insertion = candidate.insertion().to_string();
    if trigger == Trigger::File {
        // Guard against candidates that already carry the trigger marker.
        while insertion.starts_with('@') {
            insertion.remove(0);
        }
    }

    let whitespace_follows = text[end..]
        .chars()
        .next()
        .map(char::is_whitespace)
        .unwrap_or(false);
    let add_space =
        candidate.cursor_offset.is_none() && !whitespace_follows && !insertion.is_empty();

    let mut new_text = String::with_capacity(text.len() + insertion.len() + 1);
    new_text.push_str(&text[..trigger_start]);
    new_text.push_str(&insertion);
    if add_space {
        new_text.push(' ');
    }
    new_text.push_str(&text[end..]);

    let cursor = match candidate.cursor_offset {
        Some(offset) => {
            let clamped = snap_boundary(&insertion, offset.min(insertion.len()));
            trigger_start + clamped
        }
        None => trigger_start + insertion.len() + usize::from(add_space),
    };

    Application {
        cursor: cursor.min(new_text.len()),
        text: new_text,
        memory_id: None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
