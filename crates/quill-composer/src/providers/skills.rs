// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The `$` source: skill tags and prompt/custom-command templates.
//!
//! A template may declare an argument placeholder.  Such entries insert
//! `name <hint>` and put the cursor inside the placeholder so the user can
//! type the argument straight away; they never receive an auto-space.

use crate::{Candidate, CandidateKind};

use super::{dedupe_by_id, substring_match};

/// One skill tag or prompt template.
#[derive(Debug, Clone)]
pub struct SkillSpec {
    pub name: String,
    pub description: Option<String>,
    /// Placeholder hint, e.g. `"file"` for a template invoked as
    /// `review <file>`.
    pub argument_hint: Option<String>,
    kind: CandidateKind,
}

impl SkillSpec {
    pub fn skill(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            argument_hint: None,
            kind: CandidateKind::Skill,
        }
    }

    pub fn prompt(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            argument_hint: None,
            kind: CandidateKind::Prompt,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_argument(mut self, hint: impl Into<String>) -> Self {
        self.argument_hint = Some(hint.into());
        self
    }

    fn to_candidate(&self) -> Candidate {
        let mut c = Candidate::simple(self.name.clone(), self.kind);
        if let Some(d) = &self.description {
            c = c.with_description(d.clone());
        }
        if let Some(hint) = &self.argument_hint {
            // Cursor lands just inside the opening bracket of the placeholder.
            let insert = format!("{} <{}>", self.name, hint);
            let offset = self.name.len() + 2;
            c = c.with_insert_text(insert).with_cursor_offset(offset);
            if c.description.is_none() {
                c.description = Some(format!("usage: {} <{}>", self.name, hint));
            }
        }
        c
    }
}

/// Provider for the `$` trigger.
pub struct SkillProvider {
    tags: Vec<SkillSpec>,
}

impl SkillProvider {
    pub fn new(tags: Vec<SkillSpec>) -> Self {
        Self { tags }
    }

    pub fn suggest(&self, query: &str) -> Vec<Candidate> {
        let mut matched: Vec<&SkillSpec> = self
            .tags
            .iter()
            .filter(|t| substring_match(query, &t.name, t.description.as_deref()))
            .collect();
        matched.sort_by(|a, b| a.name.cmp(&b.name));
        dedupe_by_id(matched.into_iter().map(SkillSpec::to_candidate).collect())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
