// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The `/` source: built-in commands plus pinned command literals.

use crate::{Candidate, CandidateKind};

use super::{dedupe_by_id, substring_match};

/// One entry in the static command list.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub name: String,
    pub description: String,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self { name: name.into(), description: description.into() }
    }
}

/// Provider for the `/` trigger.
///
/// Literals are pinned: always included, in their given order, ahead of the
/// filtered and alphabetically sorted command list.
pub struct CommandProvider {
    literals: Vec<CommandSpec>,
    commands: Vec<CommandSpec>,
}

impl CommandProvider {
    pub fn new(commands: Vec<CommandSpec>) -> Self {
        Self { literals: Vec::new(), commands }
    }

    pub fn with_literals(mut self, literals: Vec<CommandSpec>) -> Self {
        self.literals = literals;
        self
    }

    pub fn suggest(&self, query: &str) -> Vec<Candidate> {
        let mut out: Vec<Candidate> = self
            .literals
            .iter()
            .map(|c| {
                Candidate::simple(c.name.clone(), CandidateKind::CommandLiteral)
                    .with_description(c.description.clone())
            })
            .collect();

        let mut filtered: Vec<&CommandSpec> = self
            .commands
            .iter()
            .filter(|c| substring_match(query, &c.name, Some(&c.description)))
            .collect();
        filtered.sort_by(|a, b| a.name.cmp(&b.name));

        out.extend(filtered.into_iter().map(|c| {
            Candidate::simple(c.name.clone(), CandidateKind::Command)
                .with_description(c.description.clone())
        }));

        dedupe_by_id(out)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
