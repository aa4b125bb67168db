// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The `@` source: workspace files and directories.
//!
//! Directories are suggested ahead of files, with a trailing slash.  The
//! host owns filtering: for a non-empty query it supplies a pre-filtered
//! list which is passed through untouched.  Only the empty query (the bare
//! `@`) is capped, to keep the initial popup bounded.

use crate::{Candidate, CandidateKind};

use super::dedupe_by_id;

/// Provider for the `@` trigger.
pub struct FileProvider {
    files: Vec<String>,
    dirs: Vec<String>,
    empty_query_cap: usize,
}

impl FileProvider {
    pub fn new(files: Vec<String>, dirs: Vec<String>, empty_query_cap: usize) -> Self {
        Self { files, dirs, empty_query_cap }
    }

    /// Replace both lists; called by the host whenever its file index
    /// produces fresh results for the current query.
    pub fn set_lists(&mut self, files: Vec<String>, dirs: Vec<String>) {
        self.files = files;
        self.dirs = dirs;
    }

    pub fn suggest(&self, query: &str) -> Vec<Candidate> {
        let mut out: Vec<Candidate> = Vec::with_capacity(self.dirs.len() + self.files.len());

        for dir in &self.dirs {
            let label = if dir.ends_with('/') {
                dir.clone()
            } else {
                format!("{dir}/")
            };
            let mut c = Candidate::simple(label, CandidateKind::Directory);
            c.is_directory = true;
            out.push(c);
        }
        for file in &self.files {
            out.push(Candidate::simple(file.clone(), CandidateKind::File));
        }

        if query.is_empty() {
            out.truncate(self.empty_query_cap);
        }
        dedupe_by_id(out)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(cap: usize) -> FileProvider {
        FileProvider::new(
            vec!["src/main.rs".into(), "src/lib.rs".into()],
            vec!["src".into(), "tests/".into()],
            cap,
        )
    }

    #[test]
    fn directories_come_first_with_trailing_slash() {
        let items = provider(10).suggest("");
        let labels: Vec<&str> = items.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["src/", "tests/", "src/main.rs", "src/lib.rs"]);
        assert!(items[0].is_directory);
        assert_eq!(items[0].kind, CandidateKind::Directory);
        assert!(!items[2].is_directory);
    }

    #[test]
    fn existing_trailing_slash_is_not_doubled() {
        let items = provider(10).suggest("");
        assert_eq!(items[1].label, "tests/");
    }

    #[test]
    fn empty_query_is_capped() {
        let items = provider(3).suggest("");
        assert_eq!(items.len(), 3, "bare trigger must show a bounded list");
    }

    #[test]
    fn non_empty_query_is_passed_through_uncapped() {
        let items = provider(1).suggest("src");
        assert_eq!(
            items.len(),
            4,
            "pre-filtered lists are not truncated for a non-empty query"
        );
    }

    #[test]
    fn set_lists_replaces_previous_results() {
        let mut p = provider(10);
        p.set_lists(vec!["README.md".into()], vec![]);
        let items = p.suggest("read");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "README.md");
    }
}
