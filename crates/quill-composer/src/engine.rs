// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The composer engine: one buffer, four trigger sources, history
//! navigation, and the inline ghost completion, tied together under a
//! strict precedence order.
//!
//! Every edit re-runs the trigger resolver, and the resolver's output alone
//! decides whether the suggestion session is open.  Key events are offered
//! to the open session first, then to history navigation, then to the
//! ghost completion; anything unclaimed returns `false` so the host can
//! apply its own editing behaviour (send-on-Enter, newline handling, and so
//! on).

use crossterm::event::KeyEvent;
use tracing::debug;

use quill_config::Config;
use quill_history::{HistoryStore, ScopedHistory, DEFAULT_SCOPE};
use quill_memory::{DebouncedSearch, ManualSelection, MemoryNote, MemorySearch, SearchOutcome};

use crate::providers::{candidates_from_notes, CommandProvider, FileProvider, SkillProvider};
use crate::{
    ghost, insert, keys::map_key, keys::Action, resolve, Buffer, Candidate, HistoryNavigator,
    ResolvedTrigger, Session, Trigger,
};
use crate::history_nav::NavOutcome;

/// Everything a [`Composer`] needs at construction time.
pub struct ComposerOptions {
    pub config: Config,
    pub commands: CommandProvider,
    pub skills: SkillProvider,
    pub files: FileProvider,
    pub history_store: Box<dyn HistoryStore>,
    /// Memory backend.  `None` disables the `@@` trigger entirely.
    pub memory: Option<std::sync::Arc<dyn MemorySearch>>,
}

/// A finished draft handed back to the host on commit.
#[derive(Debug, Clone)]
pub struct Submission {
    /// Trimmed message text.
    pub text: String,
    /// Manual-memory notes selected for this message.
    pub memory: Vec<MemoryNote>,
}

struct MemoryLookup {
    search: DebouncedSearch,
    /// Notes behind the current memory matches.
    notes: Vec<MemoryNote>,
    /// `(workspace, trimmed query)` of the most recent request.
    last_key: Option<(String, String)>,
}

impl MemoryLookup {
    fn reset(&mut self) {
        self.search.invalidate();
        self.last_key = None;
        self.notes.clear();
    }
}

/// The engine facade.
pub struct Composer {
    buffer: Buffer,
    triggers: Vec<Trigger>,
    commands: CommandProvider,
    skills: SkillProvider,
    files: FileProvider,
    session: Option<Session>,
    navigator: HistoryNavigator,
    ghost: Option<String>,
    history: ScopedHistory,
    store: Box<dyn HistoryStore>,
    selection: ManualSelection,
    memory: Option<MemoryLookup>,
    workspace: Option<String>,
}

impl Composer {
    pub fn new(options: ComposerOptions) -> Self {
        let ComposerOptions { config, commands, skills, files, history_store, memory } = options;

        let memory = memory.map(|searcher| MemoryLookup {
            search: DebouncedSearch::new(
                searcher,
                std::time::Duration::from_millis(config.memory.debounce_ms),
                config.memory.limit,
            ),
            notes: Vec::new(),
            last_key: None,
        });

        let mut store = history_store;
        let mut history = ScopedHistory::new(config.history.cap);
        history.activate(DEFAULT_SCOPE, store.as_mut());

        // Longest marker first, matching the resolver's precedence.
        let mut triggers = Vec::new();
        if config.triggers.memory && memory.is_some() {
            triggers.push(Trigger::Memory);
        }
        if config.triggers.files {
            triggers.push(Trigger::File);
        }
        if config.triggers.commands {
            triggers.push(Trigger::Command);
        }
        if config.triggers.skills {
            triggers.push(Trigger::Skill);
        }

        Self {
            buffer: Buffer::new(),
            triggers,
            commands,
            skills,
            files,
            session: None,
            navigator: HistoryNavigator::new(),
            ghost: None,
            history,
            store,
            selection: ManualSelection::new(),
            memory,
            workspace: None,
        }
    }

    // ── Read-only state for the rendering layer ───────────────────────────────

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The full replacement text the ghost completion proposes, if any.
    pub fn ghost(&self) -> Option<&str> {
        self.ghost.as_deref()
    }

    pub fn selection(&self) -> &ManualSelection {
        &self.selection
    }

    pub fn is_navigating(&self) -> bool {
        self.navigator.is_navigating()
    }

    pub fn navigation_index(&self) -> Option<usize> {
        self.navigator.index()
    }

    pub fn workspace(&self) -> Option<&str> {
        self.workspace.as_deref()
    }

    // ── Scope ─────────────────────────────────────────────────────────────────

    /// Switch the active workspace.  History navigation, the manual-memory
    /// selection, the ghost completion, and any pending lookup are all
    /// reset; they never leak across scopes.
    pub fn set_workspace(&mut self, workspace: Option<&str>) {
        let scope = workspace.unwrap_or(DEFAULT_SCOPE);
        self.history.activate(scope, self.store.as_mut());
        self.workspace = workspace.map(String::from);
        self.navigator.reset();
        self.selection.clear();
        self.ghost = None;
        self.close_session();
        debug!(scope, "workspace switched");
    }

    /// Replace the file/directory lists (the host re-queries its index as
    /// the query changes) and refresh an open `@` session.
    pub fn set_files(&mut self, files: Vec<String>, dirs: Vec<String>) {
        self.files.set_lists(files, dirs);
        if self.session.as_ref().map(Session::trigger) == Some(Trigger::File) {
            self.refresh();
        }
    }

    // ── Editing ───────────────────────────────────────────────────────────────

    /// Full text/cursor replacement from the host.
    pub fn set_text(&mut self, text: impl Into<String>, cursor: usize) {
        self.navigator.abandon();
        self.buffer.replace(text, cursor);
        self.refresh();
    }

    pub fn insert_char(&mut self, ch: char) {
        self.navigator.abandon();
        self.buffer.insert_char(ch);
        self.refresh();
    }

    pub fn insert_str(&mut self, s: &str) {
        self.navigator.abandon();
        self.buffer.insert_str(s);
        self.refresh();
    }

    pub fn backspace(&mut self) {
        self.navigator.abandon();
        self.buffer.backspace();
        self.refresh();
    }

    pub fn delete(&mut self) {
        self.navigator.abandon();
        self.buffer.delete();
        self.refresh();
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.navigator.abandon();
        self.buffer.set_cursor(cursor);
        self.refresh();
    }

    // ── Key dispatch ──────────────────────────────────────────────────────────

    /// Offer a key event to the engine.  Returns `true` when the key was
    /// consumed; unhandled keys belong to the host.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        let action = map_key(event, self.session.is_some(), self.ghost.is_some());

        match action {
            Some(Action::SuggestNext) => {
                if let Some(s) = &mut self.session {
                    s.highlight_next();
                }
                true
            }
            Some(Action::SuggestPrev) => {
                if let Some(s) = &mut self.session {
                    s.highlight_prev();
                }
                true
            }
            Some(Action::SuggestAccept) => {
                match self.session.as_ref().and_then(Session::highlighted).cloned() {
                    Some(candidate) => {
                        self.apply_candidate(&candidate);
                    }
                    None => self.close_session(),
                }
                true
            }
            Some(Action::SuggestCancel) => {
                self.close_session();
                true
            }
            Some(Action::HistoryOlder) => {
                let entries = self.history.entries().to_vec();
                let empty = self.buffer.is_effectively_empty();
                let text = self.buffer.text().to_string();
                match self.navigator.older(&entries, &text, empty) {
                    NavOutcome::Replace(entry) => {
                        self.apply_navigation(entry);
                        true
                    }
                    NavOutcome::Consumed => true,
                    NavOutcome::Ignored => false,
                }
            }
            Some(Action::HistoryNewer) => {
                let entries = self.history.entries().to_vec();
                match self.navigator.newer(&entries) {
                    NavOutcome::Replace(entry) => {
                        self.apply_navigation(entry);
                        true
                    }
                    NavOutcome::Consumed => true,
                    NavOutcome::Ignored => false,
                }
            }
            Some(Action::GhostAccept) => {
                if let Some(text) = self.ghost.take() {
                    let end = text.len();
                    self.buffer.replace(text, end);
                    self.refresh();
                }
                true
            }
            None => {
                // Anything the engine does not claim ends history
                // navigation without restoring the draft.
                self.navigator.abandon();
                false
            }
        }
    }

    // ── Candidate application ─────────────────────────────────────────────────

    /// Apply `candidate` over the current session range.  Returns `false`
    /// when no session is open.
    pub fn apply_candidate(&mut self, candidate: &Candidate) -> bool {
        let Some(session) = &self.session else {
            return false;
        };
        let trigger = session.trigger();
        let range = session.range();
        let applied = insert::apply(self.buffer.text(), trigger, range, candidate);

        if let Some(id) = &applied.memory_id {
            if let Some(mem) = &self.memory {
                if let Some(note) = mem.notes.iter().find(|n| &n.id == id) {
                    let note = note.clone();
                    self.selection.add(note);
                }
            }
        }

        self.buffer.replace(applied.text, applied.cursor);
        self.close_session();
        self.ghost = None;
        self.refresh();
        debug!(label = %candidate.label, ?trigger, "candidate applied");
        true
    }

    // ── Commit ────────────────────────────────────────────────────────────────

    /// Finish the draft: record it in history, hand back the text plus the
    /// selected memory notes, and reset per-message state.
    pub fn commit(&mut self) -> Submission {
        let text = self.buffer.text().trim().to_string();
        self.buffer.clear();
        self.close_session();
        self.ghost = None;
        self.navigator.reset();
        if !text.is_empty() {
            self.history.commit(&text, self.store.as_mut());
        }
        let memory: Vec<MemoryNote> = self.selection.notes().to_vec();
        self.selection.clear();
        Submission { text, memory }
    }

    // ── Memory pump ───────────────────────────────────────────────────────────

    /// Drain completed memory lookups into the open session.  Call from the
    /// host event loop tick.  Returns `true` when the suggestion list
    /// changed.
    pub fn pump(&mut self) -> bool {
        let Some(mem) = &mut self.memory else {
            return false;
        };
        let Some(outcome) = mem.search.try_recv() else {
            return false;
        };
        Self::accept_outcome(
            &mut self.session,
            mem,
            self.workspace.as_deref(),
            outcome,
        )
    }

    fn accept_outcome(
        session: &mut Option<Session>,
        mem: &mut MemoryLookup,
        workspace: Option<&str>,
        outcome: SearchOutcome,
    ) -> bool {
        let Some(s) = session else {
            return false;
        };
        if s.trigger() != Trigger::Memory || workspace != Some(outcome.scope.as_str()) {
            debug!(token = outcome.token, "dropping memory outcome for a stale context");
            return false;
        }
        if mem.last_key.as_ref().map(|(_, q)| q.as_str()) != Some(outcome.query.as_str()) {
            return false;
        }
        mem.notes = outcome.notes;
        let (start, end) = s.range();
        let resolved = ResolvedTrigger { trigger: Trigger::Memory, start, end };
        s.update(resolved, candidates_from_notes(&mem.notes));
        true
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    /// Re-run the resolver and reconcile session and ghost state with its
    /// verdict.  This is the single authority over "is the list open".
    fn refresh(&mut self) {
        match resolve(self.buffer.text(), self.buffer.cursor(), &self.triggers) {
            Some(resolved) => {
                self.ghost = None;
                self.open_or_update(resolved);
            }
            None => {
                self.close_session();
                self.ghost = ghost::compute(self.history.entries(), self.buffer.text());
            }
        }
    }

    fn open_or_update(&mut self, resolved: ResolvedTrigger) {
        let query = resolved.query(self.buffer.text()).to_string();

        // A trigger change tears down any pending memory lookup.
        let prev_trigger = self.session.as_ref().map(Session::trigger);
        if prev_trigger.is_some() && prev_trigger != Some(resolved.trigger) {
            if let Some(mem) = &mut self.memory {
                mem.reset();
            }
        }

        let matches = match resolved.trigger {
            Trigger::Command => self.commands.suggest(&query),
            Trigger::Skill => self.skills.suggest(&query),
            Trigger::File => self.files.suggest(&query),
            Trigger::Memory => self.memory_matches(&query),
        };

        // Providers that close rather than show an empty state: a `@` query
        // is served from a pre-filtered list, so zero matches means there
        // is nothing to wait for.
        let open_when_empty = match resolved.trigger {
            Trigger::File => query.is_empty(),
            Trigger::Command | Trigger::Skill | Trigger::Memory => true,
        };
        if matches.is_empty() && !open_when_empty {
            self.close_session();
            return;
        }

        match &mut self.session {
            Some(s) if s.trigger() == resolved.trigger => s.update(resolved, matches),
            _ => self.session = Some(Session::open(resolved, matches)),
        }
    }

    fn memory_matches(&mut self, query: &str) -> Vec<Candidate> {
        let Some(mem) = &mut self.memory else {
            return Vec::new();
        };
        // No workspace: an immediate empty list, and no lookup at all.
        let Some(ws) = &self.workspace else {
            mem.reset();
            return Vec::new();
        };
        let key = (ws.clone(), query.trim().to_string());
        if mem.last_key.as_ref() == Some(&key) {
            return candidates_from_notes(&mem.notes);
        }
        mem.notes.clear();
        mem.search.request(&key.0, &key.1);
        mem.last_key = Some(key);
        Vec::new()
    }

    fn apply_navigation(&mut self, entry: String) {
        let end = entry.len();
        self.buffer.replace(entry, end);
        self.refresh();
    }

    fn close_session(&mut self) {
        if self.session.take().is_some() {
            debug!("suggestion session closed");
        }
        if let Some(mem) = &mut self.memory {
            mem.reset();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{CommandSpec, SkillSpec};
    use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};
    use quill_history::MemoryStore;
    use quill_memory::InMemoryStore;
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    fn type_text(composer: &mut Composer, text: &str) {
        for ch in text.chars() {
            composer.insert_char(ch);
        }
    }

    fn composer() -> Composer {
        composer_with_memory(None)
    }

    fn composer_with_memory(memory: Option<Arc<dyn MemorySearch>>) -> Composer {
        Composer::new(ComposerOptions {
            config: Config::default(),
            commands: CommandProvider::new(vec![
                CommandSpec::new("help", "Show available commands"),
                CommandSpec::new("model", "Switch the active model"),
            ]),
            skills: SkillProvider::new(vec![
                SkillSpec::skill("commit"),
                SkillSpec::prompt("review").with_argument("file"),
            ]),
            files: FileProvider::new(
                vec!["src/main.rs".into()],
                vec!["src".into()],
                25,
            ),
            history_store: Box::new(MemoryStore::new()),
            memory,
        })
    }

    // ── Session lifecycle ─────────────────────────────────────────────────────

    #[test]
    fn typing_a_slash_opens_the_command_session() {
        let mut c = composer();
        type_text(&mut c, "/he");
        let session = c.session().expect("session must open");
        assert_eq!(session.trigger(), Trigger::Command);
        assert_eq!(session.matches()[0].label, "help");
    }

    #[test]
    fn deleting_the_trigger_closes_the_session() {
        let mut c = composer();
        type_text(&mut c, "/h");
        assert!(c.session().is_some());
        c.backspace();
        c.backspace();
        assert!(c.session().is_none());
    }

    #[test]
    fn escape_closes_the_session_until_the_next_edit() {
        let mut c = composer();
        type_text(&mut c, "/he");
        assert!(c.handle_key(&key(KeyCode::Esc)));
        assert!(c.session().is_none());
        // The next keystroke re-resolves and reopens.
        c.insert_char('l');
        assert!(c.session().is_some());
    }

    #[test]
    fn accepting_a_command_inserts_it_and_closes_the_session() {
        let mut c = composer();
        type_text(&mut c, "/he");
        assert!(c.handle_key(&key(KeyCode::Enter)));
        assert_eq!(c.text(), "/help ");
        assert_eq!(c.cursor(), 6);
        assert!(c.session().is_none(), "applied text must not re-trigger");
    }

    #[test]
    fn prompt_with_placeholder_parks_the_cursor_inside_it() {
        let mut c = composer();
        type_text(&mut c, "$rev");
        assert!(c.handle_key(&key(KeyCode::Enter)));
        assert_eq!(c.text(), "$review <file>");
        assert_eq!(c.cursor(), "$review <".len());
        assert!(c.session().is_none());
    }

    #[test]
    fn arrow_keys_move_the_highlight_with_clamping() {
        let mut c = composer();
        type_text(&mut c, "/");
        let initial = c.session().unwrap().highlight_index();
        assert_eq!(initial, 0);
        c.handle_key(&key(KeyCode::Down));
        assert_eq!(c.session().unwrap().highlight_index(), 1);
        c.handle_key(&key(KeyCode::Down));
        assert_eq!(c.session().unwrap().highlight_index(), 1, "clamped, no wraparound");
        c.handle_key(&key(KeyCode::Up));
        c.handle_key(&key(KeyCode::Up));
        assert_eq!(c.session().unwrap().highlight_index(), 0);
    }

    #[test]
    fn file_candidates_replace_the_marker() {
        let mut c = composer();
        type_text(&mut c, "see @");
        let session = c.session().expect("bare @ opens the file list");
        assert!(session.matches()[0].is_directory);
        c.handle_key(&key(KeyCode::Down));
        assert!(c.handle_key(&key(KeyCode::Enter)));
        assert_eq!(c.text(), "see src/main.rs ");
    }

    #[test]
    fn host_file_updates_refresh_an_open_session() {
        let mut c = composer();
        type_text(&mut c, "@RE");
        assert!(c.session().is_some());
        c.set_files(vec!["README.md".into()], vec![]);
        let session = c.session().unwrap();
        assert_eq!(session.matches().len(), 1);
        assert_eq!(session.matches()[0].label, "README.md");
    }

    #[test]
    fn double_at_without_a_memory_backend_resolves_nothing() {
        let mut c = composer();
        type_text(&mut c, "@@x");
        assert!(
            c.session().is_none(),
            "with `@@` disabled, the inner `@` is glued to another `@` and stays inert"
        );
    }

    // ── History navigation ────────────────────────────────────────────────────

    fn committed(c: &mut Composer, texts: &[&str]) {
        for t in texts {
            c.set_text(*t, t.len());
            c.commit();
        }
    }

    #[test]
    fn up_recalls_entries_newest_first_and_down_restores_the_draft() {
        let mut c = composer();
        committed(&mut c, &["a", "b", "c"]);

        for expected in ["c", "b", "a"] {
            assert!(c.handle_key(&key(KeyCode::Up)));
            assert_eq!(c.text(), expected);
        }
        // A fourth Up stays at the oldest entry.
        assert!(c.handle_key(&key(KeyCode::Up)));
        assert_eq!(c.text(), "a");

        for expected in ["b", "c", ""] {
            assert!(c.handle_key(&key(KeyCode::Down)));
            assert_eq!(c.text(), expected);
        }
        assert!(!c.is_navigating());
    }

    #[test]
    fn up_does_nothing_with_a_non_empty_buffer() {
        let mut c = composer();
        committed(&mut c, &["old entry"]);
        type_text(&mut c, "draft");
        assert!(!c.handle_key(&key(KeyCode::Up)), "unhandled, host moves the cursor");
        assert_eq!(c.text(), "draft");
    }

    #[test]
    fn open_session_takes_up_down_before_history() {
        let mut c = composer();
        committed(&mut c, &["/help"]);
        type_text(&mut c, "/");
        assert!(c.session().is_some());
        c.handle_key(&key(KeyCode::Up));
        assert_eq!(c.text(), "/", "Up must move the highlight, not recall history");
        assert!(!c.is_navigating());
    }

    #[test]
    fn typing_while_navigating_abandons_the_draft() {
        let mut c = composer();
        committed(&mut c, &["recalled"]);
        c.set_text("draft", 5);
        c.set_text("", 0);
        c.handle_key(&key(KeyCode::Up));
        assert_eq!(c.text(), "recalled");
        c.insert_char('!');
        assert!(!c.is_navigating());
        assert_eq!(c.text(), "recalled!");
        // Down is plain input again; the old draft is gone.
        assert!(!c.handle_key(&key(KeyCode::Down)));
        assert_eq!(c.text(), "recalled!");
    }

    #[test]
    fn navigation_entry_application_puts_the_cursor_at_the_end() {
        let mut c = composer();
        committed(&mut c, &["hello world"]);
        c.handle_key(&key(KeyCode::Up));
        assert_eq!(c.cursor(), "hello world".len());
    }

    // ── Ghost completion ──────────────────────────────────────────────────────

    #[test]
    fn ghost_suggests_the_most_recent_matching_entry() {
        let mut c = composer();
        committed(&mut c, &["cargo build --release"]);
        type_text(&mut c, "cargo b");
        assert_eq!(c.ghost(), Some("cargo build --release"));
    }

    #[test]
    fn tab_accepts_the_ghost_by_replacing_the_whole_buffer() {
        let mut c = composer();
        committed(&mut c, &["cargo build --release"]);
        type_text(&mut c, "cargo");
        assert!(c.handle_key(&key(KeyCode::Tab)));
        assert_eq!(c.text(), "cargo build --release");
        assert_eq!(c.cursor(), c.text().len());
    }

    #[test]
    fn opening_a_session_clears_the_ghost() {
        let mut c = composer();
        committed(&mut c, &["/help me please"]);
        type_text(&mut c, "/he");
        assert!(c.session().is_some());
        assert_eq!(c.ghost(), None, "popup and ghost are mutually exclusive");
    }

    #[test]
    fn tab_without_ghost_or_session_is_not_consumed() {
        let mut c = composer();
        assert!(!c.handle_key(&key(KeyCode::Tab)));
    }

    // ── Commit and scope ──────────────────────────────────────────────────────

    #[test]
    fn commit_trims_records_and_clears() {
        let mut c = composer();
        c.set_text("  send me  ", 5);
        let submission = c.commit();
        assert_eq!(submission.text, "send me");
        assert_eq!(c.text(), "");
        c.handle_key(&key(KeyCode::Up));
        assert_eq!(c.text(), "send me");
    }

    #[test]
    fn adjacent_duplicate_commits_store_once() {
        let mut c = composer();
        committed(&mut c, &["x", "x"]);
        c.handle_key(&key(KeyCode::Up));
        assert_eq!(c.text(), "x");
        // Only one entry exists, so another Up is a no-op at the oldest.
        c.handle_key(&key(KeyCode::Up));
        assert_eq!(c.text(), "x");
        c.handle_key(&key(KeyCode::Down));
        assert_eq!(c.text(), "", "a single stored entry confirms the dedupe");
    }

    #[test]
    fn switching_workspace_resets_navigation_and_selection() {
        let mut c = composer();
        committed(&mut c, &["scoped entry"]);
        c.handle_key(&key(KeyCode::Up));
        assert!(c.is_navigating());

        c.set_workspace(Some("ws-2"));
        assert!(!c.is_navigating());
        assert_eq!(c.navigation_index(), None);
        assert_eq!(c.selection().len(), 0);
        assert_eq!(c.ghost(), None);
    }

    #[test]
    fn persisted_default_history_is_available_immediately() {
        use quill_history::HistoryStore;
        let mut store = MemoryStore::new();
        store
            .save(quill_history::DEFAULT_SCOPE, &["persisted".into()])
            .unwrap();
        let mut c = Composer::new(ComposerOptions {
            config: Config::default(),
            commands: CommandProvider::new(vec![]),
            skills: SkillProvider::new(vec![]),
            files: FileProvider::new(vec![], vec![], 25),
            history_store: Box::new(store),
            memory: None,
        });
        c.handle_key(&key(KeyCode::Up));
        assert_eq!(c.text(), "persisted", "stored entries load at construction");
    }

    #[test]
    fn first_workspace_inherits_default_scope_history() {
        let mut c = composer();
        committed(&mut c, &["early draft"]);
        c.set_workspace(Some("ws-1"));
        c.handle_key(&key(KeyCode::Up));
        assert_eq!(c.text(), "early draft", "default-scope history migrates once");
    }

    // ── Memory (async) ────────────────────────────────────────────────────────

    fn memory_store(ws: &str) -> (Arc<InMemoryStore>, MemoryNote) {
        let store = Arc::new(InMemoryStore::new());
        let note = MemoryNote::new(ws, "release checklist", "tag, build, publish");
        store.insert(note.clone());
        (store, note)
    }

    #[tokio::test(start_paused = true)]
    async fn memory_session_fills_after_the_debounce() {
        let (store, note) = memory_store("ws-1");
        let mut c = composer_with_memory(Some(store));
        c.set_workspace(Some("ws-1"));

        type_text(&mut c, "@@rel");
        let session = c.session().expect("memory session opens immediately");
        assert_eq!(session.trigger(), Trigger::Memory);
        assert!(session.matches().is_empty(), "matches are pending until the lookup lands");

        tokio::time::sleep(std::time::Duration::from_millis(400)).await;
        assert!(c.pump(), "pump must deliver the lookup");
        let session = c.session().unwrap();
        assert_eq!(session.matches().len(), 1);
        assert_eq!(session.matches()[0].memory_id.as_deref(), Some(note.id.as_str()));
    }

    #[tokio::test(start_paused = true)]
    async fn accepting_a_memory_candidate_clears_the_range_and_selects_the_note() {
        let (store, note) = memory_store("ws-1");
        let mut c = composer_with_memory(Some(store));
        c.set_workspace(Some("ws-1"));

        type_text(&mut c, "hello @@rel");
        tokio::time::sleep(std::time::Duration::from_millis(400)).await;
        c.pump();

        assert!(c.handle_key(&key(KeyCode::Enter)));
        assert_eq!(c.text(), "hello ", "the trigger range vanishes, no token remains");
        assert_eq!(c.cursor(), 6);
        assert_eq!(c.selection().len(), 1);
        assert_eq!(c.selection().notes()[0].id, note.id);
        assert!(c.session().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn selecting_the_same_note_twice_keeps_one_copy() {
        let (store, note) = memory_store("ws-1");
        let mut c = composer_with_memory(Some(store));
        c.set_workspace(Some("ws-1"));

        for _ in 0..2 {
            type_text(&mut c, "@@rel");
            tokio::time::sleep(std::time::Duration::from_millis(400)).await;
            c.pump();
            c.handle_key(&key(KeyCode::Enter));
        }
        assert_eq!(c.selection().len(), 1, "selection add must be idempotent by id");
        assert_eq!(c.selection().notes()[0].id, note.id);
    }

    #[tokio::test(start_paused = true)]
    async fn no_workspace_means_no_lookup_and_an_empty_list() {
        let (store, _note) = memory_store("ws-1");
        let mut c = composer_with_memory(Some(store));

        type_text(&mut c, "@@rel");
        tokio::time::sleep(std::time::Duration::from_millis(400)).await;
        assert!(!c.pump(), "nothing may be in flight without a workspace");
        assert!(c.session().unwrap().matches().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn commit_clears_the_manual_selection() {
        let (store, note) = memory_store("ws-1");
        let mut c = composer_with_memory(Some(store));
        c.set_workspace(Some("ws-1"));

        type_text(&mut c, "ship it @@rel");
        tokio::time::sleep(std::time::Duration::from_millis(400)).await;
        c.pump();
        c.handle_key(&key(KeyCode::Enter));

        let submission = c.commit();
        assert_eq!(submission.text, "ship it");
        assert_eq!(submission.memory.len(), 1);
        assert_eq!(submission.memory[0].id, note.id);
        assert_eq!(c.selection().len(), 0, "selection is per-message");
    }

    #[tokio::test(start_paused = true)]
    async fn closing_the_session_drops_an_in_flight_lookup() {
        let (store, _note) = memory_store("ws-1");
        let mut c = composer_with_memory(Some(store));
        c.set_workspace(Some("ws-1"));

        type_text(&mut c, "@@rel");
        c.handle_key(&key(KeyCode::Esc));
        assert!(c.session().is_none());

        tokio::time::sleep(std::time::Duration::from_millis(400)).await;
        assert!(!c.pump(), "a cancelled lookup must never apply");
    }
}
