use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// All logical actions the composer engine can perform, independent of key
/// binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Suggestion session (only while open)
    SuggestNext,
    SuggestPrev,
    SuggestAccept,
    SuggestCancel,

    // History navigation (only while the session is closed)
    HistoryOlder,
    HistoryNewer,

    // Inline ghost completion (only while the session is closed)
    GhostAccept,
}

/// Map a raw key event to an [`Action`].
///
/// The precedence encoded here is the engine contract: an open session
/// claims the navigation keys first; history navigation and the ghost
/// completion only see keys while the session is closed.  Modified Up/Down
/// never navigate history.
pub fn map_key(
    event: &KeyEvent,
    session_open: bool,
    ghost_visible: bool,
) -> Option<Action> {
    let shift = event.modifiers.contains(KeyModifiers::SHIFT);
    let no_mods = event.modifiers.is_empty();

    if session_open {
        return match event.code {
            KeyCode::Up => Some(Action::SuggestPrev),
            KeyCode::Down => Some(Action::SuggestNext),
            KeyCode::Tab if !shift => Some(Action::SuggestAccept),
            KeyCode::BackTab => Some(Action::SuggestPrev),
            KeyCode::Enter if no_mods => Some(Action::SuggestAccept),
            KeyCode::Esc => Some(Action::SuggestCancel),
            _ => None,
        };
    }

    match event.code {
        KeyCode::Up if no_mods => Some(Action::HistoryOlder),
        KeyCode::Down if no_mods => Some(Action::HistoryNewer),
        KeyCode::Tab if no_mods && ghost_visible => Some(Action::GhostAccept),
        _ => None,
    }
}

// ─── Unit tests ───────────────────────────────────────────────────────────────
