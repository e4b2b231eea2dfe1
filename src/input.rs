//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Most keys only touch state
//! that is already resident; submitting a search is the one action that
//! needs the network, so it is returned to the caller as an [`Action`]
//! instead of being performed here.
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_key_event`] that calls it.
//! 3. Update the help text in [`crate::ui`]'s status bar.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, SearchTicket, View};

/// Work the event loop must start on behalf of a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Search(SearchTicket),
}

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit = true;
        return None;
    }

    if app.editing {
        match key.code {
            KeyCode::Enter => return app.submit_input().map(Action::Search),
            KeyCode::Esc => app.cancel_editing(),
            KeyCode::Backspace => app.pop_char(),
            KeyCode::Char(c) => app.push_char(c),
            _ => {}
        }
        return None;
    }

    // Nothing to navigate until the feeds have settled, but a search can
    // already be typed and submitted.
    if app.loading {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
            KeyCode::Char('/') | KeyCode::Char('s') => app.start_editing(),
            _ => {}
        }
        return None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('1') => app.select_view(View::Apod),
        KeyCode::Char('2') => app.select_view(View::Gallery),
        KeyCode::Char('3') => app.select_view(View::Neo),
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.previous_view(),
        KeyCode::Char('/') | KeyCode::Char('s') => app.start_editing(),
        KeyCode::Char('m') | KeyCode::Char(' ') => {
            app.load_more_gallery();
        }
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        _ => {}
    }
    None
}
