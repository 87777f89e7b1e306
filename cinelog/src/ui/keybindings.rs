//! Keybinding dispatcher for cinelog.
//!
//! Translates raw crossterm `KeyEvent`s into `AppState` mutations and returns a
//! `KeyAction` telling the event loop whether to continue or quit. The
//! dispatcher branches first on `state.mode` so that HelpOverlay, Dialog,
//! Insert, and Normal all have isolated handler functions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{AppState, AuthKind, Dialog, FriendsFocus, Mode, RatingField, TrendingFocus};
use cinelog_core::nav::Route;

/// Control-flow signal returned from the key dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
}

/// Dispatches a key event to the handler matching the current mode.
///
/// # Arguments
///
/// * `key`   — the raw crossterm key event (code + modifiers)
/// * `state` — mutable reference to all UI state
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::Dialog => handle_dialog(key, state),
        Mode::Insert => handle_insert(key, state),
        Mode::Normal => handle_normal(key, state),
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    // Any key acknowledges the last notice.
    state.notice = None;

    match key.code {
        KeyCode::Char('q') => return KeyAction::Quit,
        KeyCode::Esc => {
            state.go_back();
        }
        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
        }

        // Screens
        KeyCode::Char(c @ '1'..='4') => state.switch_tab(c as usize - '1' as usize),

        // Account
        KeyCode::Char('L') => state.open_auth(AuthKind::Login),
        KeyCode::Char('R') => state.open_auth(AuthKind::Register),
        KeyCode::Char('O') => state.logout(),

        // Typing
        KeyCode::Char('/') | KeyCode::Char('i') if state.has_input() => {
            if matches!(state.route(), Route::Friends) {
                state.friends_focus = FriendsFocus::Results;
            }
            state.mode = Mode::Insert;
        }

        // Lists
        KeyCode::Char('j') | KeyCode::Down => state.move_selection(1),
        KeyCode::Char('k') | KeyCode::Up => state.move_selection(-1),
        KeyCode::Char('n') | KeyCode::Right => state.next_page(),
        KeyCode::Char('p') | KeyCode::Left => state.previous_page(),
        KeyCode::Char('s') => state.cycle_sort(),
        KeyCode::Tab => cycle_focus(state),
        KeyCode::Enter => state.activate(),
        KeyCode::Char('r') => refresh(state),

        // Item actions
        KeyCode::Char('a') => rate(state),
        KeyCode::Char('d') => state.delete_selected(),
        KeyCode::Char('v') => state.toggle_review(),
        KeyCode::Char('f') => state.toggle_follow(),
        KeyCode::Char('o') if matches!(state.route(), Route::Friends) => {
            state.open_selected_friend_list()
        }

        _ => {}
    }
    KeyAction::Continue
}

fn cycle_focus(state: &mut AppState) {
    match state.route() {
        Route::Friends => state.friends_focus = state.friends_focus.next(),
        Route::Trending => {
            state.trending_focus = match state.trending_focus {
                TrendingFocus::Latest => TrendingFocus::Top,
                TrendingFocus::Top => TrendingFocus::Latest,
            };
            state.trending_list.select(Some(0));
        }
        _ => {}
    }
}

fn refresh(state: &mut AppState) {
    match state.route() {
        Route::Trending => state.refresh_trending(),
        Route::UserMovies(_) => state.reload_user_movies(),
        _ => {}
    }
}

fn rate(state: &mut AppState) {
    if !state.session.is_authenticated() {
        state.notify_error("Sign in to rate movies.");
        return;
    }
    state.open_rating_for_selection();
}

// ---------------------------------------------------------------------------
// Insert mode
// ---------------------------------------------------------------------------

/// Feeds characters to the search box of the current screen.
fn handle_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => state.mode = Mode::Normal,
        KeyCode::Backspace => state.delete_char(),
        KeyCode::Char(c) => state.insert_char(c),
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Dialog mode
// ---------------------------------------------------------------------------

fn handle_dialog(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if key.code == KeyCode::Esc {
        state.close_dialog();
        return KeyAction::Continue;
    }
    if key.code == KeyCode::Enter && !key.modifiers.contains(KeyModifiers::ALT) {
        state.submit_dialog();
        return KeyAction::Continue;
    }

    match state.dialog.as_mut() {
        Some(Dialog::Auth(form)) => match key.code {
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Backspace => form.pop(),
            KeyCode::Char(c) => form.push(c),
            _ => {}
        },
        Some(Dialog::Rating { form, field }) => match (key.code, *field) {
            (KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up, _) => {
                *field = match field {
                    RatingField::Rating => RatingField::Review,
                    RatingField::Review => RatingField::Rating,
                };
            }
            (KeyCode::Left, RatingField::Rating) => form.step_rating(-1),
            (KeyCode::Right, RatingField::Rating) => form.step_rating(1),
            (KeyCode::Char(c @ '0'..='5'), RatingField::Rating) => {
                form.set_rating(f64::from(c as u8 - b'0'))
            }
            // Alt-Enter inserts a line break in the review.
            (KeyCode::Enter, RatingField::Review) => form.review_mut().push('\n'),
            (KeyCode::Backspace, RatingField::Review) => {
                form.review_mut().pop();
            }
            (KeyCode::Char(c), RatingField::Review) => form.review_mut().push(c),
            _ => {}
        },
        None => state.mode = Mode::Normal,
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// Help overlay
// ---------------------------------------------------------------------------

fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.help_scroll = state.help_scroll.saturating_add(1),
        KeyCode::Char('k') | KeyCode::Up => state.help_scroll = state.help_scroll.saturating_sub(1),
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}
