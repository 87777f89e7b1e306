//! UI rendering module for cinelog.
//!
//! `render()` is the single entry point called by the event loop's
//! `terminal.draw()` closure. It draws the tab header, the screen for the
//! current route, the status bar, and finally any overlay (dialog or help) on
//! top.

mod layout;
pub mod dialog;
pub mod friends;
pub mod help;
pub mod keybindings;
pub mod movie_info;
pub mod movie_list;
pub mod search;
pub mod trending;

use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use cinelog_core::nav::Route;
use layout::{compute_layout, render_status_bar, render_tabs};

/// Renders one complete frame.
///
/// Called exactly once per `AppEvent::Render` inside `terminal.draw()`.
/// Takes `state` mutably because list selections are clamped to what is
/// actually on screen before drawing.
///
/// # Arguments
///
/// * `frame` — current render frame provided by `terminal.draw()`
/// * `state` — mutable reference to app state
/// * `theme` — active color theme
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [tabs, body, status_bar] = compute_layout(frame);

    render_tabs(frame, tabs, state, theme);

    match state.route().clone() {
        Route::Search => search::render_search(frame, body, state, theme),
        Route::UserMovies(_) => movie_list::render_user_movies(frame, body, state, theme),
        Route::Friends => friends::render_friends(frame, body, state, theme),
        Route::Trending => trending::render_trending(frame, body, state, theme),
        Route::MovieInfo(movie) => movie_info::render_movie_info(frame, body, &movie, theme),
    }

    render_status_bar(frame, status_bar, state, theme);

    match state.mode {
        Mode::Dialog => dialog::render_dialog(frame, state, theme),
        Mode::HelpOverlay => help::render_help_overlay(frame, theme, state.help_scroll),
        Mode::Normal | Mode::Insert => {}
    }
}

/// Braille spinner frame for the given tick counter.
pub(crate) fn spinner(tick: u64) -> char {
    const FRAMES: [char; 8] = ['⣾', '⣽', '⣻', '⢿', '⡿', '⣟', '⣯', '⣷'];
    FRAMES[(tick % FRAMES.len() as u64) as usize]
}

/// Keeps a list selection inside `0..len`; clears it for an empty list.
pub(crate) fn clamp_selection(list: &mut ratatui::widgets::ListState, len: usize) {
    match (list.selected(), len) {
        (_, 0) => list.select(None),
        (None, _) => list.select(Some(0)),
        (Some(i), n) if i >= n => list.select(Some(n - 1)),
        _ => {}
    }
}

/// Renders a half-point rating as five star glyphs, e.g. `★★★½☆`.
pub(crate) fn stars(rating: Option<f64>) -> String {
    let Some(value) = rating else {
        return "unrated".to_owned();
    };
    let halves = (value * 2.0).round().clamp(0.0, 10.0) as usize;
    let full = halves / 2;
    let half = halves % 2;
    let mut out = String::with_capacity(5 * 3);
    out.extend(std::iter::repeat('★').take(full));
    if half == 1 {
        out.push('½');
    }
    out.extend(std::iter::repeat('☆').take(5 - full - half));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::ListState;

    #[test]
    fn stars_render_half_points() {
        assert_eq!(stars(Some(3.5)), "★★★½☆");
        assert_eq!(stars(Some(0.0)), "☆☆☆☆☆");
        assert_eq!(stars(Some(5.0)), "★★★★★");
        assert_eq!(stars(None), "unrated");
    }

    #[test]
    fn selection_is_clamped_to_the_list() {
        let mut list = ListState::default();
        list.select(Some(7));
        clamp_selection(&mut list, 3);
        assert_eq!(list.selected(), Some(2));
        clamp_selection(&mut list, 0);
        assert_eq!(list.selected(), None);
        clamp_selection(&mut list, 4);
        assert_eq!(list.selected(), Some(0));
    }
}
