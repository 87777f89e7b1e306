//! Rated-movie list renderer, shared by the "My movies"/user list screen and
//! the friends screen's selected-user panel.
//!
//! Each row shows the title, the rating as stars, and a `✎` marker when a
//! review exists. Expanded reviews render as indented lines under their row.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
};

use cinelog_core::view::UserMoviesView;
use cinelog_core::UserMovie;

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::layout::{page_bar, panel_block};
use crate::ui::{clamp_selection, spinner, stars};

/// Renders the full-screen list behind `Route::UserMovies`.
pub fn render_user_movies(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let session = state.current_session();
    let owner = state.user_movies.is_owner(session.as_ref());
    let title = match (owner, state.user_movies.username()) {
        (true, _) => "My movies".to_owned(),
        (false, Some(name)) => format!("{name}'s movies"),
        (false, None) => "Movies".to_owned(),
    };
    let hints = if owner { "a rate · d delete · v review" } else { "v review · Enter info" };
    render_rated_list(
        frame,
        area,
        RatedList {
            view: &state.user_movies,
            list: &mut state.movies_list,
            title,
            hints,
            focused: true,
            tick: state.tick,
        },
        theme,
    );
}

/// Everything one rated list panel needs.
pub struct RatedList<'a> {
    pub view: &'a UserMoviesView,
    pub list: &'a mut ListState,
    pub title: String,
    pub hints: &'static str,
    pub focused: bool,
    pub tick: u64,
}

/// Renders a rated list with its pager into `area`.
///
/// # Arguments
///
/// * `frame` — current render frame
/// * `area` — the panel `Rect` including borders and the pager row
/// * `panel` — the view, its selection, and the labels to draw
/// * `theme` — active color theme
pub fn render_rated_list(frame: &mut Frame, area: Rect, panel: RatedList<'_>, theme: &Theme) {
    let RatedList { view, list, title, hints, focused, tick } = panel;
    let [list_area, pager_area] =
        area.layout(&Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]));

    let mut title_spans = vec![Span::raw(format!(" {title} "))];
    if view.is_loading() {
        title_spans.push(Span::styled(format!("{} ", spinner(tick)), Style::default().fg(theme.highlight)));
    }
    let block = panel_block(Line::from(title_spans), focused, theme);

    let items = view.list();
    let page = items.page_slice();
    if let Some(error) = view.error() {
        let line = Line::styled(error.to_owned(), Style::default().fg(theme.error));
        frame.render_widget(Paragraph::new(line).block(block).wrap(Wrap { trim: true }), list_area);
    } else if page.is_empty() {
        let message = if view.is_loading() { "Loading..." } else { "No movies yet." };
        let line = Line::styled(message, Style::default().fg(theme.muted));
        frame.render_widget(Paragraph::new(line).block(block), list_area);
    } else {
        let rows: Vec<ListItem> = page
            .iter()
            .map(|item| rated_item(item, view.review_expanded(item.movie_id), theme))
            .collect();
        let widget = List::new(rows)
            .block(block)
            .highlight_style(Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD))
            .highlight_symbol("▶ ");
        clamp_selection(list, page.len());
        frame.render_stateful_widget(widget, list_area, list);
    }

    if !items.is_empty() {
        let mut bar = page_bar(items.sort_mode().label(), items.current_page(), items.total_pages(), theme);
        bar.spans.push(Span::styled(format!(" · {hints}"), Style::default().fg(theme.muted)));
        frame.render_widget(Paragraph::new(bar), pager_area);
    }
}

fn rated_item(item: &UserMovie, expanded: bool, theme: &Theme) -> ListItem<'static> {
    let mut spans = vec![
        Span::styled(format!("{} ", stars(item.rating)), Style::default().fg(theme.rating)),
        Span::styled(item.movie_title.clone(), Style::default().fg(theme.title)),
    ];
    if item.has_review() {
        let marker = if expanded { "  ▾ review" } else { "  ✎" };
        spans.push(Span::styled(marker, Style::default().fg(theme.review)));
    }
    let mut lines = vec![Line::from(spans)];
    if expanded {
        if let Some(review) = item.review.as_deref() {
            lines.extend(review.lines().map(|l| {
                Line::styled(format!("      {l}"), Style::default().fg(theme.review))
            }));
        }
    }
    ListItem::new(lines)
}
