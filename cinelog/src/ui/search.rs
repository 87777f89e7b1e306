//! Movie search screen: search box, paginated results, pager.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};

use cinelog_core::Movie;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use crate::ui::layout::{page_bar, panel_block, render_input};
use crate::ui::{clamp_selection, spinner};

/// Renders the search screen into `area`.
///
/// # Arguments
///
/// * `frame` — current render frame
/// * `area` — the body `Rect` below the tab header
/// * `state` — app state supplying the search view and its selection
/// * `theme` — active color theme
pub fn render_search(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let [input_area, results_area, pager_area] = area.layout(&Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ]));

    let pipeline = state.search.pipeline();
    let loading = pipeline.is_loading().then(|| spinner(state.tick));
    render_input(
        frame,
        input_area,
        "Search movies",
        &state.search_input,
        state.mode == Mode::Insert,
        loading,
        theme,
    );

    let results = state.search.results();
    let page = results.page_slice();
    let title = if results.is_empty() {
        "Results".to_owned()
    } else {
        format!("Results ({})", results.len())
    };
    let block = panel_block(title, state.mode == Mode::Normal, theme);

    if let Some(error) = pipeline.error() {
        let message = Line::styled(error.to_owned(), Style::default().fg(theme.error));
        frame.render_widget(Paragraph::new(message).block(block), results_area);
    } else if page.is_empty() {
        let message = if state.search.show_no_results() {
            "No movies found."
        } else {
            "Type a title to search."
        };
        let line = Line::styled(message, Style::default().fg(theme.muted));
        frame.render_widget(Paragraph::new(line).block(block), results_area);
    } else {
        let items: Vec<ListItem> = page.iter().map(|m| movie_item(m, theme)).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD))
            .highlight_symbol("▶ ");
        clamp_selection(&mut state.search_list, page.len());
        frame.render_stateful_widget(list, results_area, &mut state.search_list);
    }

    let results = state.search.results();
    if !results.is_empty() {
        let bar = page_bar(
            results.sort_mode().label(),
            results.current_page(),
            results.total_pages(),
            theme,
        );
        frame.render_widget(Paragraph::new(bar), pager_area);
    }
}

/// `Title (1999)  ★ 7.8 · 12,345 votes`
fn movie_item(movie: &Movie, theme: &Theme) -> ListItem<'static> {
    let mut spans = vec![Span::styled(movie.primary_title.clone(), Style::default().fg(theme.title))];
    if let Some(year) = movie.start_year {
        spans.push(Span::styled(format!(" ({year})"), Style::default().fg(theme.muted)));
    }
    if let Some(rating) = movie.aggregate_rating {
        spans.push(Span::styled(format!("  ★ {rating:.1}"), Style::default().fg(theme.rating)));
    }
    if let Some(votes) = movie.vote_count {
        spans.push(Span::styled(format!(" · {votes} votes"), Style::default().fg(theme.muted)));
    }
    ListItem::new(Line::from(spans))
}
