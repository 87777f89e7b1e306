//! Movie information screen.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
};

use cinelog_core::Movie;

use crate::theme::Theme;
use crate::ui::layout::panel_block;

/// Renders the details of `movie`. Fields the payload lacks are omitted.
pub fn render_movie_info(frame: &mut Frame, area: Rect, movie: &Movie, theme: &Theme) {
    let block = panel_block(format!(" {} ", movie.primary_title), true, theme);
    let label = Style::default().fg(theme.muted);

    let mut lines = vec![Line::styled(
        movie.primary_title.clone(),
        Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
    )];
    if let Some(original) = movie.original_title.as_deref().filter(|t| *t != movie.primary_title) {
        lines.push(Line::from(vec![Span::styled("Original title  ", label), Span::raw(original.to_owned())]));
    }
    if let Some(year) = movie.start_year {
        lines.push(Line::from(vec![Span::styled("Year            ", label), Span::raw(year.to_string())]));
    }
    if let Some(rating) = movie.aggregate_rating {
        let votes = movie.vote_count.map(|v| format!(" from {v} votes")).unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled("Rating          ", label),
            Span::styled(format!("★ {rating:.1}"), Style::default().fg(theme.rating)),
            Span::raw(votes),
        ]));
    }
    if let Some(poster) = movie.poster_url.as_deref() {
        lines.push(Line::from(vec![Span::styled("Poster          ", label), Span::raw(poster.to_owned())]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled("a rate · Esc back", label));

    frame.render_widget(Paragraph::new(Text::from(lines)).block(block).wrap(Wrap { trim: false }), area);
}
