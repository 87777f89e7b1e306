//! Screen layout and the shared chrome: tab header, panel blocks, search box,
//! page bar, and status bar.
//!
//! Pure layout arithmetic plus widgets that every screen reuses. No mutable
//! application state lives here.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Tabs},
};

use crate::app::{AppState, Mode};
use crate::theme::Theme;

const TAB_TITLES: [&str; 4] = ["1 Search", "2 My movies", "3 Friends", "4 Trending"];

/// Returns `[tabs, body, status_bar]` for the current frame.
///
/// The returned rects are valid only for the current draw closure.
pub fn compute_layout(frame: &Frame) -> [Rect; 3] {
    frame.area().layout(&Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ]))
}

/// Builds a bordered `Block` for a panel.
///
/// Focused panels get a thick border in `border_active`.
///
/// # Arguments
///
/// * `title` — panel title shown in the top border
/// * `is_focused` — `true` when this panel has keyboard focus
/// * `theme` — active color theme
pub fn panel_block<'a>(title: impl Into<Line<'a>>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

pub fn render_tabs(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let tabs = Tabs::new(TAB_TITLES)
        .select(state.tab_index())
        .style(Style::default().fg(theme.tab_inactive))
        .highlight_style(Style::default().fg(theme.tab_active).add_modifier(Modifier::BOLD))
        .divider("│");
    frame.render_widget(tabs, area);
}

/// Renders a 3-row search box; the cursor is shown while typing.
///
/// # Arguments
///
/// * `title` — label in the top border
/// * `text` — current contents
/// * `active` — `true` in insert mode
/// * `loading` — draws the spinner in the border while a request is in flight
pub fn render_input(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    text: &str,
    active: bool,
    loading: Option<char>,
    theme: &Theme,
) {
    let mut title_spans = vec![Span::raw(format!(" {title} "))];
    if let Some(glyph) = loading {
        title_spans.push(Span::styled(format!("{glyph} "), Style::default().fg(theme.highlight)));
    }
    let block = panel_block(Line::from(title_spans), active, theme);
    let cursor = if active { "▏" } else { "" };
    let line = if text.is_empty() && !active {
        Line::styled("press / to type", Style::default().fg(theme.muted))
    } else {
        Line::from(vec![Span::raw(text.to_owned()), Span::raw(cursor)])
    };
    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// One-line pager: `sort: title ↑   page 2/5   n/p page · s sort`.
pub fn page_bar(sort_label: &str, page: usize, total: usize, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" sort: {sort_label}"), Style::default().fg(theme.highlight)),
        Span::raw("   "),
        Span::styled(format!("page {page}/{total}"), Style::default().fg(theme.title)),
        Span::styled("   n/p page · s sort", Style::default().fg(theme.muted)),
    ])
}

/// Renders the 1-row status bar: mode, identity, and the latest notice.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::Insert => (" INSERT ", theme.status_mode_insert),
        Mode::Dialog => (" DIALOG ", theme.status_mode_insert),
        Mode::Normal | Mode::HelpOverlay => (" NORMAL ", theme.status_mode_normal),
    };

    let identity = match state.current_session() {
        Some(session) => format!(" {} ", session.username),
        None => " signed out (L login · R register) ".to_owned(),
    };

    let mut spans = vec![
        Span::styled(mode_text, Style::default().fg(mode_fg).add_modifier(Modifier::BOLD)),
        Span::raw(identity),
    ];
    match &state.notice {
        Some(notice) => {
            let fg = if notice.is_error { theme.error } else { theme.success };
            spans.push(Span::styled(format!(" {}", notice.text), Style::default().fg(fg)));
        }
        None => spans.push(Span::raw(" ? help · q quit")),
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg)),
        area,
    );
}
