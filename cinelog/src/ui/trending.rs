//! Trending screen: latest ratings side by side with the top-rated feed.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use cinelog_core::view::trending::Loadable;

use crate::app::{AppState, TrendingFocus};
use crate::theme::Theme;
use crate::ui::layout::panel_block;
use crate::ui::{clamp_selection, spinner, stars};

pub fn render_trending(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let [latest_area, top_area] =
        area.layout(&Layout::horizontal([Constraint::Percentage(50), Constraint::Fill(1)]));
    let focus = state.trending_focus;
    let tick = state.tick;

    let latest: Vec<ListItem> = state
        .trending
        .latest()
        .items()
        .iter()
        .map(|r| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("{} ", stars(r.rating)), Style::default().fg(theme.rating)),
                    Span::styled(r.title.clone(), Style::default().fg(theme.title)),
                ]),
                Line::styled(
                    format!("    by {} · {}", r.rated_by, r.rated_at),
                    Style::default().fg(theme.muted),
                ),
            ])
        })
        .collect();

    let top: Vec<ListItem> = state
        .trending
        .top()
        .items()
        .iter()
        .enumerate()
        .map(|(rank, t)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>2}. ", rank + 1), Style::default().fg(theme.muted)),
                Span::styled(t.title.clone(), Style::default().fg(theme.title)),
                Span::styled(format!("  ★ {:.2}", t.average_rating), Style::default().fg(theme.rating)),
                Span::styled(format!(" ({} ratings)", t.rating_count), Style::default().fg(theme.muted)),
            ]))
        })
        .collect();

    // Only the focused feed owns the cursor.
    let mut idle = ListState::default();
    let (latest_list, top_list) = match focus {
        TrendingFocus::Latest => (&mut state.trending_list, &mut idle),
        TrendingFocus::Top => (&mut idle, &mut state.trending_list),
    };

    render_feed(
        frame,
        latest_area,
        Feed { title: "Latest ratings", status: status_of(state.trending.latest()), items: latest },
        latest_list,
        focus == TrendingFocus::Latest,
        tick,
        theme,
    );
    render_feed(
        frame,
        top_area,
        Feed { title: "Top rated", status: status_of(state.trending.top()), items: top },
        top_list,
        focus == TrendingFocus::Top,
        tick,
        theme,
    );
}

struct Feed<'a> {
    title: &'static str,
    status: (bool, Option<String>),
    items: Vec<ListItem<'a>>,
}

fn status_of<T>(feed: &Loadable<T>) -> (bool, Option<String>) {
    (feed.is_loading(), feed.error().map(str::to_owned))
}

fn render_feed(
    frame: &mut Frame,
    area: Rect,
    feed: Feed<'_>,
    list: &mut ListState,
    focused: bool,
    tick: u64,
    theme: &Theme,
) {
    let (loading, error) = feed.status;
    let mut title = vec![Span::raw(format!(" {} ", feed.title))];
    if loading {
        title.push(Span::styled(format!("{} ", spinner(tick)), Style::default().fg(theme.highlight)));
    }
    let block = panel_block(Line::from(title), focused, theme);

    if let Some(error) = error {
        frame.render_widget(
            Paragraph::new(Line::styled(error, Style::default().fg(theme.error))).block(block),
            area,
        );
    } else if feed.items.is_empty() {
        let message = if loading { "Loading..." } else { "Nothing here yet." };
        frame.render_widget(
            Paragraph::new(Line::styled(message, Style::default().fg(theme.muted))).block(block),
            area,
        );
    } else {
        let len = feed.items.len();
        let widget = List::new(feed.items)
            .block(block)
            .highlight_style(Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD))
            .highlight_symbol("▶ ");
        clamp_selection(list, len);
        frame.render_stateful_widget(widget, area, list);
    }
}
