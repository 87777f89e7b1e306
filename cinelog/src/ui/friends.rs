//! Friends screen: user search, the viewer's followees, and the selected
//! user's list with a follow/unfollow control.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};

use cinelog_core::User;

use crate::app::{AppState, FriendsFocus, Mode};
use crate::theme::Theme;
use crate::ui::layout::{panel_block, render_input};
use crate::ui::movie_list::{render_rated_list, RatedList};
use crate::ui::{clamp_selection, spinner};

/// Renders the friends screen into `area`.
///
/// Left column: search box, search results, followees. Right column: the
/// selected user's follow control above their list.
pub fn render_friends(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let [left, right] =
        area.layout(&Layout::horizontal([Constraint::Percentage(40), Constraint::Fill(1)]));
    let [input_area, results_area, following_area] = left.layout(&Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ]));
    let [control_area, movies_area] =
        right.layout(&Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]));

    let focus = state.friends_focus;
    let normal = state.mode == Mode::Normal;
    let loading = state.friends.pipeline().is_loading().then(|| spinner(state.tick));
    render_input(
        frame,
        input_area,
        "Find users",
        &state.friends_input,
        state.mode == Mode::Insert,
        loading,
        theme,
    );

    render_results(frame, results_area, state, normal && focus == FriendsFocus::Results, theme);
    render_following(frame, following_area, state, normal && focus == FriendsFocus::Following, theme);
    render_follow_control(frame, control_area, state, theme);

    let Some(selected) = state.friends.selected().cloned() else {
        let block = panel_block(" Movies ", false, theme);
        let hint = Line::styled("Select a user with Enter.", Style::default().fg(theme.muted));
        frame.render_widget(Paragraph::new(hint).block(block), movies_area);
        return;
    };
    let title = if state.friends.selected_is_viewer() {
        "My movies".to_owned()
    } else {
        format!("{}'s movies", selected.username)
    };
    let tick = state.tick;
    render_rated_list(
        frame,
        movies_area,
        RatedList {
            view: state.friends.movies(),
            list: &mut state.friends_movies,
            title,
            hints: "o open · v review",
            focused: normal && focus == FriendsFocus::Movies,
            tick,
        },
        theme,
    );
}

fn render_results(frame: &mut Frame, area: Rect, state: &mut AppState, focused: bool, theme: &Theme) {
    let block = panel_block(" Users ", focused, theme);
    let pipeline = state.friends.pipeline();
    let results = state.friends.results();

    if let Some(error) = pipeline.error() {
        let line = Line::styled(error.to_owned(), Style::default().fg(theme.error));
        frame.render_widget(Paragraph::new(line).block(block), area);
    } else if results.is_empty() {
        let message = if !state.session.is_authenticated() {
            "Sign in to search users."
        } else if pipeline.searched() && !pipeline.is_loading() {
            "No users found."
        } else {
            "Type at least 2 characters."
        };
        let line = Line::styled(message, Style::default().fg(theme.muted));
        frame.render_widget(Paragraph::new(line).block(block), area);
    } else {
        let items: Vec<ListItem> =
            results.iter().map(|u| user_item(u, state.friends.follow().is_following(u.id), theme)).collect();
        let len = items.len();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD))
            .highlight_symbol("▶ ");
        clamp_selection(&mut state.friends_results, len);
        frame.render_stateful_widget(list, area, &mut state.friends_results);
    }
}

fn render_following(frame: &mut Frame, area: Rect, state: &mut AppState, focused: bool, theme: &Theme) {
    let follow = state.friends.follow();
    let mut title = vec![Span::raw(format!(" Following ({}) ", follow.following().len()))];
    if follow.is_loading() {
        title.push(Span::styled(format!("{} ", spinner(state.tick)), Style::default().fg(theme.highlight)));
    }
    let block = panel_block(Line::from(title), focused, theme);

    if let Some(error) = follow.error() {
        let line = Line::styled(error.to_owned(), Style::default().fg(theme.error));
        frame.render_widget(Paragraph::new(line).block(block), area);
    } else if follow.following().is_empty() {
        let line = Line::styled("Not following anyone yet.", Style::default().fg(theme.muted));
        frame.render_widget(Paragraph::new(line).block(block), area);
    } else {
        let items: Vec<ListItem> = follow.following().iter().map(|u| user_item(u, true, theme)).collect();
        let len = items.len();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD))
            .highlight_symbol("▶ ");
        clamp_selection(&mut state.friends_following, len);
        frame.render_stateful_widget(list, area, &mut state.friends_following);
    }
}

/// `@name  [ Following ]  f toggle`, or a muted label for the viewer.
fn render_follow_control(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let block = panel_block(" Profile ", false, theme);
    let Some(user) = state.friends.selected() else {
        frame.render_widget(block, area);
        return;
    };

    let mut spans = vec![Span::styled(
        format!("@{}  ", user.username),
        Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
    )];
    if state.friends.selected_is_viewer() {
        spans.push(Span::styled("this is you", Style::default().fg(theme.muted)));
    } else if state.session.is_authenticated() {
        let (label, fg) = if state.friends.selected_is_followed() {
            ("[ Following ]", theme.following)
        } else {
            ("[ Follow ]", theme.highlight)
        };
        spans.push(Span::styled(label, Style::default().fg(fg)));
        if state.friends.can_follow_selected() {
            spans.push(Span::styled("  f toggle", Style::default().fg(theme.muted)));
        } else {
            spans.push(Span::styled(format!("  {}", spinner(state.tick)), Style::default().fg(theme.muted)));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn user_item(user: &User, following: bool, theme: &Theme) -> ListItem<'static> {
    let mut spans = vec![Span::styled(user.username.clone(), Style::default().fg(theme.title))];
    if following {
        spans.push(Span::styled("  ✓", Style::default().fg(theme.following)));
    }
    ListItem::new(Line::from(spans))
}
