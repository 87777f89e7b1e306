//! Help overlay renderer for cinelog.
//!
//! Draws a centred modal over the current screen. `Clear` erases the area
//! first so the overlay is drawn in the same `terminal.draw()` pass.

use ratatui::{
    Frame,
    layout::Constraint,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay as a centred modal.
///
/// Skipped on terminals narrower than 60 columns.
///
/// # Arguments
///
/// * `frame` — current render frame provided by `terminal.draw()`
/// * `theme` — active color theme (supplies `border_active` for the modal border)
/// * `help_scroll` — vertical scroll offset; j/k in HelpOverlay mode mutate this field
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 60 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help · j/k scroll, ? or Esc to dismiss ")
        .border_style(ratatui::style::Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Screens"),
        Line::from("  1 / 2 / 3 / 4   Search / My movies / Friends / Trending"),
        Line::from("  Esc             Back"),
        Line::from(""),
        Line::from("Lists"),
        Line::from("  j / k           Move selection down / up"),
        Line::from("  n / p           Next / previous page"),
        Line::from("  s               Cycle sort (original, rating ↑, rating ↓)"),
        Line::from("  Enter           Open movie info, or select a user"),
        Line::from("  Tab             Switch panel (Friends, Trending)"),
        Line::from("  r               Reload the current screen"),
        Line::from(""),
        Line::from("Search"),
        Line::from("  / or i          Start typing; Esc or Enter stops"),
        Line::from(""),
        Line::from("Ratings"),
        Line::from("  a               Rate the selected movie"),
        Line::from("  d               Remove from your list"),
        Line::from("  v               Show / hide the review"),
        Line::from(""),
        Line::from("Friends"),
        Line::from("  f               Follow / unfollow the selected user"),
        Line::from("  o               Open the selected user's full list"),
        Line::from(""),
        Line::from("Account"),
        Line::from("  L / R / O       Sign in / register / sign out"),
        Line::from(""),
        Line::from("General"),
        Line::from("  ?               Open / close this help overlay"),
        Line::from("  q               Quit"),
    ])
}
