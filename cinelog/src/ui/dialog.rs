//! Modal dialogs: login/register and the rating form.
//!
//! Drawn after everything else with `Clear` underneath, the same way the help
//! overlay is.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use cinelog_core::view::rating::RatingForm;

use crate::app::{AppState, AuthForm, AuthKind, Dialog, RatingField};
use crate::theme::Theme;
use crate::ui::{spinner, stars};

pub fn render_dialog(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let Some(dialog) = state.dialog.as_ref() else {
        return;
    };
    let area = frame.area().centered(Constraint::Max(64), Constraint::Max(14));
    frame.render_widget(Clear, area);

    match dialog {
        Dialog::Auth(form) => render_auth(frame, area, form, state.tick, theme),
        Dialog::Rating { form, field } => render_rating(frame, area, form, *field, state.tick, theme),
    }
}

fn dialog_block(title: &str, theme: &Theme) -> Block<'static> {
    Block::bordered()
        .title(format!(" {title} "))
        .title_bottom(" Tab next field · Enter submit · Esc cancel ")
        .border_style(Style::default().fg(theme.border_active))
}

fn render_auth(frame: &mut Frame, area: Rect, form: &AuthForm, tick: u64, theme: &Theme) {
    let title = match form.kind {
        AuthKind::Login => "Sign in",
        AuthKind::Register => "Create account",
    };
    let mut lines = Vec::new();
    for (index, label) in form.labels().iter().enumerate() {
        let value = form.value(index);
        let shown = if form.is_secret(index) { "•".repeat(value.chars().count()) } else { value.to_owned() };
        let active = index == form.field;
        let label_style = if active {
            Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{label:<10}"), label_style),
            Span::raw(shown),
            Span::raw(if active { "▏" } else { "" }),
        ]));
        lines.push(Line::raw(""));
    }
    push_feedback(&mut lines, form.submitting, form.error.as_deref(), tick, theme);

    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(dialog_block(title, theme)).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_rating(
    frame: &mut Frame,
    area: Rect,
    form: &RatingForm,
    field: RatingField,
    tick: u64,
    theme: &Theme,
) {
    let title = form.movie().map(|m| m.primary_title.as_str()).unwrap_or("Rate movie");
    let focus_style = |active: bool| {
        if active {
            Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.muted)
        }
    };
    let rating = (form.rating() > 0.0).then_some(form.rating());

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Rating    ", focus_style(field == RatingField::Rating)),
            Span::styled(stars(rating), Style::default().fg(theme.rating)),
            Span::styled(format!("  {:.1}  ←/→", form.rating()), Style::default().fg(theme.muted)),
        ]),
        Line::raw(""),
        Line::styled("Review", focus_style(field == RatingField::Review)),
    ];
    for (i, line) in form.review().split('\n').enumerate() {
        let cursor = field == RatingField::Review && i == form.review().split('\n').count() - 1;
        lines.push(Line::from(vec![
            Span::raw(format!("  {line}")),
            Span::raw(if cursor { "▏" } else { "" }),
        ]));
    }
    lines.push(Line::raw(""));
    push_feedback(&mut lines, form.is_submitting(), form.error(), tick, theme);

    frame.render_widget(
        Paragraph::new(Text::from(lines)).block(dialog_block(title, theme)).wrap(Wrap { trim: false }),
        area,
    );
}

fn push_feedback(lines: &mut Vec<Line<'static>>, submitting: bool, error: Option<&str>, tick: u64, theme: &Theme) {
    if submitting {
        lines.push(Line::styled(format!("{} Sending...", spinner(tick)), Style::default().fg(theme.highlight)));
    } else if let Some(error) = error {
        lines.push(Line::styled(error.to_owned(), Style::default().fg(theme.error)));
    }
}
