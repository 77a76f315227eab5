//! Bottom action bar: mode-specific key hints and transient notices.

use chrono::Local;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Tab};
use crate::modal::{CreateField, Modal};

/// Render the bottom action bar: key hints for the current mode on the
/// left, the latest notice (or the clock) on the right.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let left = hint_spans(&hints(app));

    let (right_text, right_style) = match &app.notice {
        Some(notice) => (notice.clone(), Style::default().fg(Color::LightGreen)),
        None => (
            Local::now().format("%H:%M:%S").to_string(),
            Style::default().fg(Color::Gray),
        ),
    };

    let left_len: usize = left.iter().map(|s| s.content.width()).sum();
    let total_width = area.width as usize;
    let padding = if total_width > left_len + right_text.width() {
        total_width - left_len - right_text.width()
    } else {
        1
    };

    let mut spans = left;
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(right_text, right_style));

    let bar = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(bar, area);
}

/// `(key, label)` pairs valid in the current input mode.
pub fn hints(app: &App) -> Vec<(&'static str, &'static str)> {
    if app.error.is_some() && app.modal.is_none() {
        return vec![("r", "Retry"), ("q", "Quit")];
    }

    match &app.modal {
        Some(Modal::Confirm(_)) => return vec![("y", "Yes"), ("n", "No")],
        Some(Modal::Create(form)) => {
            let enter = if form.focus == CreateField::Skill {
                "Cycle skill"
            } else {
                "Create"
            };
            return vec![
                ("Tab", "Next field"),
                ("Enter", enter),
                ("Ctrl-s", "Create"),
                ("Esc", "Cancel"),
            ];
        }
        Some(Modal::Reset(_)) => return vec![("Enter", "Reset"), ("Esc", "Cancel")],
        Some(Modal::Reply(_)) => return vec![("Enter", "Start new run"), ("Esc", "Dismiss")],
        Some(Modal::Editing(_)) => return vec![("Ctrl-s", "Save"), ("Esc", "Cancel")],
        None => {}
    }

    if app.checkpoint_review_active() {
        if app.checkpoint.dropdown_open {
            return vec![("↑↓", "Select"), ("Enter", "Choose"), ("Esc", "Close")];
        }
        return vec![
            ("Tab", "Field"),
            ("Enter", "Change"),
            ("a", "Approve"),
            ("r", "Refresh"),
            ("q", "Quit"),
        ];
    }

    let mut keys = vec![("↑↓", "Select"), ("1-5", "Tab")];
    let selected = app.selected();
    if selected.is_some_and(|inv| inv.has_checkpoint()) {
        keys.push(("a", "Approve"));
    }
    if app.active_tab == Tab::Summary {
        keys.push(("e", "Edit"));
        keys.push(("c", "Copy"));
        let posted = selected
            .and_then(|inv| app.responses.get(&inv.id))
            .is_some_and(|r| r.posted);
        if !posted {
            keys.push(("p", "Post"));
        }
    } else if app.layout.is_some() {
        keys.push(("PgUp/PgDn", "Scroll"));
    }
    keys.extend([("n", "New"), ("R", "Reset"), ("r", "Refresh"), ("q", "Quit")]);
    keys
}

fn hint_spans(hints: &[(&'static str, &'static str)]) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, label) in hints {
        spans.push(Span::styled(
            format!("[{key}]"),
            Style::default().fg(Color::Yellow),
        ));
        spans.push(Span::raw(format!(" {label}  ")));
    }
    spans
}
