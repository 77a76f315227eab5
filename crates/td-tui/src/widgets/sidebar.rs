//! Investigation list with status, run and checkpoint markers.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use td_core::types::{Investigation, InvestigationStatus};

use crate::app::App;

/// Investigation list; the selected row is highlighted and kept in view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app.investigations.iter().map(item).collect();

    let title = format!(" Investigations ({}) ", app.investigations.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    if !app.investigations.is_empty() {
        state.select(Some(app.selected_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn item(inv: &Investigation) -> ListItem<'static> {
    let customer = if inv.customer_name.is_empty() {
        "Unknown customer".to_string()
    } else {
        inv.customer_name.clone()
    };

    let mut first = vec![
        Span::styled(
            format!("#{} ", inv.id),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(customer),
    ];
    if inv.has_new_reply {
        first.push(Span::styled(
            " ✉",
            Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD),
        ));
    }

    let mut second = vec![
        Span::raw("  "),
        Span::styled(inv.status.as_str(), status_style(inv.status)),
    ];
    if inv.current_run_number > 1 {
        second.push(Span::styled(
            format!(" run {}", inv.current_run_number),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if inv.has_checkpoint() {
        second.push(Span::styled(
            " ◆ checkpoint",
            Style::default().fg(Color::Magenta),
        ));
    }
    if !inv.classification.is_empty() {
        second.push(Span::styled(
            format!("  {}", inv.classification),
            Style::default().fg(Color::Gray),
        ));
    }

    ListItem::new(vec![Line::from(first), Line::from(second)])
}

pub(crate) fn status_style(status: InvestigationStatus) -> Style {
    let color = match status {
        InvestigationStatus::Pending => Color::DarkGray,
        InvestigationStatus::Running => Color::Yellow,
        InvestigationStatus::Waiting => Color::Magenta,
        InvestigationStatus::Complete => Color::Green,
        InvestigationStatus::Error => Color::Red,
    };
    Style::default().fg(color)
}
