//! Summary tab: investigation summary beside the customer response.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use td_core::types::{CustomerResponse, Investigation, InvestigationSummary};

use crate::app::App;

/// Summary tab: parsed investigation summary above the draft customer
/// response.
pub fn render(frame: &mut Frame, app: &App, inv: &Investigation, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_summary(frame, app.summaries.get(&inv.id), rows[0]);
    render_response(frame, app.responses.get(&inv.id), rows[1]);
}

fn render_summary(frame: &mut Frame, summary: Option<&InvestigationSummary>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Summary ");
    let Some(summary) = summary else {
        let empty = Paragraph::new("No summary yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let mut lines = vec![heading("Root Cause")];
    lines.push(Line::from(if summary.root_cause.is_empty() {
        "(not determined)".to_string()
    } else {
        summary.root_cause.clone()
    }));

    if !summary.key_findings.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Key Findings"));
        for (agent, items) in &summary.key_findings {
            lines.push(Line::from(Span::styled(
                agent.clone(),
                Style::default().fg(Color::Cyan),
            )));
            lines.extend(items.iter().map(|item| Line::from(format!("  • {item}"))));
        }
    }
    push_list(&mut lines, "Open Questions", &summary.open_questions);
    push_list(&mut lines, "Next Steps", &summary.next_steps);

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
    frame.render_widget(paragraph, area);
}

fn render_response(frame: &mut Frame, response: Option<&CustomerResponse>, area: Rect) {
    let Some(response) = response else {
        let empty = Paragraph::new("No customer response drafted")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" Customer Response "));
        frame.render_widget(empty, area);
        return;
    };

    let mut title = vec![
        Span::raw(" Customer Response "),
        Span::styled(
            format!("edited {} ", response.last_edited.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if response.copied {
        title.push(Span::styled("[copied] ", Style::default().fg(Color::Green)));
    }
    if response.posted {
        title.push(Span::styled("[posted] ", Style::default().fg(Color::Green)));
    }

    let lines: Vec<Line> = response
        .content
        .lines()
        .map(|l| Line::from(l.to_string()))
        .collect();
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(Line::from(title)));
    frame.render_widget(paragraph, area);
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

fn push_list(lines: &mut Vec<Line<'static>>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(Line::from(""));
    lines.push(heading(title));
    lines.extend(items.iter().map(|item| Line::from(format!("  • {item}"))));
}
