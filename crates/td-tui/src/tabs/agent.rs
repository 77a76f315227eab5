//! Per-agent tab: header, findings and the log terminal.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use td_core::types::{AgentState, Investigation, InvestigationStatus, LogEntry};

use crate::app::App;
use crate::ui::glyph_style;

/// Agent tab: header, findings and the tail of the agent's log. Without a
/// status row for the agent, falls back to the combined phase-one findings
/// or a "not started" placeholder.
pub fn render(frame: &mut Frame, app: &App, inv: &Investigation, agent: &str, area: Rect) {
    if let Some(state) = app.agent_state(inv.id, agent) {
        render_agent(frame, app, state, area);
        return;
    }

    if app.loading {
        placeholder(frame, &format!("Loading {agent} agent data..."), area);
        return;
    }

    let phase1_applies = matches!(
        inv.status,
        InvestigationStatus::Complete | InvestigationStatus::Waiting
    );
    if let Some(content) = app
        .phase1_findings
        .get(&inv.id)
        .filter(|_| phase1_applies)
    {
        let lines: Vec<Line> = content.lines().map(markdown_line).collect();
        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(" Context findings "));
        frame.render_widget(paragraph, area);
        return;
    }

    placeholder(frame, &format!("Agent {agent} has not started yet"), area);
}

fn render_agent(frame: &mut Frame, app: &App, state: &AgentState, area: Rect) {
    let findings_height = app
        .layout
        .map(|l| l.findings_height.max(3))
        .unwrap_or(area.height * 2 / 5);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(findings_height),
            Constraint::Min(3),
        ])
        .split(area);

    render_header(frame, state, rows[0]);
    render_findings(frame, state, rows[1]);
    render_logs(frame, app.log_scroll, &state.logs, rows[2]);
}

fn render_header(frame: &mut Frame, state: &AgentState, area: Rect) {
    let mut spans = vec![
        Span::styled(state.status.glyph(), glyph_style(state.status)),
        Span::raw(" "),
        Span::styled(
            state.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", state.status),
            Style::default().fg(Color::Gray),
        ),
    ];
    if let Some(pid) = state.pid {
        spans.push(Span::styled(
            format!("  pid {pid}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if let Some(runtime) = state.runtime {
        let secs = runtime.num_seconds().max(0);
        spans.push(Span::styled(
            format!("  {}m{:02}s", secs / 60, secs % 60),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_findings(frame: &mut Frame, state: &AgentState, area: Rect) {
    let mut lines = Vec::new();
    if state.findings.is_empty() {
        lines.push(Line::from(Span::styled(
            "No findings yet",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for finding in &state.findings {
        lines.push(Line::from(Span::styled(
            finding.title.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        lines.extend(
            finding
                .details
                .iter()
                .map(|d| Line::from(format!("  • {d}"))),
        );
    }
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Findings ({}) ", state.findings.len())),
        );
    frame.render_widget(paragraph, area);
}

fn render_logs(frame: &mut Frame, scroll: u16, logs: &[LogEntry], area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let window = log_window(logs.len(), visible, scroll as usize);

    let lines: Vec<Line> = logs[window].iter().map(log_line).collect();
    let title = if scroll > 0 {
        format!(" Terminal (scrolled {scroll}) ")
    } else {
        " Terminal ".to_string()
    };
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(paragraph, area);
}

/// Range of `total` log lines to show in `visible` rows, `scroll` lines up
/// from the newest. Scrolling past the oldest line pins to the top.
pub(crate) fn log_window(total: usize, visible: usize, scroll: usize) -> std::ops::Range<usize> {
    let max_scroll = total.saturating_sub(visible);
    let end = total - scroll.min(max_scroll);
    end.saturating_sub(visible)..end
}

fn log_line(entry: &LogEntry) -> Line<'static> {
    let ts = entry
        .timestamp
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".into());
    let level_color = match entry.level.as_str() {
        "error" => Color::Red,
        "warn" | "warning" => Color::Yellow,
        "debug" => Color::DarkGray,
        _ => Color::Green,
    };
    Line::from(vec![
        Span::styled(format!("{ts} "), Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("{:<5} ", entry.level),
            Style::default().fg(level_color),
        ),
        Span::raw(entry.message.clone()),
    ])
}

fn markdown_line(line: &str) -> Line<'static> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        Line::from(Span::styled(
            trimmed.trim_start_matches('#').trim().to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(line.to_string())
    }
}

fn placeholder(frame: &mut Frame, text: &str, area: Rect) {
    let paragraph = Paragraph::new(text.to_string())
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_window_follows_newest_by_default() {
        assert_eq!(log_window(50, 10, 0), 40..50);
    }

    #[test]
    fn log_window_clamps_scroll_to_oldest() {
        assert_eq!(log_window(50, 10, 5), 35..45);
        assert_eq!(log_window(50, 10, 500), 0..10);
    }

    #[test]
    fn log_window_short_buffer_shows_everything() {
        assert_eq!(log_window(3, 10, 7), 0..3);
    }
}
