//! Top-level frame layout.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use td_core::types::{AgentStatus, Investigation};

use crate::app::{App, Tab};
use crate::tabs;
use crate::widgets::{checkpoint_card, debug_overlay, modal, sidebar, status_bar};

const DEBUG_PANEL_WIDTH: u16 = 40;

/// Master render function: title, sidebar + content, action bar, overlays.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Min(0),    // main
            Constraint::Length(1), // action bar
        ])
        .split(frame.area());

    render_title(frame, chunks[0]);

    if let Some(error) = &app.error {
        render_error(frame, &error.message, chunks[1]);
    } else {
        render_main(frame, app, chunks[1]);
    }
    status_bar::render(frame, app, chunks[2]);

    if let Some(m) = &app.modal {
        modal::render(frame, app, m);
    }
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        " Support Triage ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, area);
}

fn render_error(frame: &mut Frame, error: &str, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "Error",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(error.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press r to retry, q to quit.",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Red)));
    frame.render_widget(paragraph, area);
}

fn render_main(frame: &mut Frame, app: &App, area: Rect) {
    let mut area = area;
    if app.show_debug && area.width < 100 {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);
        debug_overlay::render_compact(frame, app, rows[0]);
        area = rows[1];
    }

    let sidebar_width = app
        .layout
        .map(|l| l.sidebar_width)
        .unwrap_or_else(|| (area.width / 3).max(40))
        .min(area.width);
    let debug_width = if app.show_debug && area.width >= 100 {
        DEBUG_PANEL_WIDTH
    } else {
        0
    };
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(sidebar_width),
            Constraint::Min(0),
            Constraint::Length(debug_width),
        ])
        .split(area);

    sidebar::render(frame, app, columns[0]);
    render_content(frame, app, columns[1]);
    if debug_width > 0 {
        debug_overlay::render_panel(frame, app, columns[2]);
    }
}

fn render_content(frame: &mut Frame, app: &App, area: Rect) {
    let Some(inv) = app.selected() else {
        let text = if app.loading {
            "Loading investigations..."
        } else {
            "No investigation selected"
        };
        let placeholder = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(placeholder, area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);
    render_tab_bar(frame, app, inv, rows[0]);

    if inv.at_first_checkpoint() {
        checkpoint_card::render(frame, app, inv, rows[1]);
        return;
    }

    let mut body = rows[1];
    if inv.has_checkpoint() {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(body);
        checkpoint_card::render_banner(frame, inv, split[0]);
        body = split[1];
    }

    match app.active_tab.agent() {
        Some(agent) => tabs::agent::render(frame, app, inv, agent, body),
        None => tabs::summary::render(frame, app, inv, body),
    }
}

fn render_tab_bar(frame: &mut Frame, app: &App, inv: &Investigation, area: Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let mut spans = vec![
                Span::styled(
                    format!("{}", i + 1),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(":"),
                Span::raw(tab.title()),
            ];
            if let Some(status) = tab.agent().and_then(|a| inv.agent_statuses.get(a)) {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(status.glyph(), glyph_style(*status)));
            }
            Line::from(spans)
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::BOTTOM))
        .select(app.active_tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw(" | "));

    frame.render_widget(tabs, area);
}

pub(crate) fn glyph_style(status: AgentStatus) -> Style {
    let color = match status {
        AgentStatus::Pending => Color::DarkGray,
        AgentStatus::Running => Color::Yellow,
        AgentStatus::Completed => Color::Green,
        AgentStatus::Error => Color::Red,
        AgentStatus::Checkpoint => Color::Magenta,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}
