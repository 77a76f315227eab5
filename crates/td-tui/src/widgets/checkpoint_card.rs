//! First-checkpoint review card and the waiting-at-checkpoint banner.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use td_core::types::Investigation;

use crate::app::App;
use crate::checkpoint::ReviewField;

const BODY_PREVIEW_LINES: usize = 6;

/// One-line banner for checkpoints other than the classification review.
pub fn render_banner(frame: &mut Frame, inv: &Investigation, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            " ◆ Waiting at checkpoint ",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            inv.current_checkpoint.clone(),
            Style::default().fg(Color::White),
        ),
        Span::styled("  press a to approve", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Classification review card: ticket context plus the three editable fields.
pub fn render(frame: &mut Frame, app: &App, inv: &Investigation, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Checkpoint: review classification ")
        .border_style(Style::default().fg(Color::Magenta));

    let draft = &app.checkpoint;
    let ticket = app.ticket_data.get(&inv.id);
    let Some(ticket) = ticket.filter(|_| draft.loaded_for == Some(inv.id)) else {
        let waiting = Paragraph::new("Loading ticket data...")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(waiting, area);
        return;
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(4),
            Constraint::Length(ReviewField::ALL.len() as u16 + 2),
        ])
        .split(inner);

    let mut context = vec![
        Line::from(Span::styled(
            format!("Ticket #{}  {}", ticket.ticket_id, ticket.title),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Customer: {}", ticket.customer_name),
            Style::default().fg(Color::Gray),
        )),
    ];
    if let Some(connector) = ticket.connector_name.as_deref().filter(|c| !c.is_empty()) {
        context.push(Line::from(Span::styled(
            format!("Connector: {connector}"),
            Style::default().fg(Color::Gray),
        )));
    }
    context.push(Line::from(""));
    context.extend(
        ticket
            .body
            .lines()
            .take(BODY_PREVIEW_LINES)
            .map(|l| Line::from(l.to_string())),
    );
    frame.render_widget(Paragraph::new(context).wrap(Wrap { trim: false }), rows[0]);

    let mut fields = vec![Line::from("")];
    for field in ReviewField::ALL {
        let focused = field == draft.focus;
        let value = draft.value(field);
        let loaded = match field {
            ReviewField::Classification => &ticket.classification,
            ReviewField::ProductArea => &ticket.product_area,
            ReviewField::Priority => &ticket.priority,
        };
        let marker = if focused { "▶ " } else { "  " };
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let mut spans = vec![
            Span::styled(marker, label_style),
            Span::styled(format!("{:<16}", field.label()), label_style),
            Span::styled(
                if value.is_empty() { "(unset)".to_string() } else { value.to_string() },
                Style::default().fg(Color::White),
            ),
        ];
        if value != loaded.as_str() {
            spans.push(Span::styled(" *", Style::default().fg(Color::LightRed)));
        }
        fields.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(fields), rows[1]);

    if draft.dropdown_open {
        let row = ReviewField::ALL
            .iter()
            .position(|f| *f == draft.focus)
            .unwrap_or(0) as u16;
        render_dropdown(frame, app, rows[1], row + 2);
    }
}

fn render_dropdown(frame: &mut Frame, app: &App, fields_area: Rect, row: u16) {
    let draft = &app.checkpoint;
    let options = draft.focus.options();
    let width = options.iter().map(|o| o.len() as u16).max().unwrap_or(0) + 4;
    let height = options.len() as u16 + 2;

    let frame_area = frame.area();
    let x = fields_area.x + 18;
    let y = (fields_area.y + row).min(frame_area.height.saturating_sub(height));
    let area = Rect {
        x: x.min(frame_area.width.saturating_sub(width)),
        y,
        width: width.min(frame_area.width),
        height: height.min(frame_area.height),
    };

    let items: Vec<ListItem> = options.iter().map(|o| ListItem::new(*o)).collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Yellow)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );
    let mut state = ListState::default();
    state.select(Some(draft.dropdown_index));

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state);
}
