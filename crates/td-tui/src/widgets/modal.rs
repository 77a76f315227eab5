//! Overlays for the confirm dialog, the create and reset forms, the reply
//! prompt and the response editor.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tui_textarea::TextArea;

use crate::app::App;
use crate::editor;
use crate::modal::{
    ConfirmDialog, CreateField, CreateForm, Modal, ReplyPrompt, ResetForm, ResponseEditor,
    SKILL_OPTIONS,
};

/// Render the open modal centered over the dashboard.
pub fn render(frame: &mut Frame, app: &App, modal: &Modal) {
    match modal {
        Modal::Confirm(dialog) => render_confirm(frame, dialog),
        Modal::Create(form) => render_create(frame, form),
        Modal::Reset(form) => render_reset(frame, app, form),
        Modal::Reply(prompt) => render_reply(frame, app, prompt),
        Modal::Editing(editing) => render_editor(frame, editing),
    }
}

fn render_confirm(frame: &mut Frame, dialog: &ConfirmDialog) {
    let area = centered_rect(50, 25, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", dialog.prompt()),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.push(status_line(dialog.in_progress, dialog.error.as_deref()));
    lines.push(Line::from(""));
    lines.push(help_line("y / Enter", "Confirm"));
    lines.push(help_line("n / Esc", "Cancel"));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Confirm ")
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(paragraph, area);
}

fn render_create(frame: &mut Frame, form: &CreateForm) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" New Investigation ")
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // ticket
            Constraint::Length(3), // skill
            Constraint::Min(3),    // context
            Constraint::Length(1), // status
        ])
        .split(inner);

    input_box(frame, "Ticket ID", &form.ticket, form.focus == CreateField::Ticket, rows[0]);

    let skill_focused = form.focus == CreateField::Skill;
    let skills: Vec<Span> = SKILL_OPTIONS
        .iter()
        .enumerate()
        .flat_map(|(i, skill)| {
            let style = if i == form.skill_index {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::Gray)
            };
            [Span::styled(format!(" {skill} "), style), Span::raw(" ")]
        })
        .collect();
    let skill_box = Paragraph::new(Line::from(skills)).block(field_block("Skill", skill_focused));
    frame.render_widget(skill_box, rows[1]);

    input_box(frame, "Context", &form.context, form.focus == CreateField::Context, rows[2]);

    frame.render_widget(
        Paragraph::new(status_line(form.in_progress, form.error.as_deref())),
        rows[3],
    );
}

fn render_reset(frame: &mut Frame, app: &App, form: &ResetForm) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);

    let run = app
        .investigation(form.investigation_id)
        .map(|inv| inv.current_run_number)
        .unwrap_or(1);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Reset investigation #{} ", form.investigation_id))
        .border_style(Style::default().fg(Color::LightRed));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    let intro = Paragraph::new(format!(
        "Start run {} from scratch. Agents re-run with the context below.",
        run + 1
    ))
    .wrap(Wrap { trim: true });
    frame.render_widget(intro, rows[0]);
    input_box(frame, "Context", &form.context, true, rows[1]);
    frame.render_widget(
        Paragraph::new(status_line(form.in_progress, form.error.as_deref())),
        rows[2],
    );
}

fn render_reply(frame: &mut Frame, app: &App, prompt: &ReplyPrompt) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);

    let customer = app
        .investigation(prompt.investigation_id)
        .map(|inv| inv.customer_name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("investigation #{}", prompt.investigation_id));
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" New reply from {customer} "))
        .border_style(Style::default().fg(Color::LightMagenta));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    let summary = prompt
        .summary
        .as_deref()
        .unwrap_or("The customer replied on the ticket.");
    frame.render_widget(
        Paragraph::new(summary.to_string()).wrap(Wrap { trim: true }),
        rows[0],
    );
    input_box(frame, "Context for the new run", &prompt.context, true, rows[1]);
    frame.render_widget(
        Paragraph::new(status_line(prompt.in_progress, prompt.error.as_deref())),
        rows[2],
    );
}

fn render_editor(frame: &mut Frame, editing: &ResponseEditor) {
    let area = centered_rect(80, 80, frame.area());
    frame.render_widget(Clear, area);
    input_box(
        frame,
        &format!("Edit response #{}", editing.investigation_id),
        &editing.editor,
        true,
        area,
    );
}

fn input_box(frame: &mut Frame, title: &str, input: &TextArea<'static>, focused: bool, area: Rect) {
    let mut textarea = input.clone();
    textarea.set_block(field_block(title, focused));
    editor::show_cursor(&mut textarea, focused);
    frame.render_widget(&textarea, area);
}

fn field_block(title: &str, focused: bool) -> Block<'static> {
    let color = if focused { Color::Yellow } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "))
        .border_style(Style::default().fg(color))
}

fn status_line(in_progress: bool, error: Option<&str>) -> Line<'static> {
    match (in_progress, error) {
        (true, _) => Line::from(Span::styled(
            "  Working...",
            Style::default().fg(Color::Yellow),
        )),
        (false, Some(err)) => Line::from(Span::styled(
            format!("  {err}"),
            Style::default().fg(Color::Red),
        )),
        (false, None) => Line::from(""),
    }
}

fn help_line(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format!("{:<12}", key),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(desc.to_string()),
    ])
}

/// Create a centered rectangle of the given percentage of the parent.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, parent: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(parent);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
