//! Dashboard internals for the `?` debug toggle.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;

/// Side panel of dashboard internals, shown on wide terminals.
pub fn render_panel(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = rows(app)
        .into_iter()
        .map(|(k, v)| {
            Line::from(vec![
                Span::styled(format!("{k:<12}"), Style::default().fg(Color::DarkGray)),
                Span::raw(v),
            ])
        })
        .collect();

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Debug ")
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(panel, area);
}

/// Single-line variant for narrow terminals.
pub fn render_compact(frame: &mut Frame, app: &App, area: Rect) {
    let text = rows(app)
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(" ");
    let bar = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(bar, area);
}

fn rows(app: &App) -> Vec<(&'static str, String)> {
    let layout = match app.layout {
        Some(l) => format!(
            "{}/{}/{}/{}",
            l.sidebar_width, l.content_width, l.findings_height, l.terminal_height
        ),
        None => "-".into(),
    };
    let selected = app.selected();
    let agents = selected
        .and_then(|inv| app.agents.get(&inv.id))
        .map(|m| {
            m.values()
                .map(|a| format!("{}:{}", a.name, a.status))
                .collect::<Vec<_>>()
                .join(",")
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "-".into());
    let or_dash = |v: Option<String>| v.unwrap_or_else(|| "-".into());

    vec![
        ("version", env!("CARGO_PKG_VERSION").to_string()),
        ("size", format!("{}x{}", app.width, app.height)),
        ("layout", layout),
        (
            "counts",
            format!("{} inv / {} maps", app.investigations.len(), app.agents.len()),
        ),
        ("selected", or_dash(selected.map(|inv| inv.id.to_string()))),
        ("status", or_dash(selected.map(|inv| inv.status.as_str().to_string()))),
        (
            "checkpoint",
            or_dash(
                selected
                    .map(|inv| inv.current_checkpoint.clone())
                    .filter(|c| !c.is_empty()),
            ),
        ),
        ("run", or_dash(selected.map(|inv| inv.current_run_number.to_string()))),
        ("tab", app.active_tab.title().to_string()),
        (
            "modal",
            app.modal.as_ref().map(|m| m.name()).unwrap_or("-").to_string(),
        ),
        ("review", app.checkpoint_review_active().to_string()),
        ("draft", or_dash(app.checkpoint.loaded_for.map(|id| id.to_string()))),
        ("agents", agents),
        ("scroll", app.log_scroll.to_string()),
        ("loading", app.loading.to_string()),
    ]
}
