//! Text areas backing the ticket field, the context boxes and the response
//! editor, built on `tui-textarea`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Color, Modifier, Style};
use tui_textarea::TextArea;

/// Empty text area with a dimmed placeholder.
pub fn text_area(placeholder: &str) -> TextArea<'static> {
    let mut area = TextArea::default();
    area.set_placeholder_text(placeholder);
    area.set_placeholder_style(Style::default().fg(Color::DarkGray));
    area.set_cursor_line_style(Style::default());
    area
}

/// Text area pre-filled with `content`, cursor at the end.
pub fn with_text(placeholder: &str, content: &str) -> TextArea<'static> {
    let mut area = text_area(placeholder);
    area.insert_str(content);
    area
}

/// Full contents, lines joined with `\n`.
pub fn text(area: &TextArea<'_>) -> String {
    area.lines().join("\n")
}

/// Cursor shown only on the focused field.
pub fn show_cursor(area: &mut TextArea<'_>, focused: bool) {
    let style = if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    area.set_cursor_style(style);
}

fn is_line_break(key: &KeyEvent) -> bool {
    key.code == KeyCode::Enter
        || (key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('m') | KeyCode::Char('j')))
}

/// Feed a key to a one-line field holding at most `limit` characters.
/// Line breaks and characters past the limit are dropped.
pub fn input_single_line(area: &mut TextArea<'_>, key: KeyEvent, limit: usize) -> bool {
    if is_line_break(&key) {
        return false;
    }
    let plain_char = matches!(key.code, KeyCode::Char(_))
        && !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    if plain_char && text(area).chars().count() >= limit {
        return false;
    }
    area.input(key)
}
