//! Key routing. Exactly one layer owns each keystroke, checked in this
//! order: checkpoint review, confirm dialog, create form, reset form, reply
//! prompt, response editor, normal navigation.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use td_core::types::InvestigationStatus;

use crate::app::{App, Tab, SCROLL_STEP};
use crate::editor;
use crate::effect::Effect;
use crate::modal::{
    non_empty, ConfirmAction, ConfirmDialog, CreateField, CreateForm, Modal, ReplyPrompt,
    ResetForm, ResponseEditor,
};
use crate::sync;

pub fn handle_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    if key.kind != KeyEventKind::Press {
        return Vec::new();
    }
    if is_ctrl(&key, 'c') {
        app.should_quit = true;
        return Vec::new();
    }
    app.notice = None;

    if app.checkpoint_review_active() {
        return checkpoint_key(app, key);
    }
    match app.modal.take() {
        Some(Modal::Confirm(dialog)) => confirm_key(app, dialog, key),
        Some(Modal::Create(form)) => create_key(app, form, key),
        Some(Modal::Reset(form)) => reset_key(app, form, key),
        Some(Modal::Reply(prompt)) => reply_key(app, prompt, key),
        Some(Modal::Editing(editor)) => editing_key(app, editor, key),
        None => normal_key(app, key),
    }
}

fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

fn is_up(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Up | KeyCode::Char('k'))
}

fn is_down(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Down | KeyCode::Char('j'))
}

fn move_selection(app: &mut App, down: bool) -> Vec<Effect> {
    let last = app.investigations.len().saturating_sub(1);
    let next = if down {
        (app.selected_index + 1).min(last)
    } else {
        app.selected_index.saturating_sub(1)
    };
    if next == app.selected_index || app.investigations.is_empty() {
        return Vec::new();
    }
    app.selected_index = next;
    app.log_scroll = 0;
    app.checkpoint.invalidate();
    match app.selected() {
        Some(inv) => sync::after_selection(inv, app.active_tab),
        None => Vec::new(),
    }
}

fn switch_tab(app: &mut App, tab: Tab) -> Vec<Effect> {
    app.active_tab = tab;
    app.log_scroll = 0;
    match app.selected_id() {
        Some(id) => sync::tab_effects(id, tab),
        None => Vec::new(),
    }
}

fn checkpoint_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    if key.code == KeyCode::Char('q') {
        app.should_quit = true;
        return Vec::new();
    }

    // An open dropdown captures vertical movement before the sidebar does.
    if app.checkpoint.dropdown_open {
        match key.code {
            _ if is_up(&key) => app.checkpoint.dropdown_up(),
            _ if is_down(&key) => app.checkpoint.dropdown_down(),
            KeyCode::Enter => app.checkpoint.pick(),
            KeyCode::Esc => app.checkpoint.dropdown_open = false,
            _ => {}
        }
        return Vec::new();
    }

    match key.code {
        KeyCode::Tab => app.checkpoint.focus = app.checkpoint.focus.next(),
        KeyCode::BackTab => app.checkpoint.focus = app.checkpoint.focus.prev(),
        _ if is_up(&key) => return move_selection(app, false),
        _ if is_down(&key) => return move_selection(app, true),
        KeyCode::Enter => app.checkpoint.open_dropdown(),
        KeyCode::Char('a') => return approve_reviewed(app),
        KeyCode::Char('r') => return vec![Effect::RefreshInvestigations],
        KeyCode::Char('?') => app.show_debug = !app.show_debug,
        _ => {}
    }
    Vec::new()
}

/// Approve from the review card: a direct approval when nothing was edited,
/// otherwise an update whose success carries the approval.
fn approve_reviewed(app: &mut App) -> Vec<Effect> {
    let Some(inv) = app.selected() else {
        return Vec::new();
    };
    let approve = Effect::ApproveCheckpoint {
        investigation_id: inv.id,
        checkpoint: inv.current_checkpoint.clone(),
    };
    // A draft seeded for another investigation is never diffed.
    let fields = if app.checkpoint.loaded_for == Some(inv.id) {
        app.checkpoint.changed_fields(app.ticket_data.get(&inv.id))
    } else {
        Default::default()
    };
    if fields.is_empty() {
        vec![approve]
    } else {
        vec![Effect::UpdateInvestigation {
            investigation_id: inv.id,
            fields,
            then: Some(Box::new(approve)),
        }]
    }
}

fn confirm_key(app: &mut App, mut dialog: ConfirmDialog, key: KeyEvent) -> Vec<Effect> {
    if dialog.in_progress {
        app.modal = Some(Modal::Confirm(dialog));
        return Vec::new();
    }
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            dialog.in_progress = true;
            dialog.error = None;
            let effect = match &dialog.action {
                ConfirmAction::Save { editor } => Effect::SaveResponse {
                    investigation_id: dialog.investigation_id,
                    content: editor::text(editor),
                },
                ConfirmAction::Post => Effect::PostResponse {
                    investigation_id: dialog.investigation_id,
                },
            };
            app.modal = Some(Modal::Confirm(dialog));
            vec![effect]
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            app.modal = match dialog.action {
                ConfirmAction::Save { editor } => Some(Modal::Editing(ResponseEditor {
                    investigation_id: dialog.investigation_id,
                    editor,
                })),
                ConfirmAction::Post => None,
            };
            Vec::new()
        }
        _ => {
            app.modal = Some(Modal::Confirm(dialog));
            Vec::new()
        }
    }
}

fn create_key(app: &mut App, mut form: CreateForm, key: KeyEvent) -> Vec<Effect> {
    if form.in_progress {
        app.modal = Some(Modal::Create(form));
        return Vec::new();
    }
    let mut effects = Vec::new();
    match key.code {
        KeyCode::Esc => return Vec::new(),
        _ if is_ctrl(&key, 's') => effects = submit_create(&mut form),
        KeyCode::Enter if form.focus == CreateField::Skill => form.cycle_skill(),
        KeyCode::Enter => effects = submit_create(&mut form),
        KeyCode::Tab => form.focus = form.focus.next(),
        KeyCode::BackTab => form.focus = form.focus.prev(),
        _ => match form.focus {
            CreateField::Ticket => form.input_ticket(key),
            CreateField::Skill => {
                if matches!(key.code, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) {
                    form.cycle_skill();
                }
            }
            CreateField::Context => {
                form.context.input(key);
            }
        },
    }
    app.modal = Some(Modal::Create(form));
    effects
}

fn submit_create(form: &mut CreateForm) -> Vec<Effect> {
    match form.validated_ticket() {
        Err(msg) => {
            form.error = Some(msg.to_string());
            Vec::new()
        }
        Ok(ticket_id) => {
            form.error = None;
            form.in_progress = true;
            vec![Effect::CreateInvestigation {
                ticket_id,
                skill: form.skill().to_string(),
                context: form.context_value(),
            }]
        }
    }
}

fn reset_key(app: &mut App, mut form: ResetForm, key: KeyEvent) -> Vec<Effect> {
    let mut effects = Vec::new();
    if !form.in_progress {
        match key.code {
            KeyCode::Esc => return Vec::new(),
            KeyCode::Enter => effects = submit_reset(&mut form),
            _ if is_ctrl(&key, 's') => effects = submit_reset(&mut form),
            _ => {
                form.context.input(key);
            }
        }
    }
    app.modal = Some(Modal::Reset(form));
    effects
}

fn submit_reset(form: &mut ResetForm) -> Vec<Effect> {
    form.in_progress = true;
    form.error = None;
    vec![Effect::HardReset {
        investigation_id: form.investigation_id,
        trigger_summary: editor::text(&form.context).trim().to_string(),
    }]
}

fn reply_key(app: &mut App, mut prompt: ReplyPrompt, key: KeyEvent) -> Vec<Effect> {
    let mut effects = Vec::new();
    if !prompt.in_progress {
        let approve = key.code == KeyCode::Enter || is_ctrl(&key, 's');
        if key.code == KeyCode::Esc {
            prompt.in_progress = true;
            prompt.error = None;
            effects.push(Effect::DismissReply {
                investigation_id: prompt.investigation_id,
            });
        } else if approve {
            prompt.in_progress = true;
            prompt.error = None;
            effects.push(Effect::ApproveNewRun {
                investigation_id: prompt.investigation_id,
                trigger_summary: non_empty(&editor::text(&prompt.context)).unwrap_or_default(),
            });
        } else {
            prompt.context.input(key);
        }
    }
    app.modal = Some(Modal::Reply(prompt));
    effects
}

fn editing_key(app: &mut App, mut editing: ResponseEditor, key: KeyEvent) -> Vec<Effect> {
    if is_ctrl(&key, 's') {
        app.modal = Some(Modal::Confirm(ConfirmDialog::save(
            editing.investigation_id,
            editing.editor,
        )));
    } else if key.code == KeyCode::Esc {
        app.modal = None;
    } else {
        editing.editor.input(key);
        app.modal = Some(Modal::Editing(editing));
    }
    Vec::new()
}

fn normal_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    let on_summary = app.active_tab == Tab::Summary;
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        _ if is_up(&key) => return move_selection(app, false),
        _ if is_down(&key) => return move_selection(app, true),
        KeyCode::Char('r') => return vec![Effect::RefreshInvestigations],
        KeyCode::Char('a') => {
            if let Some(inv) = app.selected().filter(|inv| inv.has_checkpoint()) {
                return vec![Effect::ApproveCheckpoint {
                    investigation_id: inv.id,
                    checkpoint: inv.current_checkpoint.clone(),
                }];
            }
        }
        KeyCode::Char(c @ '1'..='5') => {
            if let Some(tab) = Tab::from_digit(c) {
                return switch_tab(app, tab);
            }
        }
        KeyCode::Tab => {
            let tab = app.active_tab.next();
            return switch_tab(app, tab);
        }
        KeyCode::PageUp if app.layout.is_some() => {
            app.log_scroll = app.log_scroll.saturating_add(SCROLL_STEP);
        }
        KeyCode::PageDown if app.layout.is_some() => {
            app.log_scroll = app.log_scroll.saturating_sub(SCROLL_STEP);
        }
        KeyCode::Char('e') if on_summary => {
            if let Some(id) = app.selected_id() {
                if let Some(response) = app.responses.get(&id) {
                    app.modal = Some(Modal::Editing(ResponseEditor::new(id, &response.content)));
                }
            }
        }
        KeyCode::Char('c') if on_summary => {
            if let Some(id) = app.selected_id() {
                if let Some(response) = app.responses.get(&id) {
                    return vec![Effect::CopyResponse {
                        investigation_id: id,
                        content: response.content.clone(),
                    }];
                }
            }
        }
        KeyCode::Char('p') if on_summary => {
            if let Some(id) = app.selected_id() {
                if app.responses.get(&id).is_some_and(|r| !r.posted) {
                    app.modal = Some(Modal::Confirm(ConfirmDialog::post(id)));
                }
            }
        }
        KeyCode::Char('R') => {
            if let Some(inv) = app
                .selected()
                .filter(|inv| inv.status != InvestigationStatus::Running)
            {
                app.modal = Some(Modal::Reset(ResetForm::new(inv.id)));
            }
        }
        KeyCode::Char('n') => app.modal = Some(Modal::Create(CreateForm::default())),
        KeyCode::Char('?') => app.show_debug = !app.show_debug,
        _ => {}
    }
    Vec::new()
}
