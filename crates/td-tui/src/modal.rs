//! Mutually exclusive interaction modes. At most one is held in
//! [`App::modal`](crate::app::App::modal); checkpoint review is derived from
//! the selected investigation and only engages while this slot is empty.

use crossterm::event::KeyEvent;
use td_core::types::InvestigationId;

use tui_textarea::TextArea;

use crate::editor;

pub const SKILL_OPTIONS: &[&str] = &["troubleshoot", "feature-request", "kb-article", "research"];

pub const TICKET_ID_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub enum Modal {
    Confirm(ConfirmDialog),
    Create(CreateForm),
    Reset(ResetForm),
    Reply(ReplyPrompt),
    Editing(ResponseEditor),
}

impl Modal {
    pub fn name(&self) -> &'static str {
        match self {
            Modal::Confirm(_) => "confirm",
            Modal::Create(_) => "create",
            Modal::Reset(_) => "reset",
            Modal::Reply(_) => "reply",
            Modal::Editing(_) => "editing",
        }
    }
}

#[derive(Debug, Clone)]
pub enum ConfirmAction {
    /// Saving keeps the editor so cancelling resumes editing.
    Save { editor: TextArea<'static> },
    Post,
}

#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    pub investigation_id: InvestigationId,
    pub action: ConfirmAction,
    pub in_progress: bool,
    pub error: Option<String>,
}

impl ConfirmDialog {
    pub fn save(investigation_id: InvestigationId, editor: TextArea<'static>) -> Self {
        Self {
            investigation_id,
            action: ConfirmAction::Save { editor },
            in_progress: false,
            error: None,
        }
    }

    pub fn post(investigation_id: InvestigationId) -> Self {
        Self {
            investigation_id,
            action: ConfirmAction::Post,
            in_progress: false,
            error: None,
        }
    }

    pub fn prompt(&self) -> String {
        match self.action {
            ConfirmAction::Save { .. } => "Save changes to customer response?".to_string(),
            ConfirmAction::Post => {
                format!("Post response to Pylon ticket #{}?", self.investigation_id)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreateField {
    #[default]
    Ticket,
    Skill,
    Context,
}

impl CreateField {
    pub fn next(self) -> Self {
        match self {
            CreateField::Ticket => CreateField::Skill,
            CreateField::Skill => CreateField::Context,
            CreateField::Context => CreateField::Ticket,
        }
    }

    pub fn prev(self) -> Self {
        self.next().next()
    }
}

#[derive(Debug, Clone)]
pub struct CreateForm {
    pub focus: CreateField,
    pub ticket: TextArea<'static>,
    pub skill_index: usize,
    pub context: TextArea<'static>,
    pub error: Option<String>,
    pub in_progress: bool,
}

impl Default for CreateForm {
    fn default() -> Self {
        Self {
            focus: CreateField::Ticket,
            ticket: editor::text_area("Pylon ticket ID (e.g., 8314)"),
            skill_index: 0,
            context: editor::text_area("Optional context or file paths..."),
            error: None,
            in_progress: false,
        }
    }
}

impl CreateForm {
    pub fn skill(&self) -> &'static str {
        SKILL_OPTIONS[self.skill_index % SKILL_OPTIONS.len()]
    }

    pub fn cycle_skill(&mut self) {
        self.skill_index = (self.skill_index + 1) % SKILL_OPTIONS.len();
    }

    /// Trimmed, numeric ticket id or the inline error to show.
    pub fn validated_ticket(&self) -> Result<String, &'static str> {
        let ticket = editor::text(&self.ticket);
        let ticket = ticket.trim();
        if ticket.is_empty() {
            return Err("Ticket ID is required");
        }
        if ticket.parse::<u64>().is_err() {
            return Err("Ticket ID must be a number");
        }
        Ok(ticket.to_string())
    }

    /// Edit the ticket field, capped at [`TICKET_ID_LIMIT`] characters.
    pub fn input_ticket(&mut self, key: KeyEvent) {
        editor::input_single_line(&mut self.ticket, key, TICKET_ID_LIMIT);
    }

    pub fn context_value(&self) -> Option<String> {
        non_empty(&editor::text(&self.context))
    }
}

#[derive(Debug, Clone)]
pub struct ResetForm {
    pub investigation_id: InvestigationId,
    pub context: TextArea<'static>,
    pub error: Option<String>,
    pub in_progress: bool,
}

impl ResetForm {
    pub fn new(investigation_id: InvestigationId) -> Self {
        Self {
            investigation_id,
            context: editor::text_area("Additional context for the new run (optional)..."),
            error: None,
            in_progress: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReplyPrompt {
    pub investigation_id: InvestigationId,
    pub summary: Option<String>,
    pub context: TextArea<'static>,
    pub error: Option<String>,
    pub in_progress: bool,
}

impl ReplyPrompt {
    pub fn new(investigation_id: InvestigationId, summary: Option<String>) -> Self {
        Self {
            investigation_id,
            summary,
            context: editor::text_area("Additional context (optional)..."),
            error: None,
            in_progress: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResponseEditor {
    pub investigation_id: InvestigationId,
    pub editor: TextArea<'static>,
}

impl ResponseEditor {
    pub fn new(investigation_id: InvestigationId, content: &str) -> Self {
        Self {
            investigation_id,
            editor: editor::with_text("Customer response...", content),
        }
    }
}

pub(crate) fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
