//! Everything the reducer consumes: operator input, the timer, and one
//! completion message per effect.
//!
//! Read-only loads report failure through [`Message::Failed`]; actions whose
//! errors belong to a modal carry their own `Result`.

use crossterm::event::KeyEvent;
use td_core::types::{
    AgentState, CustomerResponse, Finding, Investigation, InvestigationId, InvestigationSummary,
    LogEntry, TicketData,
};

use crate::effect::Effect;
use crate::error::EffectError;

#[derive(Debug)]
pub enum Message {
    Key(KeyEvent),
    Resize {
        width: u16,
        height: u16,
    },
    Tick,

    InvestigationsLoaded(Vec<Investigation>),
    /// Result of an operator-issued refresh.
    InvestigationsRefreshed(Vec<Investigation>),
    AgentStatusesLoaded {
        investigation_id: InvestigationId,
        agents: Vec<AgentState>,
    },
    AgentLogsLoaded {
        investigation_id: InvestigationId,
        agent: String,
        logs: Vec<LogEntry>,
    },
    AgentFindingsLoaded {
        investigation_id: InvestigationId,
        agent: String,
        findings: Vec<Finding>,
    },
    SummaryLoaded {
        investigation_id: InvestigationId,
        summary: Option<InvestigationSummary>,
    },
    CustomerResponseLoaded {
        investigation_id: InvestigationId,
        response: Option<CustomerResponse>,
    },
    TicketDataLoaded {
        investigation_id: InvestigationId,
        data: Option<TicketData>,
    },
    Phase1FindingsLoaded {
        investigation_id: InvestigationId,
        content: Option<String>,
    },

    CheckpointApproved {
        investigation_id: InvestigationId,
    },
    /// Second half of an update-then-approve chain travels in `next`.
    InvestigationUpdated {
        investigation_id: InvestigationId,
        next: Option<Box<Effect>>,
    },
    InvestigationCreated(Result<(), EffectError>),
    InvestigationReset {
        investigation_id: InvestigationId,
        result: Result<u32, EffectError>,
    },
    NewRunApproved {
        investigation_id: InvestigationId,
        result: Result<u32, EffectError>,
    },
    ReplyDismissed {
        investigation_id: InvestigationId,
        result: Result<(), EffectError>,
    },
    ResponseSaved {
        investigation_id: InvestigationId,
        content: String,
        result: Result<(), EffectError>,
    },
    ResponsePosted {
        investigation_id: InvestigationId,
        result: Result<(), EffectError>,
    },
    ResponseCopied {
        investigation_id: InvestigationId,
    },

    /// An unscoped failure; becomes the global error.
    Failed(EffectError),
}

impl Message {
    /// Operation a completion reports success for, named as in
    /// [`Effect::op`]. A global error raised by the same operation is
    /// cleared by it.
    pub fn succeeded_op(&self) -> Option<&'static str> {
        let op = match self {
            Message::InvestigationsLoaded(_) | Message::InvestigationsRefreshed(_) => {
                "list investigations"
            }
            Message::AgentStatusesLoaded { .. } => "load agent statuses",
            Message::AgentLogsLoaded { .. } => "load agent logs",
            Message::AgentFindingsLoaded { .. } => "load agent findings",
            Message::SummaryLoaded { .. } => "load summary",
            Message::CustomerResponseLoaded { .. } => "load customer response",
            Message::TicketDataLoaded { .. } => "load ticket data",
            Message::Phase1FindingsLoaded { .. } => "load phase 1 findings",
            Message::CheckpointApproved { .. } => "approve checkpoint",
            Message::InvestigationUpdated { .. } => "update investigation",
            Message::InvestigationCreated(Ok(())) => "create investigation",
            Message::InvestigationReset { result: Ok(_), .. } => "hard reset",
            Message::NewRunApproved { result: Ok(_), .. } => "approve new run",
            Message::ReplyDismissed { result: Ok(_), .. } => "dismiss reply",
            Message::ResponseSaved { result: Ok(_), .. } => "save response",
            Message::ResponsePosted { result: Ok(_), .. } => "post response",
            Message::ResponseCopied { .. } => "copy response",
            _ => return None,
        };
        Some(op)
    }
}
