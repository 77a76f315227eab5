//! The effect catalog: pure descriptions of work against an external
//! collaborator. The reducer returns them; the scheduler runs them and feeds
//! exactly one [`Message`](crate::message::Message) back per effect.

use std::collections::BTreeMap;

use td_core::types::InvestigationId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ListInvestigations,
    /// List load the operator asked for; its success also clears the
    /// global error.
    RefreshInvestigations,
    LoadAgentStatuses {
        investigation_id: InvestigationId,
    },
    LoadAgentLogs {
        investigation_id: InvestigationId,
        agent: String,
    },
    LoadAgentFindings {
        investigation_id: InvestigationId,
        agent: String,
    },
    LoadSummary {
        investigation_id: InvestigationId,
    },
    LoadCustomerResponse {
        investigation_id: InvestigationId,
    },
    LoadTicketData {
        investigation_id: InvestigationId,
    },
    LoadPhase1Findings {
        investigation_id: InvestigationId,
    },
    ApproveCheckpoint {
        investigation_id: InvestigationId,
        checkpoint: String,
    },
    /// Partial field update. `then` runs only once the update succeeded.
    UpdateInvestigation {
        investigation_id: InvestigationId,
        fields: BTreeMap<String, String>,
        then: Option<Box<Effect>>,
    },
    CreateInvestigation {
        ticket_id: String,
        skill: String,
        context: Option<String>,
    },
    HardReset {
        investigation_id: InvestigationId,
        trigger_summary: String,
    },
    ApproveNewRun {
        investigation_id: InvestigationId,
        trigger_summary: String,
    },
    DismissReply {
        investigation_id: InvestigationId,
    },
    SaveResponse {
        investigation_id: InvestigationId,
        content: String,
    },
    PostResponse {
        investigation_id: InvestigationId,
    },
    CopyResponse {
        investigation_id: InvestigationId,
        content: String,
    },
    /// Fires a single `Tick` after the configured interval.
    ScheduleTick,
}

impl Effect {
    /// Short operation name used in logs and surfaced errors.
    pub fn op(&self) -> &'static str {
        match self {
            Effect::ListInvestigations | Effect::RefreshInvestigations => "list investigations",
            Effect::LoadAgentStatuses { .. } => "load agent statuses",
            Effect::LoadAgentLogs { .. } => "load agent logs",
            Effect::LoadAgentFindings { .. } => "load agent findings",
            Effect::LoadSummary { .. } => "load summary",
            Effect::LoadCustomerResponse { .. } => "load customer response",
            Effect::LoadTicketData { .. } => "load ticket data",
            Effect::LoadPhase1Findings { .. } => "load phase 1 findings",
            Effect::ApproveCheckpoint { .. } => "approve checkpoint",
            Effect::UpdateInvestigation { .. } => "update investigation",
            Effect::CreateInvestigation { .. } => "create investigation",
            Effect::HardReset { .. } => "hard reset",
            Effect::ApproveNewRun { .. } => "approve new run",
            Effect::DismissReply { .. } => "dismiss reply",
            Effect::SaveResponse { .. } => "save response",
            Effect::PostResponse { .. } => "post response",
            Effect::CopyResponse { .. } => "copy response",
            Effect::ScheduleTick => "tick",
        }
    }

    /// What the effect concerns, e.g. `investigation 12` or
    /// `investigation 12 / slack`.
    pub fn target(&self) -> String {
        match self {
            Effect::ListInvestigations | Effect::RefreshInvestigations | Effect::ScheduleTick => {
                "all".to_string()
            }
            Effect::LoadAgentLogs {
                investigation_id,
                agent,
            }
            | Effect::LoadAgentFindings {
                investigation_id,
                agent,
            } => format!("investigation {investigation_id} / {agent}"),
            Effect::CreateInvestigation { ticket_id, .. } => format!("ticket {ticket_id}"),
            Effect::LoadAgentStatuses { investigation_id }
            | Effect::LoadSummary { investigation_id }
            | Effect::LoadCustomerResponse { investigation_id }
            | Effect::LoadTicketData { investigation_id }
            | Effect::LoadPhase1Findings { investigation_id }
            | Effect::ApproveCheckpoint {
                investigation_id, ..
            }
            | Effect::UpdateInvestigation {
                investigation_id, ..
            }
            | Effect::HardReset {
                investigation_id, ..
            }
            | Effect::ApproveNewRun {
                investigation_id, ..
            }
            | Effect::DismissReply { investigation_id }
            | Effect::SaveResponse {
                investigation_id, ..
            }
            | Effect::PostResponse { investigation_id }
            | Effect::CopyResponse {
                investigation_id, ..
            } => format!("investigation {investigation_id}"),
        }
    }
}
