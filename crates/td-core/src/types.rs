//! Domain snapshot: the passive records the dashboard keeps about each
//! investigation and its agents.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use td_api_types::{ApiAgentRecord, ApiInvestigation, TicketDataFile};

pub type InvestigationId = i64;

/// Checkpoint at which the operator reviews classification, product area and
/// priority before the agents are launched.
pub const FIRST_CHECKPOINT: &str = "checkpoint_1_post_classification";

/// Log entries kept per agent; older lines fall out of the window.
pub const LOG_WINDOW: usize = 50;

/// Canonical names of the search agents, in tab order.
pub const AGENTS: [&str; 4] = ["slack", "linear", "pylon", "codebase"];

/// Upstream tools disagree on casing ("Slack" vs "slack"), so every agent
/// name is folded to this form before it touches a map.
pub fn canonical_agent_name(name: &str) -> String {
    name.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestigationStatus {
    #[default]
    Pending,
    Running,
    Waiting,
    Complete,
    Error,
}

impl InvestigationStatus {
    /// Lenient parse of the CLI's status string; unknown values read as
    /// `Pending`.
    pub fn from_wire(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "running" => Self::Running,
            "waiting" => Self::Waiting,
            "complete" | "completed" => Self::Complete,
            "error" | "failed" => Self::Error,
            _ => Self::Pending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Waiting => "waiting",
            Self::Complete => "complete",
            Self::Error => "error",
        }
    }

    /// Running or waiting investigations are re-polled on every tick.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Waiting)
    }
}

impl fmt::Display for InvestigationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Error,
    Checkpoint,
}

impl AgentStatus {
    pub fn from_wire(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "running" => Self::Running,
            "completed" | "complete" | "done" => Self::Completed,
            "error" | "failed" => Self::Error,
            "checkpoint" | "waiting" => Self::Checkpoint,
            _ => Self::Pending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Error => "error",
            Self::Checkpoint => "checkpoint",
        }
    }

    /// Single-character glyph used in the tab bar.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Pending => "○",
            Self::Running => "●",
            Self::Completed => "✓",
            Self::Error => "✗",
            Self::Checkpoint => "◆",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Investigation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Investigation {
    pub id: InvestigationId,
    pub customer_name: String,
    pub classification: String,
    pub connector_name: String,
    pub product_area: String,
    pub priority: String,
    pub status: InvestigationStatus,
    /// Empty unless `status` is `Waiting`.
    pub current_checkpoint: String,
    pub current_run_number: u32,
    pub has_new_reply: bool,
    pub new_reply_summary: Option<String>,
    /// Canonical agent name -> status, only used for tab-bar glyphs.
    pub agent_statuses: BTreeMap<String, AgentStatus>,
}

impl Investigation {
    pub fn new(id: InvestigationId, status: InvestigationStatus) -> Self {
        Self {
            id,
            customer_name: String::new(),
            classification: String::new(),
            connector_name: String::new(),
            product_area: String::new(),
            priority: String::new(),
            status,
            current_checkpoint: String::new(),
            current_run_number: 1,
            has_new_reply: false,
            new_reply_summary: None,
            agent_statuses: BTreeMap::new(),
        }
    }

    /// Paused at any checkpoint, awaiting operator approval.
    pub fn has_checkpoint(&self) -> bool {
        self.status == InvestigationStatus::Waiting && !self.current_checkpoint.is_empty()
    }

    pub fn at_first_checkpoint(&self) -> bool {
        self.status == InvestigationStatus::Waiting && self.current_checkpoint == FIRST_CHECKPOINT
    }
}

impl From<ApiInvestigation> for Investigation {
    fn from(api: ApiInvestigation) -> Self {
        Self {
            id: api.id,
            customer_name: api.customer_name,
            classification: api.classification,
            connector_name: api.connector_name,
            product_area: api.product_area,
            priority: api.priority,
            status: InvestigationStatus::from_wire(&api.status),
            current_checkpoint: api.current_checkpoint,
            current_run_number: api.current_run_number.unwrap_or(1).max(1),
            has_new_reply: api.has_new_reply,
            new_reply_summary: api.new_reply_summary.filter(|s| !s.trim().is_empty()),
            agent_statuses: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Agent state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: Option<DateTime<Utc>>,
    pub level: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Finding {
    pub title: String,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentState {
    /// Canonical (lower-case) agent name.
    pub name: String,
    pub status: AgentStatus,
    pub pid: Option<i64>,
    pub started_at: Option<DateTime<Utc>>,
    pub runtime: Option<Duration>,
    pub logs: Vec<LogEntry>,
    pub findings: Vec<Finding>,
    pub log_file: Option<String>,
    pub findings_file: Option<String>,
}

impl AgentState {
    /// Stand-in created when findings arrive before the agent's status row.
    pub fn placeholder(name: &str) -> Self {
        Self {
            name: canonical_agent_name(name),
            status: AgentStatus::Completed,
            pid: None,
            started_at: None,
            runtime: None,
            logs: Vec::new(),
            findings: Vec::new(),
            log_file: None,
            findings_file: None,
        }
    }

    /// Build from an upstream status row, deriving runtime against `now`.
    pub fn from_record(record: ApiAgentRecord, now: DateTime<Utc>) -> Self {
        let started_at = record
            .started_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));
        Self {
            name: canonical_agent_name(&record.agent_name),
            status: AgentStatus::from_wire(&record.status),
            pid: record.pid.filter(|p| *p > 0),
            started_at,
            runtime: started_at.map(|s| now - s),
            logs: Vec::new(),
            findings: Vec::new(),
            log_file: record.log_file,
            findings_file: record.findings_file,
        }
    }

    /// Replace the log buffer, keeping only the newest `window` entries.
    pub fn set_logs(&mut self, mut logs: Vec<LogEntry>, window: usize) {
        if logs.len() > window {
            logs.drain(..logs.len() - window);
        }
        self.logs = logs;
    }
}

// ---------------------------------------------------------------------------
// Summary, response, ticket data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvestigationSummary {
    pub root_cause: String,
    /// Canonical agent name -> findings, in file order.
    pub key_findings: BTreeMap<String, Vec<String>>,
    pub open_questions: Vec<String>,
    pub next_steps: Vec<String>,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerResponse {
    pub content: String,
    pub last_edited: DateTime<Utc>,
    pub copied: bool,
    pub posted: bool,
}

impl CustomerResponse {
    /// A freshly loaded response; the only way `copied`/`posted` go back
    /// to false.
    pub fn loaded(content: String, at: DateTime<Utc>) -> Self {
        Self {
            content,
            last_edited: at,
            copied: false,
            posted: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketData {
    pub ticket_id: i64,
    pub title: String,
    pub body: String,
    pub customer_name: String,
    pub classification: String,
    pub product_area: String,
    pub priority: String,
    pub connector_name: Option<String>,
}

impl From<TicketDataFile> for TicketData {
    fn from(file: TicketDataFile) -> Self {
        Self {
            ticket_id: file.ticket_id,
            title: file.title,
            body: file.body,
            customer_name: file.customer_name,
            classification: file.classification,
            product_area: file.product_area,
            priority: file.priority,
            connector_name: file.connector_name,
        }
    }
}
