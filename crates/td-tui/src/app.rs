//! Dashboard state: the domain snapshot plus the UI flags the reducer owns.

use std::collections::{BTreeMap, HashMap};

use td_core::types::{
    canonical_agent_name, AgentState, CustomerResponse, Investigation, InvestigationId,
    InvestigationSummary, TicketData, LOG_WINDOW,
};

use crate::checkpoint::CheckpointDraft;
use crate::modal::Modal;

/// Lines moved per PageUp / PageDown.
pub const SCROLL_STEP: u16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Slack,
    Linear,
    Pylon,
    Codebase,
    Summary,
}

impl Tab {
    pub const ALL: [Tab; 5] = [Tab::Slack, Tab::Linear, Tab::Pylon, Tab::Codebase, Tab::Summary];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Slack => "Slack",
            Tab::Linear => "Linear",
            Tab::Pylon => "Pylon",
            Tab::Codebase => "Codebase",
            Tab::Summary => "Summary",
        }
    }

    /// Canonical agent name for agent tabs, `None` for Summary.
    pub fn agent(self) -> Option<&'static str> {
        match self {
            Tab::Slack => Some("slack"),
            Tab::Linear => Some("linear"),
            Tab::Pylon => Some("pylon"),
            Tab::Codebase => Some("codebase"),
            Tab::Summary => None,
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    /// `'1'..='5'` to a tab.
    pub fn from_digit(c: char) -> Option<Tab> {
        let n = c.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Tab::ALL.get(i).copied())
    }
}

/// Sizes derived from the first window-size message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMetrics {
    pub sidebar_width: u16,
    pub content_width: u16,
    pub findings_height: u16,
    pub terminal_height: u16,
}

impl LayoutMetrics {
    pub fn compute(width: u16, height: u16) -> Self {
        let sidebar_width = (width / 3).max(40);
        let content_width = width.saturating_sub(sidebar_width).saturating_sub(6);
        let content_height = height.saturating_sub(10);
        let findings_height = content_height * 2 / 5;
        let terminal_height = content_height
            .saturating_sub(findings_height)
            .saturating_sub(8);
        Self {
            sidebar_width,
            content_width,
            findings_height,
            terminal_height,
        }
    }
}

/// Unscoped failure shown in place of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalError {
    /// Operation that failed; its next success clears the error.
    pub op: &'static str,
    pub message: String,
}

impl GlobalError {
    pub fn new(op: &'static str, message: impl Into<String>) -> Self {
        Self {
            op,
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct App {
    pub investigations: Vec<Investigation>,
    pub selected_index: usize,
    /// Investigation -> canonical agent name -> state.
    pub agents: HashMap<InvestigationId, BTreeMap<String, AgentState>>,
    pub summaries: HashMap<InvestigationId, InvestigationSummary>,
    pub responses: HashMap<InvestigationId, CustomerResponse>,
    pub ticket_data: HashMap<InvestigationId, TicketData>,
    pub phase1_findings: HashMap<InvestigationId, String>,

    pub active_tab: Tab,
    pub modal: Option<Modal>,
    pub checkpoint: CheckpointDraft,

    pub width: u16,
    pub height: u16,
    pub layout: Option<LayoutMetrics>,
    /// Lines scrolled up from the newest log entry.
    pub log_scroll: u16,
    /// Log entries kept per agent.
    pub log_window: usize,

    /// True until the first investigation list arrives.
    pub loading: bool,
    /// Unscoped failure; replaces the main view until the failed operation
    /// succeeds or the operator refreshes.
    pub error: Option<GlobalError>,
    /// Transient confirmation shown in the action bar.
    pub notice: Option<String>,
    pub show_debug: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(show_debug: bool) -> Self {
        Self {
            loading: true,
            show_debug,
            log_window: LOG_WINDOW,
            ..Default::default()
        }
    }

    pub fn with_log_window(mut self, window: usize) -> Self {
        self.log_window = window;
        self
    }

    pub fn selected(&self) -> Option<&Investigation> {
        self.investigations.get(self.selected_index)
    }

    pub fn selected_id(&self) -> Option<InvestigationId> {
        self.selected().map(|inv| inv.id)
    }

    pub fn investigation(&self, id: InvestigationId) -> Option<&Investigation> {
        self.investigations.iter().find(|inv| inv.id == id)
    }

    pub fn investigation_mut(&mut self, id: InvestigationId) -> Option<&mut Investigation> {
        self.investigations.iter_mut().find(|inv| inv.id == id)
    }

    pub fn agent_state(&self, id: InvestigationId, agent: &str) -> Option<&AgentState> {
        self.agents.get(&id)?.get(&canonical_agent_name(agent))
    }

    /// Checkpoint review owns the keyboard whenever the selected
    /// investigation waits at the first checkpoint and no modal is open.
    pub fn checkpoint_review_active(&self) -> bool {
        self.modal.is_none() && self.selected().is_some_and(|inv| inv.at_first_checkpoint())
    }

    /// No modal workflow of any kind, checkpoint review included.
    pub fn is_idle(&self) -> bool {
        self.modal.is_none() && !self.checkpoint_review_active()
    }
}
