//! The sole mutator of [`App`]: `(state, message) -> effects`.
//!
//! Every handler is safe to run in any order relative to other pending
//! completions. Merges are keyed by investigation id and canonical agent
//! name, and a repeated arrival for the same key simply overwrites.

use chrono::Utc;
use td_core::types::{
    canonical_agent_name, AgentState, CustomerResponse, Investigation, InvestigationId,
};
use tracing::{debug, warn};

use crate::app::{App, GlobalError, LayoutMetrics};
use crate::effect::Effect;
use crate::error::EffectError;
use crate::input;
use crate::message::Message;
use crate::modal::{ConfirmAction, Modal, ReplyPrompt};
use crate::sync;

/// Effects to run at startup: the first list load and the first tick.
pub fn init() -> Vec<Effect> {
    vec![Effect::ListInvestigations, Effect::ScheduleTick]
}

pub fn update(app: &mut App, msg: Message) -> Vec<Effect> {
    if let Some(op) = msg.succeeded_op() {
        if app.error.as_ref().is_some_and(|e| e.op == op) {
            debug!(op, "operation recovered, clearing error");
            app.error = None;
        }
    }
    match msg {
        Message::Key(key) => input::handle_key(app, key),
        Message::Resize { width, height } => {
            app.width = width;
            app.height = height;
            if app.layout.is_none() {
                app.layout = Some(LayoutMetrics::compute(width, height));
            }
            Vec::new()
        }
        Message::Tick => on_tick(app),

        Message::InvestigationsLoaded(list) => investigations_loaded(app, list),
        Message::InvestigationsRefreshed(list) => {
            app.error = None;
            investigations_loaded(app, list)
        }
        Message::AgentStatusesLoaded {
            investigation_id,
            agents,
        } => {
            merge_agent_statuses(app, investigation_id, agents);
            Vec::new()
        }
        Message::AgentLogsLoaded {
            investigation_id,
            agent,
            logs,
        } => {
            let window = app.log_window;
            if let Some(state) = agent_entry(app, investigation_id, &agent, !logs.is_empty()) {
                state.set_logs(logs, window);
            }
            Vec::new()
        }
        Message::AgentFindingsLoaded {
            investigation_id,
            agent,
            findings,
        } => {
            if let Some(state) = agent_entry(app, investigation_id, &agent, !findings.is_empty()) {
                state.findings = findings;
            }
            Vec::new()
        }
        Message::SummaryLoaded {
            investigation_id,
            summary,
        } => {
            match summary {
                Some(s) => app.summaries.insert(investigation_id, s),
                None => app.summaries.remove(&investigation_id),
            };
            Vec::new()
        }
        Message::CustomerResponseLoaded {
            investigation_id,
            response,
        } => {
            match response {
                Some(r) => app.responses.insert(investigation_id, r),
                None => app.responses.remove(&investigation_id),
            };
            Vec::new()
        }
        Message::TicketDataLoaded {
            investigation_id,
            data,
        } => {
            if let Some(data) = data {
                if app.selected_id() == Some(investigation_id)
                    && app.checkpoint.loaded_for != Some(investigation_id)
                {
                    app.checkpoint.seed(investigation_id, &data);
                }
                app.ticket_data.insert(investigation_id, data);
            }
            Vec::new()
        }
        Message::Phase1FindingsLoaded {
            investigation_id,
            content,
        } => {
            if let Some(content) = content.filter(|c| !c.trim().is_empty()) {
                app.phase1_findings.insert(investigation_id, content);
            }
            Vec::new()
        }

        Message::CheckpointApproved { investigation_id } => {
            if app.checkpoint.loaded_for == Some(investigation_id) {
                app.checkpoint.invalidate();
            }
            app.notice = Some(format!("Checkpoint approved for #{investigation_id}"));
            vec![
                Effect::ListInvestigations,
                Effect::LoadAgentStatuses { investigation_id },
            ]
        }
        Message::InvestigationUpdated {
            investigation_id,
            next,
        } => {
            debug!(investigation_id, chained = next.is_some(), "investigation updated");
            next.map(|effect| vec![*effect]).unwrap_or_default()
        }
        Message::InvestigationCreated(result) => match result {
            Ok(()) => {
                if matches!(app.modal, Some(Modal::Create(_))) {
                    app.modal = None;
                }
                app.notice = Some("Investigation created".to_string());
                vec![Effect::ListInvestigations]
            }
            Err(e) => match app.modal.as_mut() {
                Some(Modal::Create(form)) => {
                    form.in_progress = false;
                    form.error = Some(e.to_string());
                    Vec::new()
                }
                _ => global_error(app, &e),
            },
        },
        Message::InvestigationReset {
            investigation_id,
            result,
        } => {
            let open = matches!(&app.modal, Some(Modal::Reset(f)) if f.investigation_id == investigation_id);
            match result {
                Ok(run) => {
                    if open {
                        app.modal = None;
                    }
                    if let Some(inv) = app.investigation_mut(investigation_id) {
                        inv.current_run_number = run.max(1);
                    }
                    app.notice = Some(format!("Investigation #{investigation_id} reset to run {run}"));
                    vec![Effect::ListInvestigations]
                }
                Err(e) => match app.modal.as_mut() {
                    Some(Modal::Reset(form)) if open => {
                        form.in_progress = false;
                        form.error = Some(e.to_string());
                        Vec::new()
                    }
                    _ => global_error(app, &e),
                },
            }
        }
        Message::NewRunApproved {
            investigation_id,
            result,
        } => reply_resolved(app, investigation_id, result.map(Some)),
        Message::ReplyDismissed {
            investigation_id,
            result,
        } => reply_resolved(app, investigation_id, result.map(|()| None)),
        Message::ResponseSaved {
            investigation_id,
            content,
            result,
        } => {
            let open = matches!(
                &app.modal,
                Some(Modal::Confirm(d)) if d.investigation_id == investigation_id
                    && matches!(d.action, ConfirmAction::Save { .. })
            );
            match result {
                Ok(()) => {
                    if open {
                        app.modal = None;
                    }
                    let now = Utc::now();
                    app.responses
                        .entry(investigation_id)
                        .and_modify(|r| {
                            r.content = content.clone();
                            r.last_edited = now;
                        })
                        .or_insert_with(|| CustomerResponse::loaded(content, now));
                    app.notice = Some("Response saved".to_string());
                    Vec::new()
                }
                Err(e) => confirm_failed(app, open, e),
            }
        }
        Message::ResponsePosted {
            investigation_id,
            result,
        } => {
            let open = matches!(
                &app.modal,
                Some(Modal::Confirm(d)) if d.investigation_id == investigation_id
                    && matches!(d.action, ConfirmAction::Post)
            );
            match result {
                Ok(()) => {
                    if open {
                        app.modal = None;
                    }
                    if let Some(r) = app.responses.get_mut(&investigation_id) {
                        r.posted = true;
                    }
                    app.notice = Some(format!("Response posted to #{investigation_id}"));
                    Vec::new()
                }
                Err(e) => confirm_failed(app, open, e),
            }
        }
        Message::ResponseCopied { investigation_id } => {
            if let Some(r) = app.responses.get_mut(&investigation_id) {
                r.copied = true;
            }
            app.notice = Some("Response copied to clipboard".to_string());
            Vec::new()
        }

        Message::Failed(e) => global_error(app, &e),
    }
}

/// The agent's state, or a placeholder when data arrives ahead of its
/// status row. Empty loads never conjure an agent, so an unstarted agent
/// still reads as absent.
fn agent_entry<'a>(
    app: &'a mut App,
    investigation_id: InvestigationId,
    agent: &str,
    has_data: bool,
) -> Option<&'a mut AgentState> {
    let map = app.agents.entry(investigation_id).or_default();
    let name = canonical_agent_name(agent);
    if !has_data && !map.contains_key(&name) {
        debug!(investigation_id, agent, "empty load for unknown agent ignored");
        return None;
    }
    Some(map.entry(name).or_insert_with(|| AgentState::placeholder(agent)))
}

fn global_error(app: &mut App, error: &EffectError) -> Vec<Effect> {
    warn!(%error, "surfacing error");
    app.error = Some(GlobalError::new(error.op, error.to_string()));
    Vec::new()
}

fn confirm_failed(app: &mut App, open: bool, error: EffectError) -> Vec<Effect> {
    match app.modal.as_mut() {
        Some(Modal::Confirm(dialog)) if open => {
            dialog.in_progress = false;
            dialog.error = Some(error.to_string());
            Vec::new()
        }
        _ => global_error(app, &error),
    }
}

/// Shared tail of approve-new-run (`Some(run)`) and dismiss (`None`).
fn reply_resolved(
    app: &mut App,
    investigation_id: InvestigationId,
    result: Result<Option<u32>, EffectError>,
) -> Vec<Effect> {
    let open = matches!(&app.modal, Some(Modal::Reply(p)) if p.investigation_id == investigation_id);
    match result {
        Ok(run) => {
            if open {
                app.modal = None;
            }
            if let Some(inv) = app.investigation_mut(investigation_id) {
                inv.has_new_reply = false;
                inv.new_reply_summary = None;
                if let Some(run) = run {
                    inv.current_run_number = run.max(1);
                }
            }
            vec![Effect::ListInvestigations]
        }
        Err(e) => match app.modal.as_mut() {
            Some(Modal::Reply(prompt)) if open => {
                prompt.in_progress = false;
                prompt.error = Some(e.to_string());
                Vec::new()
            }
            _ => global_error(app, &e),
        },
    }
}

fn investigations_loaded(app: &mut App, mut list: Vec<Investigation>) -> Vec<Effect> {
    let previous = app.selected_id();

    // Keep glyph maps across refreshes; the list payload never carries them.
    for inv in &mut list {
        if let Some(old) = app.investigation(inv.id) {
            inv.agent_statuses = old.agent_statuses.clone();
        }
    }
    app.investigations = list;
    app.loading = false;

    app.selected_index = previous
        .and_then(|id| app.investigations.iter().position(|inv| inv.id == id))
        .unwrap_or_else(|| {
            app.selected_index
                .min(app.investigations.len().saturating_sub(1))
        });
    if app.selected_id() != previous {
        app.checkpoint.invalidate();
    }

    match app.selected() {
        Some(inv) => sync::after_list_load(inv, app.active_tab),
        None => Vec::new(),
    }
}

/// Status rows replace the agent's status but keep logs and findings that
/// arrived separately.
fn merge_agent_statuses(app: &mut App, investigation_id: InvestigationId, agents: Vec<AgentState>) {
    let map = app.agents.entry(investigation_id).or_default();
    let mut glyphs = Vec::with_capacity(agents.len());
    for mut state in agents {
        state.name = canonical_agent_name(&state.name);
        if let Some(existing) = map.remove(&state.name) {
            state.logs = existing.logs;
            state.findings = existing.findings;
        }
        glyphs.push((state.name.clone(), state.status));
        map.insert(state.name.clone(), state);
    }
    if let Some(inv) = app.investigation_mut(investigation_id) {
        inv.agent_statuses.extend(glyphs);
    }
}

fn on_tick(app: &mut App) -> Vec<Effect> {
    let effects = sync::tick_effects(app);
    if app.is_idle() {
        if let Some(inv) = app.selected().filter(|inv| inv.has_new_reply) {
            debug!(investigation_id = inv.id, "reply detected, opening prompt");
            app.modal = Some(Modal::Reply(ReplyPrompt::new(
                inv.id,
                inv.new_reply_summary.clone(),
            )));
        }
    }
    effects
}
