//! Which effects to (re-)dispatch on list load, selection change, tab
//! change and timer tick.

use td_core::types::{Investigation, InvestigationId, InvestigationStatus};

use crate::app::{App, Tab};
use crate::effect::Effect;

/// Data behind `tab` for one investigation.
pub fn tab_effects(investigation_id: InvestigationId, tab: Tab) -> Vec<Effect> {
    match tab.agent() {
        Some(agent) => vec![
            Effect::LoadAgentLogs {
                investigation_id,
                agent: agent.to_string(),
            },
            Effect::LoadAgentFindings {
                investigation_id,
                agent: agent.to_string(),
            },
        ],
        None => vec![
            Effect::LoadSummary { investigation_id },
            Effect::LoadCustomerResponse { investigation_id },
        ],
    }
}

fn selected_effects(inv: &Investigation, tab: Tab) -> Vec<Effect> {
    let mut effects = vec![Effect::LoadAgentStatuses {
        investigation_id: inv.id,
    }];
    effects.extend(tab_effects(inv.id, tab));
    if inv.at_first_checkpoint() {
        effects.push(Effect::LoadTicketData {
            investigation_id: inv.id,
        });
    }
    effects
}

/// After a successful list refresh, for the selected investigation.
pub fn after_list_load(inv: &Investigation, tab: Tab) -> Vec<Effect> {
    let mut effects = selected_effects(inv, tab);
    if matches!(
        inv.status,
        InvestigationStatus::Complete | InvestigationStatus::Waiting
    ) {
        effects.push(Effect::LoadPhase1Findings {
            investigation_id: inv.id,
        });
    }
    effects
}

/// After the operator moved the selection onto `inv`.
pub fn after_selection(inv: &Investigation, tab: Tab) -> Vec<Effect> {
    let mut effects = selected_effects(inv, tab);
    if inv.status == InvestigationStatus::Complete {
        effects.push(Effect::LoadPhase1Findings {
            investigation_id: inv.id,
        });
    }
    effects
}

/// Timer fan-out. Always re-arms the timer first, even with nothing to poll.
pub fn tick_effects(app: &App) -> Vec<Effect> {
    let mut effects = vec![Effect::ScheduleTick, Effect::ListInvestigations];
    let selected = app.selected_id();

    for inv in app.investigations.iter().filter(|inv| inv.status.is_active()) {
        effects.push(Effect::LoadAgentStatuses {
            investigation_id: inv.id,
        });
        if Some(inv.id) != selected {
            continue;
        }
        if app.active_tab.agent().is_some() {
            effects.extend(tab_effects(inv.id, app.active_tab));
        }
        effects.push(Effect::LoadPhase1Findings {
            investigation_id: inv.id,
        });
    }
    effects
}
