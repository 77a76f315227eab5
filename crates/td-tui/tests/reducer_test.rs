//! State-transition tests: messages and keystrokes in, state and effects out.

use std::collections::BTreeMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use td_core::types::{
    AgentState, AgentStatus, CustomerResponse, Finding, Investigation, InvestigationStatus,
    LogEntry, TicketData, FIRST_CHECKPOINT,
};
use td_tui::app::{App, LayoutMetrics, Tab};
use td_tui::editor;
use td_tui::effect::Effect;
use td_tui::error::{CollabError, EffectError};
use td_tui::message::Message;
use td_tui::modal::Modal;
use td_tui::reducer::{init, update};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn key(code: KeyCode) -> Message {
    Message::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn ch(c: char) -> Message {
    key(KeyCode::Char(c))
}

fn ctrl(c: char) -> Message {
    Message::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        update(app, ch(c));
    }
}

fn investigation(id: i64, status: InvestigationStatus) -> Investigation {
    let mut inv = Investigation::new(id, status);
    inv.customer_name = format!("Customer {id}");
    inv
}

fn at_checkpoint(id: i64) -> Investigation {
    let mut inv = investigation(id, InvestigationStatus::Waiting);
    inv.current_checkpoint = FIRST_CHECKPOINT.to_string();
    inv
}

fn ticket(id: i64) -> TicketData {
    TicketData {
        ticket_id: id,
        title: format!("Ticket {id}"),
        classification: "product_bug".into(),
        product_area: "Connectors".into(),
        priority: "P3".into(),
        ..Default::default()
    }
}

fn loaded(list: Vec<Investigation>) -> App {
    let mut app = App::new(false);
    update(&mut app, Message::InvestigationsLoaded(list));
    app
}

fn failure(op: &'static str) -> EffectError {
    EffectError::new(op, "investigation 1", CollabError::Http { status: 500 })
}

fn agent(name: &str, status: AgentStatus) -> AgentState {
    let mut state = AgentState::placeholder(name);
    state.status = status;
    state.pid = Some(99);
    state
}

/// Pick the next option in the priority dropdown (P3 -> P4).
fn bump_priority(app: &mut App) {
    update(app, key(KeyCode::Tab));
    update(app, key(KeyCode::Tab));
    update(app, key(KeyCode::Enter));
    update(app, key(KeyCode::Down));
    update(app, key(KeyCode::Enter));
}

// ---------------------------------------------------------------------------
// Startup, layout, list refresh
// ---------------------------------------------------------------------------

#[test]
fn init_requests_list_and_first_tick() {
    assert_eq!(init(), vec![Effect::ListInvestigations, Effect::ScheduleTick]);
}

#[test]
fn layout_is_computed_from_first_resize_only() {
    let mut app = App::new(false);
    update(&mut app, Message::Resize { width: 120, height: 40 });
    update(&mut app, Message::Resize { width: 200, height: 60 });
    assert_eq!(app.layout, Some(LayoutMetrics::compute(120, 40)));
    assert_eq!((app.width, app.height), (200, 60));
}

#[test]
fn list_refresh_keeps_selection_by_id() {
    let mut app = loaded(vec![
        investigation(1, InvestigationStatus::Running),
        investigation(2, InvestigationStatus::Running),
        investigation(3, InvestigationStatus::Running),
    ]);
    app.selected_index = 1;

    update(
        &mut app,
        Message::InvestigationsLoaded(vec![
            investigation(3, InvestigationStatus::Running),
            investigation(1, InvestigationStatus::Running),
            investigation(2, InvestigationStatus::Complete),
        ]),
    );
    assert_eq!(app.selected_id(), Some(2));
    assert_eq!(app.selected_index, 2);
}

#[test]
fn list_refresh_clamps_when_selection_vanishes() {
    let mut app = loaded(vec![
        investigation(1, InvestigationStatus::Running),
        investigation(2, InvestigationStatus::Running),
    ]);
    app.selected_index = 1;
    update(
        &mut app,
        Message::InvestigationsLoaded(vec![investigation(1, InvestigationStatus::Running)]),
    );
    assert_eq!(app.selected_index, 0);
    assert!(!app.loading);
}

#[test]
fn list_load_at_checkpoint_requests_ticket_and_phase1() {
    let mut app = App::new(false);
    let effects = update(&mut app, Message::InvestigationsLoaded(vec![at_checkpoint(7)]));
    assert!(effects.contains(&Effect::LoadAgentStatuses { investigation_id: 7 }));
    assert!(effects.contains(&Effect::LoadTicketData { investigation_id: 7 }));
    assert!(effects.contains(&Effect::LoadPhase1Findings { investigation_id: 7 }));
    assert!(effects.contains(&Effect::LoadAgentLogs {
        investigation_id: 7,
        agent: "slack".into()
    }));
}

#[test]
fn list_refresh_preserves_glyphs_and_clears_error() {
    let mut app = loaded(vec![investigation(1, InvestigationStatus::Running)]);
    update(
        &mut app,
        Message::AgentStatusesLoaded {
            investigation_id: 1,
            agents: vec![agent("Slack", AgentStatus::Running)],
        },
    );
    update(&mut app, Message::Failed(failure("list investigations")));
    assert!(app.error.is_some());

    update(
        &mut app,
        Message::InvestigationsLoaded(vec![investigation(1, InvestigationStatus::Running)]),
    );
    assert_eq!(app.error, None);
    assert_eq!(
        app.investigations[0].agent_statuses.get("slack"),
        Some(&AgentStatus::Running)
    );
}

// ---------------------------------------------------------------------------
// Agent data merges
// ---------------------------------------------------------------------------

#[test]
fn findings_and_statuses_merge_in_either_order() {
    let findings = vec![Finding {
        title: "Similar ticket".into(),
        details: vec!["#support thread".into()],
    }];
    let statuses = || Message::AgentStatusesLoaded {
        investigation_id: 1,
        agents: vec![agent("Slack", AgentStatus::Running)],
    };
    let found = || Message::AgentFindingsLoaded {
        investigation_id: 1,
        agent: "slack".into(),
        findings: findings.clone(),
    };

    let mut a = loaded(vec![investigation(1, InvestigationStatus::Running)]);
    update(&mut a, statuses());
    update(&mut a, found());

    let mut b = loaded(vec![investigation(1, InvestigationStatus::Running)]);
    update(&mut b, found());
    update(&mut b, statuses());

    assert_eq!(a.agents, b.agents);
    let state = a.agent_state(1, "slack").expect("slack agent");
    assert_eq!(state.status, AgentStatus::Running);
    assert_eq!(state.findings, findings);
}

#[test]
fn status_refresh_keeps_logs() {
    let mut app = loaded(vec![investigation(1, InvestigationStatus::Running)]);
    update(
        &mut app,
        Message::AgentStatusesLoaded {
            investigation_id: 1,
            agents: vec![agent("Linear", AgentStatus::Running)],
        },
    );
    update(
        &mut app,
        Message::AgentLogsLoaded {
            investigation_id: 1,
            agent: "LINEAR".into(),
            logs: vec![LogEntry {
                timestamp: None,
                level: "info".into(),
                message: "searching".into(),
            }],
        },
    );
    update(
        &mut app,
        Message::AgentStatusesLoaded {
            investigation_id: 1,
            agents: vec![agent("linear", AgentStatus::Completed)],
        },
    );

    let state = app.agent_state(1, "linear").expect("linear agent");
    assert_eq!(state.status, AgentStatus::Completed);
    assert_eq!(state.logs.len(), 1);
}

#[test]
fn empty_loads_never_create_an_agent() {
    let mut app = loaded(vec![investigation(1, InvestigationStatus::Running)]);
    update(
        &mut app,
        Message::AgentLogsLoaded {
            investigation_id: 1,
            agent: "pylon".into(),
            logs: Vec::new(),
        },
    );
    update(
        &mut app,
        Message::AgentFindingsLoaded {
            investigation_id: 1,
            agent: "pylon".into(),
            findings: Vec::new(),
        },
    );
    assert!(app.agent_state(1, "pylon").is_none());
}

#[test]
fn logs_before_status_survive_the_status_row() {
    let mut app = loaded(vec![investigation(1, InvestigationStatus::Running)]);
    update(
        &mut app,
        Message::AgentLogsLoaded {
            investigation_id: 1,
            agent: "Pylon".into(),
            logs: vec![LogEntry {
                timestamp: None,
                level: "info".into(),
                message: "early".into(),
            }],
        },
    );
    update(
        &mut app,
        Message::AgentStatusesLoaded {
            investigation_id: 1,
            agents: vec![agent("pylon", AgentStatus::Running)],
        },
    );
    let state = app.agent_state(1, "pylon").expect("pylon agent");
    assert_eq!(state.status, AgentStatus::Running);
    assert_eq!(state.logs[0].message, "early");
}

#[test]
fn absent_summary_and_blank_phase1_are_not_stored() {
    let mut app = loaded(vec![investigation(1, InvestigationStatus::Complete)]);
    update(
        &mut app,
        Message::CustomerResponseLoaded {
            investigation_id: 1,
            response: Some(CustomerResponse::loaded("Hi".into(), chrono::Utc::now())),
        },
    );
    update(
        &mut app,
        Message::CustomerResponseLoaded {
            investigation_id: 1,
            response: None,
        },
    );
    update(
        &mut app,
        Message::Phase1FindingsLoaded {
            investigation_id: 1,
            content: Some("  \n".into()),
        },
    );
    assert!(app.responses.is_empty());
    assert!(app.phase1_findings.is_empty());
}

// ---------------------------------------------------------------------------
// Checkpoint review
// ---------------------------------------------------------------------------

#[test]
fn ticket_data_seeds_draft_only_for_selection() {
    let mut app = loaded(vec![at_checkpoint(1), at_checkpoint(2)]);
    update(
        &mut app,
        Message::TicketDataLoaded {
            investigation_id: 2,
            data: Some(ticket(2)),
        },
    );
    assert_eq!(app.checkpoint.loaded_for, None);

    update(
        &mut app,
        Message::TicketDataLoaded {
            investigation_id: 1,
            data: Some(ticket(1)),
        },
    );
    assert_eq!(app.checkpoint.loaded_for, Some(1));
    assert_eq!(app.checkpoint.priority, "P3");
}

#[test]
fn switching_away_and_back_discards_unsaved_edits() {
    let mut app = loaded(vec![at_checkpoint(1), at_checkpoint(2)]);
    update(
        &mut app,
        Message::TicketDataLoaded {
            investigation_id: 1,
            data: Some(ticket(1)),
        },
    );
    bump_priority(&mut app);
    assert_eq!(app.checkpoint.priority, "P4");

    let effects = update(&mut app, key(KeyCode::Down));
    assert_eq!(app.selected_id(), Some(2));
    assert_eq!(app.checkpoint.loaded_for, None);
    assert!(effects.contains(&Effect::LoadTicketData { investigation_id: 2 }));
    update(
        &mut app,
        Message::TicketDataLoaded {
            investigation_id: 2,
            data: Some(ticket(2)),
        },
    );
    assert_eq!(app.checkpoint.loaded_for, Some(2));

    update(&mut app, key(KeyCode::Up));
    update(
        &mut app,
        Message::TicketDataLoaded {
            investigation_id: 1,
            data: Some(ticket(1)),
        },
    );
    assert_eq!(app.checkpoint.loaded_for, Some(1));
    assert_eq!(app.checkpoint.priority, "P3");
}

#[test]
fn unmodified_review_approves_directly() {
    let mut app = loaded(vec![at_checkpoint(1)]);
    update(
        &mut app,
        Message::TicketDataLoaded {
            investigation_id: 1,
            data: Some(ticket(1)),
        },
    );
    let effects = update(&mut app, ch('a'));
    assert_eq!(
        effects,
        vec![Effect::ApproveCheckpoint {
            investigation_id: 1,
            checkpoint: FIRST_CHECKPOINT.into(),
        }]
    );
}

#[test]
fn modified_review_updates_then_approves_on_success() {
    let mut app = loaded(vec![at_checkpoint(1)]);
    update(
        &mut app,
        Message::TicketDataLoaded {
            investigation_id: 1,
            data: Some(ticket(1)),
        },
    );
    bump_priority(&mut app);

    let effects = update(&mut app, ch('a'));
    let approve = Effect::ApproveCheckpoint {
        investigation_id: 1,
        checkpoint: FIRST_CHECKPOINT.into(),
    };
    let fields: BTreeMap<String, String> = [("priority".to_string(), "P4".to_string())].into();
    let [Effect::UpdateInvestigation {
        investigation_id,
        fields: sent,
        then,
    }] = effects.as_slice()
    else {
        panic!("expected a single update, got {effects:?}");
    };
    assert_eq!(*investigation_id, 1);
    assert_eq!(sent, &fields);
    assert_eq!(then.as_deref(), Some(&approve));

    let effects = update(
        &mut app,
        Message::InvestigationUpdated {
            investigation_id: 1,
            next: then.clone(),
        },
    );
    assert_eq!(effects, vec![approve]);
}

#[test]
fn failed_update_never_approves() {
    let mut app = loaded(vec![at_checkpoint(1)]);
    let effects = update(&mut app, Message::Failed(failure("update investigation")));
    assert!(effects.is_empty());
    assert!(app
        .error
        .as_ref()
        .is_some_and(|e| e.message.starts_with("update investigation (investigation 1)")));
}

#[test]
fn approval_invalidates_draft_and_refreshes() {
    let mut app = loaded(vec![at_checkpoint(1)]);
    update(
        &mut app,
        Message::TicketDataLoaded {
            investigation_id: 1,
            data: Some(ticket(1)),
        },
    );
    let effects = update(&mut app, Message::CheckpointApproved { investigation_id: 1 });
    assert_eq!(app.checkpoint.loaded_for, None);
    assert_eq!(
        effects,
        vec![
            Effect::ListInvestigations,
            Effect::LoadAgentStatuses { investigation_id: 1 },
        ]
    );
}

#[test]
fn review_owns_keys_before_normal_navigation() {
    let mut app = loaded(vec![at_checkpoint(1)]);
    update(&mut app, ch('n'));
    assert!(app.modal.is_none());
    update(&mut app, ch('5'));
    assert_eq!(app.active_tab, Tab::Slack);
}

fn numbered_logs(count: usize) -> Vec<LogEntry> {
    (0..count)
        .map(|i| LogEntry {
            timestamp: None,
            level: "info".into(),
            message: format!("line {i}"),
        })
        .collect()
}

#[test]
fn log_buffer_follows_configured_window() {
    let mut app = loaded(vec![investigation(1, InvestigationStatus::Running)]);
    update(
        &mut app,
        Message::AgentLogsLoaded {
            investigation_id: 1,
            agent: "slack".into(),
            logs: numbered_logs(60),
        },
    );
    assert_eq!(app.agent_state(1, "slack").map(|s| s.logs.len()), Some(50));

    let mut app = App::new(false).with_log_window(100);
    update(
        &mut app,
        Message::InvestigationsLoaded(vec![investigation(1, InvestigationStatus::Running)]),
    );
    update(
        &mut app,
        Message::AgentLogsLoaded {
            investigation_id: 1,
            agent: "Slack".into(),
            logs: numbered_logs(100),
        },
    );
    let logs = app.agent_state(1, "slack").map(|s| s.logs.clone()).unwrap_or_default();
    assert_eq!(logs.len(), 100);
    assert_eq!(logs[0].message, "line 0");
}

#[test]
fn timer_list_refresh_keeps_unrelated_error() {
    let mut app = loaded(vec![at_checkpoint(1)]);
    update(&mut app, Message::Failed(failure("approve checkpoint")));
    let shown = app.error.clone();
    assert!(shown
        .as_ref()
        .is_some_and(|e| e.message == "approve checkpoint (investigation 1): HTTP 500"));

    let effects = update(&mut app, Message::Tick);
    assert!(effects.contains(&Effect::ListInvestigations));
    update(&mut app, Message::InvestigationsLoaded(vec![at_checkpoint(1)]));
    assert_eq!(app.error, shown);
}

#[test]
fn operator_refresh_clears_any_error() {
    let mut app = loaded(vec![investigation(1, InvestigationStatus::Complete)]);
    update(&mut app, Message::Failed(failure("post response")));

    assert_eq!(update(&mut app, ch('r')), vec![Effect::RefreshInvestigations]);
    update(
        &mut app,
        Message::InvestigationsRefreshed(vec![investigation(1, InvestigationStatus::Complete)]),
    );
    assert_eq!(app.error, None);
}

#[test]
fn error_clears_when_same_operation_succeeds() {
    let mut app = loaded(vec![at_checkpoint(1)]);
    update(&mut app, Message::Failed(failure("approve checkpoint")));
    update(
        &mut app,
        Message::SummaryLoaded {
            investigation_id: 1,
            summary: None,
        },
    );
    assert!(app.error.is_some());

    update(&mut app, Message::CheckpointApproved { investigation_id: 1 });
    assert_eq!(app.error, None);
}

// ---------------------------------------------------------------------------
// Modals
// ---------------------------------------------------------------------------

#[test]
fn create_form_validates_ticket_id() {
    let mut app = loaded(vec![investigation(1, InvestigationStatus::Complete)]);
    update(&mut app, ch('n'));

    assert!(update(&mut app, key(KeyCode::Enter)).is_empty());
    let Some(Modal::Create(form)) = &app.modal else {
        panic!("create form should stay open");
    };
    assert_eq!(form.error.as_deref(), Some("Ticket ID is required"));

    type_text(&mut app, "ab");
    assert!(update(&mut app, key(KeyCode::Enter)).is_empty());
    let Some(Modal::Create(form)) = &app.modal else {
        panic!("create form should stay open");
    };
    assert_eq!(form.error.as_deref(), Some("Ticket ID must be a number"));

    update(&mut app, key(KeyCode::Backspace));
    update(&mut app, key(KeyCode::Backspace));
    type_text(&mut app, "8314");
    let effects = update(&mut app, key(KeyCode::Enter));
    assert_eq!(
        effects,
        vec![Effect::CreateInvestigation {
            ticket_id: "8314".into(),
            skill: "troubleshoot".into(),
            context: None,
        }]
    );
}

#[test]
fn create_failure_stays_inline_and_success_closes() {
    let mut app = loaded(vec![investigation(1, InvestigationStatus::Complete)]);
    update(&mut app, ch('n'));
    type_text(&mut app, "42");
    update(&mut app, key(KeyCode::Enter));

    // Keys are ignored while the call is in flight.
    update(&mut app, key(KeyCode::Esc));
    assert!(matches!(app.modal, Some(Modal::Create(_))));

    update(
        &mut app,
        Message::InvestigationCreated(Err(EffectError::new(
            "create investigation",
            "ticket 42",
            CollabError::Exit {
                code: 1,
                output: "ticket not found".into(),
            },
        ))),
    );
    let Some(Modal::Create(form)) = &app.modal else {
        panic!("create form should stay open");
    };
    assert!(!form.in_progress);
    assert!(form.error.as_deref().is_some_and(|e| e.contains("ticket not found")));
    assert_eq!(editor::text(&form.ticket), "42");
    assert_eq!(app.error, None);

    update(&mut app, key(KeyCode::Enter));
    let effects = update(&mut app, Message::InvestigationCreated(Ok(())));
    assert!(app.modal.is_none());
    assert_eq!(effects, vec![Effect::ListInvestigations]);
}

#[test]
fn failed_reset_keeps_form_and_context() {
    let mut app = loaded(vec![investigation(1, InvestigationStatus::Complete)]);
    update(&mut app, ch('R'));
    type_text(&mut app, "retry");
    let effects = update(&mut app, key(KeyCode::Enter));
    assert_eq!(
        effects,
        vec![Effect::HardReset {
            investigation_id: 1,
            trigger_summary: "retry".into(),
        }]
    );

    update(
        &mut app,
        Message::InvestigationReset {
            investigation_id: 1,
            result: Err(failure("hard reset")),
        },
    );
    let Some(Modal::Reset(form)) = &app.modal else {
        panic!("reset form should stay open");
    };
    assert!(!form.in_progress);
    assert!(form.error.is_some());
    assert_eq!(editor::text(&form.context), "retry");

    update(&mut app, key(KeyCode::Enter));
    let effects = update(
        &mut app,
        Message::InvestigationReset {
            investigation_id: 1,
            result: Ok(2),
        },
    );
    assert!(app.modal.is_none());
    assert_eq!(app.investigations[0].current_run_number, 2);
    assert_eq!(effects, vec![Effect::ListInvestigations]);
}

#[test]
fn reset_is_unavailable_while_running() {
    let mut app = loaded(vec![investigation(1, InvestigationStatus::Running)]);
    update(&mut app, ch('R'));
    assert!(app.modal.is_none());
}

#[test]
fn tick_opens_reply_prompt_only_when_idle() {
    let mut replied = investigation(1, InvestigationStatus::Complete);
    replied.has_new_reply = true;
    replied.new_reply_summary = Some("Customer says it works now".into());

    let mut app = loaded(vec![replied.clone()]);
    app.modal = Some(Modal::Create(Default::default()));
    let effects = update(&mut app, Message::Tick);
    assert_eq!(effects.first(), Some(&Effect::ScheduleTick));
    assert!(matches!(app.modal, Some(Modal::Create(_))));

    app.modal = None;
    update(&mut app, Message::Tick);
    let Some(Modal::Reply(prompt)) = &app.modal else {
        panic!("reply prompt should open");
    };
    assert_eq!(prompt.investigation_id, 1);
    assert_eq!(prompt.summary.as_deref(), Some("Customer says it works now"));
}

#[test]
fn tick_does_not_interrupt_checkpoint_review() {
    let mut inv = at_checkpoint(1);
    inv.has_new_reply = true;
    let mut app = loaded(vec![inv]);
    update(&mut app, Message::Tick);
    assert!(app.modal.is_none());
}

#[test]
fn reply_prompt_dismiss_and_approve() {
    let mut replied = investigation(1, InvestigationStatus::Complete);
    replied.has_new_reply = true;
    let mut app = loaded(vec![replied]);
    update(&mut app, Message::Tick);

    let effects = update(&mut app, key(KeyCode::Esc));
    assert_eq!(effects, vec![Effect::DismissReply { investigation_id: 1 }]);
    update(
        &mut app,
        Message::ReplyDismissed {
            investigation_id: 1,
            result: Err(failure("dismiss reply")),
        },
    );
    assert!(matches!(&app.modal, Some(Modal::Reply(p)) if p.error.is_some()));

    type_text(&mut app, "new logs attached");
    let effects = update(&mut app, key(KeyCode::Enter));
    assert_eq!(
        effects,
        vec![Effect::ApproveNewRun {
            investigation_id: 1,
            trigger_summary: "new logs attached".into(),
        }]
    );
    update(
        &mut app,
        Message::NewRunApproved {
            investigation_id: 1,
            result: Ok(3),
        },
    );
    assert!(app.modal.is_none());
    assert!(!app.investigations[0].has_new_reply);
    assert_eq!(app.investigations[0].current_run_number, 3);
}

#[test]
fn modal_owns_keys_and_ctrl_c_always_quits() {
    let mut app = loaded(vec![at_checkpoint(1)]);
    app.modal = Some(Modal::Create(Default::default()));
    update(&mut app, ch('q'));
    assert!(!app.should_quit);
    let Some(Modal::Create(form)) = &app.modal else {
        panic!("create form should stay open");
    };
    assert_eq!(editor::text(&form.ticket), "q");

    update(&mut app, ctrl('c'));
    assert!(app.should_quit);
}

#[test]
fn release_events_are_ignored() {
    let mut app = loaded(vec![investigation(1, InvestigationStatus::Complete)]);
    let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
    release.kind = KeyEventKind::Release;
    update(&mut app, Message::Key(release));
    assert!(!app.should_quit);
}

// ---------------------------------------------------------------------------
// Summary tab: edit, save, post, copy
// ---------------------------------------------------------------------------

fn with_response() -> App {
    let mut app = loaded(vec![investigation(1, InvestigationStatus::Complete)]);
    let effects = update(&mut app, ch('5'));
    assert_eq!(app.active_tab, Tab::Summary);
    assert_eq!(
        effects,
        vec![
            Effect::LoadSummary { investigation_id: 1 },
            Effect::LoadCustomerResponse { investigation_id: 1 },
        ]
    );
    update(
        &mut app,
        Message::CustomerResponseLoaded {
            investigation_id: 1,
            response: Some(CustomerResponse::loaded("Hello".into(), chrono::Utc::now())),
        },
    );
    app
}

#[test]
fn edit_confirm_cancel_returns_to_editor_then_saves() {
    let mut app = with_response();
    update(&mut app, ch('e'));
    type_text(&mut app, "!");
    update(&mut app, ctrl('s'));
    assert!(matches!(app.modal, Some(Modal::Confirm(_))));

    update(&mut app, ch('n'));
    let Some(Modal::Editing(editing)) = &app.modal else {
        panic!("cancel should resume editing");
    };
    assert_eq!(editor::text(&editing.editor), "Hello!");

    update(&mut app, ctrl('s'));
    let effects = update(&mut app, ch('y'));
    assert_eq!(
        effects,
        vec![Effect::SaveResponse {
            investigation_id: 1,
            content: "Hello!".into(),
        }]
    );
    update(
        &mut app,
        Message::ResponseSaved {
            investigation_id: 1,
            content: "Hello!".into(),
            result: Ok(()),
        },
    );
    assert!(app.modal.is_none());
    assert_eq!(app.responses[&1].content, "Hello!");
}

#[test]
fn post_marks_response_and_hides_repost() {
    let mut app = with_response();
    update(&mut app, ch('p'));
    let effects = update(&mut app, key(KeyCode::Enter));
    assert_eq!(effects, vec![Effect::PostResponse { investigation_id: 1 }]);
    update(
        &mut app,
        Message::ResponsePosted {
            investigation_id: 1,
            result: Ok(()),
        },
    );
    assert!(app.responses[&1].posted);
    assert!(app.modal.is_none());

    update(&mut app, ch('p'));
    assert!(app.modal.is_none());
}

#[test]
fn copy_sends_current_content() {
    let mut app = with_response();
    let effects = update(&mut app, ch('c'));
    assert_eq!(
        effects,
        vec![Effect::CopyResponse {
            investigation_id: 1,
            content: "Hello".into(),
        }]
    );
    update(&mut app, Message::ResponseCopied { investigation_id: 1 });
    assert!(app.responses[&1].copied);
}

#[test]
fn page_keys_scroll_logs_once_layout_is_known() {
    let mut app = loaded(vec![investigation(1, InvestigationStatus::Running)]);
    update(&mut app, key(KeyCode::PageUp));
    assert_eq!(app.log_scroll, 0);

    update(&mut app, Message::Resize { width: 120, height: 40 });
    update(&mut app, key(KeyCode::PageUp));
    update(&mut app, key(KeyCode::PageUp));
    update(&mut app, key(KeyCode::PageDown));
    assert_eq!(app.log_scroll, 5);
}
