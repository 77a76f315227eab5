//! Effects run against real collaborators rooted in a temp directory.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{post, put};
use axum::Router;
use td_core::config::Config;
use td_tui::clipboard::Clipboard;
use td_tui::effect::Effect;
use td_tui::error::{CollabError, EffectError};
use td_tui::executor::Collaborators;
use td_tui::message::Message;

#[derive(Clone, Default)]
struct RecordingClipboard(Arc<Mutex<Vec<String>>>);

impl Clipboard for RecordingClipboard {
    fn set(&mut self, contents: &str) -> Result<(), CollabError> {
        self.0.lock().unwrap().push(contents.to_string());
        Ok(())
    }
}

struct FailingClipboard;

impl Clipboard for FailingClipboard {
    fn set(&mut self, _contents: &str) -> Result<(), CollabError> {
        Err(CollabError::Clipboard("no display".into()))
    }
}

fn collaborators(root: &std::path::Path) -> Collaborators {
    let mut cfg = Config::default();
    cfg.paths.investigations_dir = root.display().to_string();
    cfg.cli.path = "/nonexistent/triage-cli".into();
    cfg.sync.tick_ms = 100;
    Collaborators::from_config(&cfg)
}

#[tokio::test]
async fn saved_response_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let collab = collaborators(dir.path());

    let msg = collab
        .execute(Effect::SaveResponse {
            investigation_id: 4,
            content: "Hi Acme,\n\nFixed in 2.3.1.".into(),
        })
        .await;
    let Message::ResponseSaved { result, content, .. } = msg else {
        panic!("unexpected message");
    };
    assert!(result.is_ok());
    assert_eq!(content, "Hi Acme,\n\nFixed in 2.3.1.");

    let msg = collab
        .execute(Effect::LoadCustomerResponse { investigation_id: 4 })
        .await;
    let Message::CustomerResponseLoaded {
        investigation_id,
        response: Some(response),
    } = msg
    else {
        panic!("unexpected message");
    };
    assert_eq!(investigation_id, 4);
    assert_eq!(response.content, "Hi Acme,\n\nFixed in 2.3.1.");
    assert!(!response.posted);
}

#[tokio::test]
async fn missing_files_load_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let collab = collaborators(dir.path());

    let msg = collab
        .execute(Effect::LoadAgentLogs {
            investigation_id: 1,
            agent: "slack".into(),
        })
        .await;
    assert!(matches!(msg, Message::AgentLogsLoaded { ref logs, .. } if logs.is_empty()));

    let msg = collab.execute(Effect::LoadSummary { investigation_id: 1 }).await;
    assert!(matches!(msg, Message::SummaryLoaded { summary: None, .. }));

    let msg = collab
        .execute(Effect::LoadPhase1Findings { investigation_id: 1 })
        .await;
    assert!(matches!(msg, Message::Phase1FindingsLoaded { content: None, .. }));
}

#[tokio::test]
async fn findings_are_parsed_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let inv_dir = dir.path().join("9");
    std::fs::create_dir_all(&inv_dir).unwrap();
    std::fs::write(
        inv_dir.join("linear-findings.md"),
        "## ENG-123 open\n- same stack trace\n",
    )
    .unwrap();
    let collab = collaborators(dir.path());

    let msg = collab
        .execute(Effect::LoadAgentFindings {
            investigation_id: 9,
            agent: "Linear".into(),
        })
        .await;
    let Message::AgentFindingsLoaded { findings, .. } = msg else {
        panic!("unexpected message");
    };
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].title, "ENG-123 open");
}

#[tokio::test]
async fn collaborator_failure_names_operation_and_target() {
    let dir = tempfile::tempdir().unwrap();
    let collab = collaborators(dir.path());

    let msg = collab
        .execute(Effect::LoadAgentStatuses { investigation_id: 3 })
        .await;
    let Message::Failed(EffectError { op, target, source }) = msg else {
        panic!("unexpected message");
    };
    assert_eq!(op, "load agent statuses");
    assert_eq!(target, "investigation 3");
    assert!(matches!(source, CollabError::Spawn { .. }));
}

#[tokio::test]
async fn create_failure_is_carried_in_result() {
    let dir = tempfile::tempdir().unwrap();
    let collab = collaborators(dir.path());

    let msg = collab
        .execute(Effect::CreateInvestigation {
            ticket_id: "8314".into(),
            skill: "troubleshoot".into(),
            context: None,
        })
        .await;
    let Message::InvestigationCreated(Err(e)) = msg else {
        panic!("unexpected message");
    };
    assert!(e.to_string().starts_with("create investigation (ticket 8314)"));
}

#[tokio::test]
async fn copy_uses_injected_clipboard() {
    let dir = tempfile::tempdir().unwrap();
    let clipboard = RecordingClipboard::default();
    let collab = collaborators(dir.path()).with_clipboard(Box::new(clipboard.clone()));

    let msg = collab
        .execute(Effect::CopyResponse {
            investigation_id: 2,
            content: "thanks!".into(),
        })
        .await;
    assert!(matches!(msg, Message::ResponseCopied { investigation_id: 2 }));
    assert_eq!(*clipboard.0.lock().unwrap(), vec!["thanks!".to_string()]);
}

#[tokio::test]
async fn clipboard_failure_surfaces() {
    let dir = tempfile::tempdir().unwrap();
    let collab = collaborators(dir.path()).with_clipboard(Box::new(FailingClipboard));

    let msg = collab
        .execute(Effect::CopyResponse {
            investigation_id: 2,
            content: "thanks!".into(),
        })
        .await;
    assert!(matches!(
        msg,
        Message::Failed(EffectError {
            source: CollabError::Clipboard(_),
            ..
        })
    ));
}

#[tokio::test]
async fn schedule_tick_sleeps_then_ticks() {
    let dir = tempfile::tempdir().unwrap();
    let collab = collaborators(dir.path());
    let started = std::time::Instant::now();
    let msg = collab.execute(Effect::ScheduleTick).await;
    assert!(matches!(msg, Message::Tick));
    assert!(started.elapsed() >= std::time::Duration::from_millis(100));
}

/// Control-plane routes hit, as `(route, id)`.
type Hits = Arc<Mutex<Vec<(&'static str, i64)>>>;

/// Mock control plane where updating investigation 500 fails.
async fn start_control_plane() -> (String, Hits) {
    let hits: Hits = Arc::default();
    let router = Router::new()
        .route(
            "/api/investigations/{id}",
            put(|State(hits): State<Hits>, Path(id): Path<i64>| async move {
                hits.lock().unwrap().push(("update", id));
                if id == 500 {
                    StatusCode::INTERNAL_SERVER_ERROR
                } else {
                    StatusCode::OK
                }
            }),
        )
        .route(
            "/api/investigations/{id}/checkpoint",
            post(|State(hits): State<Hits>, Path(id): Path<i64>| async move {
                hits.lock().unwrap().push(("checkpoint", id));
                StatusCode::OK
            }),
        )
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}"), hits)
}

fn update_then_approve(investigation_id: i64) -> (Effect, Effect) {
    let approve = Effect::ApproveCheckpoint {
        investigation_id,
        checkpoint: "checkpoint_1_post_classification".into(),
    };
    let fields = BTreeMap::from([("priority".to_string(), "P1".to_string())]);
    let update = Effect::UpdateInvestigation {
        investigation_id,
        fields,
        then: Some(Box::new(approve.clone())),
    };
    (update, approve)
}

fn collaborators_with_api(root: &std::path::Path, base_url: String) -> Collaborators {
    let mut cfg = Config::default();
    cfg.paths.investigations_dir = root.display().to_string();
    cfg.api.base_url = base_url;
    Collaborators::from_config(&cfg)
}

#[tokio::test]
async fn successful_update_hands_back_the_approval() {
    let dir = tempfile::tempdir().unwrap();
    let (base, hits) = start_control_plane().await;
    let collab = collaborators_with_api(dir.path(), base);
    let (update, approve) = update_then_approve(12);

    let msg = collab.execute(update).await;
    let Message::InvestigationUpdated {
        investigation_id,
        next,
    } = msg
    else {
        panic!("unexpected message");
    };
    assert_eq!(investigation_id, 12);
    assert_eq!(next.as_deref(), Some(&approve));
    // The approval is returned, not sent.
    assert_eq!(*hits.lock().unwrap(), vec![("update", 12)]);

    let msg = collab.execute(*next.unwrap()).await;
    assert!(matches!(msg, Message::CheckpointApproved { investigation_id: 12 }));
    assert_eq!(
        *hits.lock().unwrap(),
        vec![("update", 12), ("checkpoint", 12)]
    );
}

#[tokio::test]
async fn failed_update_drops_the_approval() {
    let dir = tempfile::tempdir().unwrap();
    let (base, hits) = start_control_plane().await;
    let collab = collaborators_with_api(dir.path(), base);
    let (update, _) = update_then_approve(500);

    let msg = collab.execute(update).await;
    let Message::Failed(EffectError { op, target, source }) = msg else {
        panic!("unexpected message");
    };
    assert_eq!(op, "update investigation");
    assert_eq!(target, "investigation 500");
    assert!(matches!(source, CollabError::Http { status: 500 }));
    assert_eq!(*hits.lock().unwrap(), vec![("update", 500)]);
}
