//! Runs one [`Effect`] against the external collaborators and turns the
//! outcome into exactly one [`Message`].

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::Utc;
use td_core::config::{AgentSource, Config};
use td_core::store::InvestigationStore;
use td_core::types::{AgentState, Investigation};
use tracing::{debug, warn};

use crate::api_client::ApiClient;
use crate::cli_client::CliClient;
use crate::clipboard::{Clipboard, SystemClipboard};
use crate::effect::Effect;
use crate::error::{CollabError, EffectError};
use crate::message::Message;

pub struct Collaborators {
    pub cli: CliClient,
    pub api: ApiClient,
    pub store: InvestigationStore,
    pub clipboard: Arc<Mutex<Box<dyn Clipboard>>>,
    pub agent_source: AgentSource,
    pub tick: Duration,
    pub log_window: usize,
}

impl Collaborators {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            cli: CliClient::new(cfg.cli.path.clone()),
            api: ApiClient::new(&cfg.api.base_url, Duration::from_secs(cfg.api.timeout_secs)),
            store: InvestigationStore::new(
                cfg.paths.investigations_root(),
                cfg.paths.legacy_run_dir.clone(),
            ),
            clipboard: Arc::new(Mutex::new(Box::new(SystemClipboard::new()))),
            agent_source: cfg.sync.agent_source,
            tick: Duration::from_millis(cfg.sync.tick_ms),
            log_window: cfg.sync.log_window,
        }
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = Arc::new(Mutex::new(clipboard));
        self
    }

    pub async fn execute(&self, effect: Effect) -> Message {
        let op = effect.op();
        let target = effect.target();
        let started = Instant::now();
        if effect != Effect::ScheduleTick {
            debug!(op, %target, "effect dispatched");
        }

        let msg = self.run(effect, op, &target).await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &msg {
            Message::Failed(e) => warn!(op, %target, elapsed_ms, error = %e.source, "effect failed"),
            Message::Tick => {}
            _ => debug!(op, %target, elapsed_ms, "effect completed"),
        }
        msg
    }

    async fn list_investigations(&self) -> Result<Vec<Investigation>, CollabError> {
        let list = self.cli.list().await?;
        Ok(list.into_iter().map(Investigation::from).collect())
    }

    async fn run(&self, effect: Effect, op: &'static str, target: &str) -> Message {
        let err = |source: CollabError| EffectError::new(op, target, source);
        let failed = |source: CollabError| Message::Failed(err(source));

        match effect {
            Effect::ListInvestigations => match self.list_investigations().await {
                Ok(list) => Message::InvestigationsLoaded(list),
                Err(e) => failed(e),
            },
            Effect::RefreshInvestigations => match self.list_investigations().await {
                Ok(list) => Message::InvestigationsRefreshed(list),
                Err(e) => failed(e),
            },
            Effect::LoadAgentStatuses { investigation_id } => {
                let records = match self.agent_source {
                    AgentSource::Cli => self.cli.status(investigation_id).await.map(|r| r.agents),
                    AgentSource::Api => self.api.fetch_agents(investigation_id).await,
                };
                match records {
                    Ok(records) => {
                        let now = Utc::now();
                        Message::AgentStatusesLoaded {
                            investigation_id,
                            agents: records
                                .into_iter()
                                .filter(|r| !r.agent_name.trim().is_empty())
                                .map(|r| AgentState::from_record(r, now))
                                .collect(),
                        }
                    }
                    Err(e) => failed(e),
                }
            }
            Effect::LoadAgentLogs {
                investigation_id,
                agent,
            } => match self
                .store
                .agent_logs(investigation_id, &agent, self.log_window)
                .await
            {
                Ok(logs) => Message::AgentLogsLoaded {
                    investigation_id,
                    agent,
                    logs,
                },
                Err(e) => failed(e.into()),
            },
            Effect::LoadAgentFindings {
                investigation_id,
                agent,
            } => match self.store.agent_findings(investigation_id, &agent).await {
                Ok(findings) => Message::AgentFindingsLoaded {
                    investigation_id,
                    agent,
                    findings,
                },
                Err(e) => failed(e.into()),
            },
            Effect::LoadSummary { investigation_id } => {
                match self.store.summary(investigation_id).await {
                    Ok(summary) => Message::SummaryLoaded {
                        investigation_id,
                        summary,
                    },
                    Err(e) => failed(e.into()),
                }
            }
            Effect::LoadCustomerResponse { investigation_id } => {
                match self.store.customer_response(investigation_id).await {
                    Ok(response) => Message::CustomerResponseLoaded {
                        investigation_id,
                        response,
                    },
                    Err(e) => failed(e.into()),
                }
            }
            Effect::LoadTicketData { investigation_id } => {
                match self.store.ticket_data(investigation_id).await {
                    Ok(data) => Message::TicketDataLoaded {
                        investigation_id,
                        data,
                    },
                    Err(e) => failed(e.into()),
                }
            }
            Effect::LoadPhase1Findings { investigation_id } => {
                match self.store.phase1_findings(investigation_id).await {
                    Ok(content) => Message::Phase1FindingsLoaded {
                        investigation_id,
                        content,
                    },
                    Err(e) => failed(e.into()),
                }
            }
            Effect::ApproveCheckpoint {
                investigation_id,
                checkpoint,
            } => match self.api.approve_checkpoint(investigation_id, &checkpoint).await {
                Ok(()) => Message::CheckpointApproved { investigation_id },
                Err(e) => failed(e),
            },
            Effect::UpdateInvestigation {
                investigation_id,
                fields,
                then,
            } => match self.api.update_investigation(investigation_id, &fields).await {
                Ok(()) => Message::InvestigationUpdated {
                    investigation_id,
                    next: then,
                },
                Err(e) => failed(e),
            },
            Effect::CreateInvestigation {
                ticket_id,
                skill,
                context,
            } => Message::InvestigationCreated(
                self.cli
                    .create(&ticket_id, &skill, context.as_deref())
                    .await
                    .map_err(err),
            ),
            Effect::HardReset {
                investigation_id,
                trigger_summary,
            } => Message::InvestigationReset {
                investigation_id,
                result: self
                    .api
                    .hard_reset(investigation_id, &trigger_summary)
                    .await
                    .map_err(err),
            },
            Effect::ApproveNewRun {
                investigation_id,
                trigger_summary,
            } => Message::NewRunApproved {
                investigation_id,
                result: self
                    .api
                    .approve_new_run(investigation_id, &trigger_summary)
                    .await
                    .map_err(err),
            },
            Effect::DismissReply { investigation_id } => Message::ReplyDismissed {
                investigation_id,
                result: self.api.dismiss_reply(investigation_id).await.map_err(err),
            },
            Effect::SaveResponse {
                investigation_id,
                content,
            } => {
                let result = self
                    .store
                    .save_customer_response(investigation_id, &content)
                    .await
                    .map_err(|e| err(e.into()));
                Message::ResponseSaved {
                    investigation_id,
                    content,
                    result,
                }
            }
            // Posting itself happens upstream; this confirms the
            // investigation is known to the CLI.
            Effect::PostResponse { investigation_id } => Message::ResponsePosted {
                investigation_id,
                result: self
                    .cli
                    .status(investigation_id)
                    .await
                    .map(|_| ())
                    .map_err(err),
            },
            Effect::CopyResponse {
                investigation_id,
                content,
            } => {
                let clipboard = Arc::clone(&self.clipboard);
                let result = tokio::task::spawn_blocking(move || {
                    let mut clipboard = clipboard
                        .lock()
                        .map_err(|_| CollabError::Clipboard("clipboard lock poisoned".into()))?;
                    clipboard.set(&content)
                })
                .await
                .unwrap_or_else(|e| Err(CollabError::Clipboard(e.to_string())));
                match result {
                    Ok(()) => Message::ResponseCopied { investigation_id },
                    Err(e) => failed(e),
                }
            }
            Effect::ScheduleTick => {
                tokio::time::sleep(self.tick).await;
                Message::Tick
            }
        }
    }
}
