//! Read-mostly access to the per-investigation directory tree.
//!
//! Each investigation lives at `<root>/<id>/`. Older runs wrote into a
//! versioned subdirectory (`<root>/<id>/investigation-1/`), so every file
//! lookup tries the root location first and then that fallback. A missing
//! file is never an error: callers get `None` or an empty list, which the
//! dashboard renders as "not started yet".

use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::Utc;
use td_api_types::TicketDataFile;
use tracing::debug;

use crate::parse;
use crate::types::{
    canonical_agent_name, CustomerResponse, Finding, InvestigationId, InvestigationSummary,
    LogEntry, TicketData,
};

pub const ACTIVITY_LOG: &str = "activity-log.jsonl";
pub const SUMMARY: &str = "summary.md";
pub const CUSTOMER_RESPONSE: &str = "customer-response.md";
pub const TICKET_DATA: &str = "ticket-data.json";
pub const PHASE1_FINDINGS: &str = "phase1-findings.md";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone)]
pub struct InvestigationStore {
    root: PathBuf,
    legacy_run_dir: String,
}

impl InvestigationStore {
    pub fn new(root: impl Into<PathBuf>, legacy_run_dir: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            legacy_run_dir: legacy_run_dir.into(),
        }
    }

    fn primary_dir(&self, id: InvestigationId) -> PathBuf {
        self.root.join(id.to_string())
    }

    fn candidates(&self, id: InvestigationId, file: &str) -> [PathBuf; 2] {
        let dir = self.primary_dir(id);
        [dir.join(file), dir.join(&self.legacy_run_dir).join(file)]
    }

    /// First existing location of `file` for `id`.
    pub async fn locate(&self, id: InvestigationId, file: &str) -> Option<PathBuf> {
        for path in self.candidates(id, file) {
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                return Some(path);
            }
        }
        None
    }

    async fn read_optional(&self, id: InvestigationId, file: &str) -> Result<Option<String>> {
        let Some(path) = self.locate(id, file).await else {
            debug!(investigation = id, file, "not present");
            return Ok(None);
        };
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            // Removed between the existence check and the read.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    /// Newest `limit` log entries for `agent`. The consolidated activity log
    /// wins when present; otherwise the legacy `<agent>-agent.log`.
    pub async fn agent_logs(
        &self,
        id: InvestigationId,
        agent: &str,
        limit: usize,
    ) -> Result<Vec<LogEntry>> {
        if let Some(text) = self.read_optional(id, ACTIVITY_LOG).await? {
            return Ok(parse::parse_activity_log(&text, agent, limit));
        }
        let legacy = format!("{}-agent.log", canonical_agent_name(agent));
        Ok(self
            .read_optional(id, &legacy)
            .await?
            .map(|text| parse::parse_agent_log(&text, limit))
            .unwrap_or_default())
    }

    pub async fn agent_findings(&self, id: InvestigationId, agent: &str) -> Result<Vec<Finding>> {
        let file = format!("{}-findings.md", canonical_agent_name(agent));
        Ok(self
            .read_optional(id, &file)
            .await?
            .map(|text| parse::parse_findings(&text))
            .unwrap_or_default())
    }

    pub async fn summary(&self, id: InvestigationId) -> Result<Option<InvestigationSummary>> {
        Ok(self
            .read_optional(id, SUMMARY)
            .await?
            .map(|text| parse::parse_summary(&text, Utc::now())))
    }

    pub async fn customer_response(&self, id: InvestigationId) -> Result<Option<CustomerResponse>> {
        Ok(self
            .read_optional(id, CUSTOMER_RESPONSE)
            .await?
            .map(|text| CustomerResponse::loaded(text, Utc::now())))
    }

    /// Write the response verbatim, next to the existing file when there is
    /// one, else at the root location.
    pub async fn save_customer_response(&self, id: InvestigationId, content: &str) -> Result<()> {
        let path = match self.locate(id, CUSTOMER_RESPONSE).await {
            Some(path) => path,
            None => {
                let dir = self.primary_dir(id);
                tokio::fs::create_dir_all(&dir)
                    .await
                    .map_err(|source| StoreError::Io {
                        path: dir.clone(),
                        source,
                    })?;
                dir.join(CUSTOMER_RESPONSE)
            }
        };
        tokio::fs::write(&path, content.as_bytes())
            .await
            .map_err(|source| StoreError::Io { path, source })
    }

    pub async fn ticket_data(&self, id: InvestigationId) -> Result<Option<TicketData>> {
        let Some(text) = self.read_optional(id, TICKET_DATA).await? else {
            return Ok(None);
        };
        let file: TicketDataFile =
            serde_json::from_str(&text).map_err(|e| StoreError::Decode {
                path: self.primary_dir(id).join(TICKET_DATA),
                message: e.to_string(),
            })?;
        Ok(Some(file.into()))
    }

    /// Combined findings from the context-gathering phase; blank files read
    /// as absent.
    pub async fn phase1_findings(&self, id: InvestigationId) -> Result<Option<String>> {
        Ok(self
            .read_optional(id, PHASE1_FINDINGS)
            .await?
            .filter(|text| !text.trim().is_empty()))
    }
}
