//! Process client for the investigation CLI.
//!
//! Every call spawns `<program> <args…>` and decodes its stdout as JSON. A
//! nonzero exit becomes [`CollabError::Exit`] with stderr and stdout joined.

use std::time::Instant;

use td_api_types::{ApiInvestigation, ApiStatusReport};
use tokio::process::Command;
use tracing::debug;

use crate::error::CollabError;

#[derive(Debug, Clone)]
pub struct CliClient {
    program: String,
}

impl CliClient {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<Vec<u8>, CollabError> {
        let started = Instant::now();
        let output = Command::new(&self.program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| CollabError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        debug!(
            program = %self.program,
            subcommand = args.first().copied().unwrap_or_default(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            status = ?output.status.code(),
            "cli call finished"
        );

        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let stdout = String::from_utf8_lossy(&output.stdout);
            if !stdout.trim().is_empty() {
                if !combined.is_empty() {
                    combined.push('\n');
                }
                combined.push_str(stdout.trim());
            }
            return Err(CollabError::Exit {
                code: output.status.code().unwrap_or(-1),
                output: combined,
            });
        }
        Ok(output.stdout)
    }

    /// `<cli> list --json`
    pub async fn list(&self) -> Result<Vec<ApiInvestigation>, CollabError> {
        let stdout = self.run(&["list", "--json"]).await?;
        // An empty database prints `null`.
        let list: Option<Vec<ApiInvestigation>> = serde_json::from_slice(&stdout)?;
        Ok(list.unwrap_or_default())
    }

    /// `<cli> status <id> --json`
    pub async fn status(&self, id: i64) -> Result<ApiStatusReport, CollabError> {
        let id = id.to_string();
        let stdout = self.run(&["status", &id, "--json"]).await?;
        Ok(serde_json::from_slice(&stdout)?)
    }

    /// `<cli> create --ticket <id> --skill <skill> [--context <text>]`
    pub async fn create(
        &self,
        ticket_id: &str,
        skill: &str,
        context: Option<&str>,
    ) -> Result<(), CollabError> {
        let mut args = vec!["create", "--ticket", ticket_id, "--skill", skill];
        if let Some(context) = context {
            args.extend(["--context", context]);
        }
        self.run(&args).await.map(|_| ())
    }
}
