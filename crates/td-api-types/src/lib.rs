//! Wire types shared by the triage dashboard's collaborators.
//!
//! Three external sources speak JSON to the dashboard: the investigation CLI
//! (`list --json`, `status <id> --json`), the HTTP control plane, and the
//! JSON / JSONL files an investigation leaves on disk. Every field the
//! upstream tools may omit or null out is `#[serde(default)]` so a partial
//! payload still decodes.

use serde::{Deserialize, Deserializer, Serialize};

// ── CLI payloads ──

/// One row of `<cli> list --json`, also embedded in `status --json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiInvestigation {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub classification: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub connector_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_area: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_checkpoint: String,
    #[serde(default)]
    pub current_run_number: Option<u32>,
    /// SQLite stores this as `0`/`1`; newer builds emit a bool.
    #[serde(default, deserialize_with = "flag")]
    pub has_new_reply: bool,
    #[serde(default)]
    pub new_reply_summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub updated_at: String,
}

/// One agent row of `<cli> status <id> --json` and of
/// `GET /api/investigations/<id>/agents`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiAgentRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub investigation_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub agent_name: String,
    #[serde(default)]
    pub pid: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default)]
    pub findings_file: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
}

/// Full payload of `<cli> status <id> --json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiStatusReport {
    pub investigation: ApiInvestigation,
    #[serde(default)]
    pub agents: Vec<ApiAgentRecord>,
}

// ── Control-plane request / response bodies ──

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckpointRequest {
    pub action: String,
    pub checkpoint: String,
}

impl CheckpointRequest {
    pub fn confirm(checkpoint: impl Into<String>) -> Self {
        Self {
            action: "confirm".to_string(),
            checkpoint: checkpoint.into(),
        }
    }
}

/// Body of `hard-reset` and `approve-new-run`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunTriggerRequest {
    pub trigger_summary: String,
}

/// Response of `hard-reset` and `approve-new-run`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTriggerResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub previous_run_number: Option<u32>,
    pub new_run_number: u32,
    #[serde(default)]
    pub message: Option<String>,
}

// ── On-disk files ──

/// `ticket-data.json`, written by the classification phase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TicketDataFile {
    #[serde(default)]
    pub ticket_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub classification: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_area: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: String,
    #[serde(default)]
    pub connector_name: Option<String>,
    #[serde(default)]
    pub pylon_link: Option<String>,
}

/// A line of the legacy per-agent `<agent>-agent.log`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentLogLine {
    #[serde(default)]
    pub ts: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub msg: String,
}

/// A line of the consolidated `activity-log.jsonl`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityLogLine {
    #[serde(default)]
    pub ts: String,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub agent: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(n)) => n != 0,
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn investigation_tolerates_nulls_and_int_flags() {
        let json = r#"{
            "id": 8314,
            "customer_name": "Acme",
            "connector_name": null,
            "status": "waiting",
            "current_checkpoint": "checkpoint_1_post_classification",
            "has_new_reply": 1
        }"#;
        let inv: ApiInvestigation = serde_json::from_str(json).unwrap();
        assert_eq!(inv.id, 8314);
        assert_eq!(inv.connector_name, "");
        assert!(inv.has_new_reply);
        assert_eq!(inv.current_run_number, None);
    }

    #[test]
    fn bool_reply_flag_is_accepted() {
        let inv: ApiInvestigation =
            serde_json::from_str(r#"{"id": 1, "has_new_reply": false}"#).unwrap();
        assert!(!inv.has_new_reply);
    }

    #[test]
    fn run_trigger_response_uses_camel_case() {
        let resp: RunTriggerResponse =
            serde_json::from_str(r#"{"success":true,"previousRunNumber":1,"newRunNumber":2}"#)
                .unwrap();
        assert_eq!(resp.new_run_number, 2);
        assert_eq!(resp.previous_run_number, Some(1));
    }

    #[test]
    fn activity_line_maps_type_field() {
        let line: ActivityLogLine = serde_json::from_str(
            r#"{"ts":"2025-01-01T00:00:00Z","phase":"slack","type":"info","message":"hi"}"#,
        )
        .unwrap();
        assert_eq!(line.kind.as_deref(), Some("info"));
        assert_eq!(line.phase.as_deref(), Some("slack"));
    }
}
