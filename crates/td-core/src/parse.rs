//! Heuristic readers for the flat files an investigation writes: markdown
//! findings, the markdown summary, and JSONL activity logs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use td_api_types::{ActivityLogLine, AgentLogLine};

use crate::types::{canonical_agent_name, Finding, InvestigationSummary, LogEntry, AGENTS};

/// `## Title` starts a finding, `- detail` bullets attach to it. Anything
/// before the first heading is ignored.
pub fn parse_findings(markdown: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut current: Option<Finding> = None;

    for line in markdown.lines() {
        let trimmed = line.trim();
        if let Some(title) = trimmed.strip_prefix("## ") {
            if let Some(done) = current.take() {
                findings.push(done);
            }
            current = Some(Finding {
                title: title.trim().to_string(),
                details: Vec::new(),
            });
        } else if let (Some(finding), Some(detail)) = (current.as_mut(), trimmed.strip_prefix("- "))
        {
            finding.details.push(detail.to_string());
        }
    }

    findings.extend(current);
    findings
}

/// Parse `summary.md`. Sections are `## Root Cause`, `## Key Findings`
/// (grouped under `### Agent` or `**Agent:**` lines), `## Open Questions`
/// and `## Next Steps`.
pub fn parse_summary(markdown: &str, loaded_at: DateTime<Utc>) -> InvestigationSummary {
    let mut root_cause: Vec<&str> = Vec::new();
    let mut key_findings: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut open_questions = Vec::new();
    let mut next_steps = Vec::new();

    let mut section = "";
    let mut agent: Option<&'static str> = None;

    for line in markdown.lines() {
        let trimmed = line.trim();

        if let Some(heading) = trimmed.strip_prefix("## ") {
            section = heading.trim();
            continue;
        }

        if trimmed.starts_with("### ") || trimmed.starts_with("**") {
            let label = canonical_agent_name(trimmed.trim_start_matches('#'));
            if let Some(found) = AGENTS.iter().find(|a| label.contains(*a)) {
                agent = Some(*found);
            }
            continue;
        }

        let bullet = trimmed.strip_prefix("- ");
        match (section, bullet) {
            ("Root Cause", _) if !trimmed.is_empty() => root_cause.push(trimmed),
            ("Key Findings", Some(item)) => {
                if let Some(name) = agent {
                    key_findings
                        .entry(name.to_string())
                        .or_default()
                        .push(item.to_string());
                }
            }
            ("Open Questions", Some(item)) => open_questions.push(item.to_string()),
            ("Next Steps", Some(item)) => next_steps.push(item.to_string()),
            _ => {}
        }
    }

    InvestigationSummary {
        root_cause: root_cause.join(" "),
        key_findings,
        open_questions,
        next_steps,
        loaded_at,
    }
}

/// Legacy per-agent JSONL log; returns at most the last `limit` entries.
pub fn parse_agent_log(text: &str, limit: usize) -> Vec<LogEntry> {
    let entries: Vec<LogEntry> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| serde_json::from_str::<AgentLogLine>(l).ok())
        .map(|line| LogEntry {
            timestamp: parse_ts(&line.ts),
            level: line.level,
            message: line.msg,
        })
        .collect();
    tail(entries, limit)
}

/// Consolidated `activity-log.jsonl`, keeping lines tagged for `agent`
/// (by their `agent` field, else their `phase` tag).
pub fn parse_activity_log(text: &str, agent: &str, limit: usize) -> Vec<LogEntry> {
    let wanted = canonical_agent_name(agent);
    let entries: Vec<LogEntry> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| serde_json::from_str::<ActivityLogLine>(l).ok())
        .filter(|line| {
            line.agent
                .as_deref()
                .or(line.phase.as_deref())
                .map(canonical_agent_name)
                .is_some_and(|tag| tag == wanted)
        })
        .map(|line| LogEntry {
            timestamp: parse_ts(&line.ts),
            level: line.kind.unwrap_or_else(|| "info".to_string()),
            message: line.message,
        })
        .collect();
    tail(entries, limit)
}

fn tail(mut entries: Vec<LogEntry>, limit: usize) -> Vec<LogEntry> {
    if entries.len() > limit {
        entries.drain(..entries.len() - limit);
    }
    entries
}

fn parse_ts(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
