//! Async HTTP client for the investigation control plane.
//!
//! Anything other than `200 OK` is a failure carrying the status code.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use td_api_types::{ApiAgentRecord, CheckpointRequest, RunTriggerRequest, RunTriggerResponse};
use tracing::debug;

use crate::error::CollabError;

/// Reusable client + base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base: String,
}

impl ApiClient {
    pub fn new(base: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn check(
        resp: reqwest::Response,
        method: &str,
        path: &str,
    ) -> Result<reqwest::Response, CollabError> {
        let status = resp.status();
        debug!(method, path, status = status.as_u16(), "control plane response");
        if status != StatusCode::OK {
            return Err(CollabError::Http {
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, CollabError> {
        let resp = self
            .client
            .get(self.url(path))
            .header("Accept", "application/json")
            .send()
            .await?;
        Ok(Self::check(resp, "GET", path)?.json::<T>().await?)
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, CollabError> {
        let resp = self
            .client
            .request(method.clone(), self.url(path))
            .json(body)
            .send()
            .await?;
        Self::check(resp, method.as_str(), path)
    }

    /// `GET /api/investigations/<id>/agents`
    pub async fn fetch_agents(&self, id: i64) -> Result<Vec<ApiAgentRecord>, CollabError> {
        self.get(&format!("/api/investigations/{id}/agents")).await
    }

    /// `PUT /api/investigations/<id>` with a partial field map.
    pub async fn update_investigation(
        &self,
        id: i64,
        fields: &BTreeMap<String, String>,
    ) -> Result<(), CollabError> {
        self.send_json(reqwest::Method::PUT, &format!("/api/investigations/{id}"), fields)
            .await
            .map(|_| ())
    }

    /// `POST /api/investigations/<id>/checkpoint`
    pub async fn approve_checkpoint(&self, id: i64, checkpoint: &str) -> Result<(), CollabError> {
        self.send_json(
            reqwest::Method::POST,
            &format!("/api/investigations/{id}/checkpoint"),
            &CheckpointRequest::confirm(checkpoint),
        )
        .await
        .map(|_| ())
    }

    /// `POST /api/investigations/<id>/hard-reset`; returns the new run number.
    pub async fn hard_reset(&self, id: i64, trigger_summary: &str) -> Result<u32, CollabError> {
        self.run_trigger(id, "hard-reset", trigger_summary).await
    }

    /// `POST /api/investigations/<id>/approve-new-run`; returns the new run number.
    pub async fn approve_new_run(&self, id: i64, trigger_summary: &str) -> Result<u32, CollabError> {
        self.run_trigger(id, "approve-new-run", trigger_summary).await
    }

    async fn run_trigger(
        &self,
        id: i64,
        action: &str,
        trigger_summary: &str,
    ) -> Result<u32, CollabError> {
        let resp = self
            .send_json(
                reqwest::Method::POST,
                &format!("/api/investigations/{id}/{action}"),
                &RunTriggerRequest {
                    trigger_summary: trigger_summary.to_string(),
                },
            )
            .await?;
        let body: RunTriggerResponse = resp.json().await?;
        Ok(body.new_run_number)
    }

    /// `POST /api/investigations/<id>/dismiss-reply`
    pub async fn dismiss_reply(&self, id: i64) -> Result<(), CollabError> {
        self.send_json(
            reqwest::Method::POST,
            &format!("/api/investigations/{id}/dismiss-reply"),
            &serde_json::json!({}),
        )
        .await
        .map(|_| ())
    }
}
