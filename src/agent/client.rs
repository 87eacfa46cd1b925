//! HTTP client for the counter service.

use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

use crate::agent::window::FailureKind;
use crate::counter::{Action, CounterState, VisitorRequest};

/// Why a call to the counter service failed.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// No HTTP response: timeout, refused connection, DNS failure.
    #[error("connection failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Non-success status from the service.
    #[error("failed: status {status}")]
    Upstream { status: StatusCode, body: String },
}

impl ProbeError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ProbeError::Transport(_) => FailureKind::Transport,
            ProbeError::Upstream { .. } => FailureKind::Upstream,
        }
    }
}

/// Client for the `/visitor` and `/health` endpoints.
///
/// Built once at startup; every request carries the same timeout.
#[derive(Debug, Clone)]
pub struct CounterClient {
    client: Client,
    base_url: String,
}

impl CounterClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /visitor` with the given action.
    ///
    /// Any 2xx status is a success. The counters are `None` when the body
    /// is not a counter state.
    pub async fn increment(&self, action: Action) -> Result<Option<CounterState>, ProbeError> {
        let resp = self
            .client
            .post(format!("{}/visitor", self.base_url))
            .json(&VisitorRequest { action })
            .send()
            .await
            .map_err(ProbeError::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProbeError::Upstream { status, body });
        }

        match resp.json::<CounterState>().await {
            Ok(state) => Ok(Some(state)),
            Err(e) if e.is_decode() => {
                tracing::warn!(status = status.as_u16(), error = %e, "Success response with undecodable body");
                Ok(None)
            }
            Err(e) => Err(ProbeError::Transport(e)),
        }
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<(), ProbeError> {
        let resp = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(ProbeError::Transport)?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(ProbeError::Upstream { status, body })
        }
    }
}
