use std::time::Duration;

use sift_core::error::TrackError;
use sift_core::tracker::{DecisionReport, DecisionReporter, ReportFuture, TrackAck};

const TRACK_PATH: &str = "track-decision";

/// Reports decisions with `POST {base_url}/track-decision`.
///
/// One attempt per decision: no retry, no backoff, no offline queue.
pub struct HttpDecisionReporter {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpDecisionReporter {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, TrackError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TrackError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: format!("{}/{TRACK_PATH}", base_url.trim_end_matches('/')),
            token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl DecisionReporter for HttpDecisionReporter {
    fn report(&self, report: DecisionReport) -> ReportFuture {
        let mut req = self.http.post(&self.endpoint).json(&report);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let pending = req.send();

        Box::pin(async move {
            let resp = pending
                .await
                .map_err(|e| TrackError::Transport(format!("HTTP request failed: {e}")))?;

            if !resp.status().is_success() {
                let status = resp.status().as_u16();
                let body = resp.text().await.unwrap_or_default();
                return Err(TrackError::Status { status, body });
            }

            resp.json::<TrackAck>()
                .await
                .map_err(|e| TrackError::Decode(format!("Failed to parse response: {e}")))
        })
    }
}
