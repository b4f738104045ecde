//! Best-effort reporting of committed outcomes to a remote collaborator.
//!
//! The engine hands every committed decision to [`InteractionTracker::track`]
//! in the same step as the commit. The report is dispatched on a detached
//! task; its result only ever feeds logs, metrics and the display-only reward
//! tally. Nothing here can fail the caller.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::decision::Outcome;
use crate::error::TrackError;
use crate::events::DeckEvent;
use crate::metrics::DeckMetrics;

/// Wire payload for one decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionReport {
    pub item_id: String,
    pub kept: bool,
}

impl DecisionReport {
    pub fn new(item_id: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            item_id: item_id.into(),
            kept: outcome.is_kept(),
        }
    }
}

/// Remote acknowledgement. `reward_hint` is informational only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_hint: Option<f64>,
}

pub type ReportFuture = Pin<Box<dyn Future<Output = Result<TrackAck, TrackError>> + Send>>;

/// Transport for decision reports, abstracted so tests can stand in for the
/// remote endpoint.
///
/// `report` is called synchronously at commit time, so implementations see
/// reports in decision order. The returned future is driven on a detached
/// task and must not borrow from `self`.
pub trait DecisionReporter: Send + Sync {
    fn report(&self, report: DecisionReport) -> ReportFuture;
}

/// Reporter used when tracking is disabled.
pub struct NoopReporter;

impl DecisionReporter for NoopReporter {
    fn report(&self, _report: DecisionReport) -> ReportFuture {
        Box::pin(async move {
            Ok(TrackAck {
                success: true,
                reward_hint: None,
            })
        })
    }
}

/// How a [`StubReporter`] answers.
#[derive(Debug, Clone)]
pub enum StubResponse {
    Ack(TrackAck),
    Status(u16),
    Transport(String),
}

/// In-process reporter that records every report and answers with a fixed
/// response, optionally after a delay.
pub struct StubReporter {
    response: StubResponse,
    delay: Option<Duration>,
    sent: Mutex<Vec<DecisionReport>>,
}

impl StubReporter {
    pub fn new(response: StubResponse) -> Self {
        Self {
            response,
            delay: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding(reward_hint: Option<f64>) -> Self {
        Self::new(StubResponse::Ack(TrackAck {
            success: true,
            reward_hint,
        }))
    }

    pub fn failing_with_status(status: u16) -> Self {
        Self::new(StubResponse::Status(status))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Reports received so far, in call order.
    pub fn sent(&self) -> Vec<DecisionReport> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl DecisionReporter for StubReporter {
    fn report(&self, report: DecisionReport) -> ReportFuture {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(report);
        }
        let response = self.response.clone();
        let delay = self.delay;
        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            match response {
                StubResponse::Ack(ack) => Ok(ack),
                StubResponse::Status(status) => Err(TrackError::Status {
                    status,
                    body: "stub failure".into(),
                }),
                StubResponse::Transport(msg) => Err(TrackError::Transport(msg)),
            }
        })
    }
}

#[derive(Debug, Default)]
struct RewardTally {
    epoch: u64,
    total: f64,
}

/// Fire-and-forget dispatcher wrapping a [`DecisionReporter`].
pub struct InteractionTracker {
    reporter: Arc<dyn DecisionReporter>,
    metrics: Arc<DeckMetrics>,
    tally: Arc<Mutex<RewardTally>>,
    events: broadcast::Sender<DeckEvent>,
}

impl InteractionTracker {
    pub fn new(
        reporter: Arc<dyn DecisionReporter>,
        metrics: Arc<DeckMetrics>,
        events: broadcast::Sender<DeckEvent>,
    ) -> Self {
        Self {
            reporter,
            metrics,
            tally: Arc::new(Mutex::new(RewardTally::default())),
            events,
        }
    }

    /// Dispatch a report for a committed decision and return immediately.
    pub fn track(&self, item_id: &str, outcome: Outcome) {
        let report = DecisionReport::new(item_id, outcome);
        let epoch = self.current_epoch();

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(item_id, "No async runtime available, decision report dropped");
            self.metrics.record_report_failed();
            return;
        };

        self.metrics.record_report_sent();
        let pending = self.reporter.report(report);

        let item_id = item_id.to_string();
        let metrics = Arc::clone(&self.metrics);
        let tally = Arc::clone(&self.tally);
        let events = self.events.clone();

        handle.spawn(async move {
            match pending.await {
                Ok(ack) if !ack.success => {
                    metrics.record_report_failed();
                    tracing::warn!(item_id = %item_id, "Decision report rejected by remote");
                }
                Ok(ack) => {
                    metrics.record_report_succeeded(ack.reward_hint);
                    tracing::debug!(item_id = %item_id, "Decision reported");

                    let Some(reward) = ack.reward_hint else {
                        return;
                    };
                    match tally.lock() {
                        Ok(mut tally) if tally.epoch == epoch => {
                            tally.total += reward;
                            tracing::info!(item_id = %item_id, reward, "Reward hint received");
                            let _ = events.send(DeckEvent::RewardReported { item_id, reward });
                        }
                        _ => {
                            metrics.record_report_stale();
                            tracing::debug!(item_id = %item_id, "Ignoring reward hint from before reset");
                        }
                    }
                }
                Err(e) => {
                    metrics.record_report_failed();
                    tracing::warn!(item_id = %item_id, error = %e, "Decision report failed");
                }
            }
        });
    }

    /// Start a new session: late acknowledgements from earlier sessions are
    /// dropped and the reward tally restarts at zero.
    pub fn begin_epoch(&self) {
        if let Ok(mut tally) = self.tally.lock() {
            tally.epoch += 1;
            tally.total = 0.0;
        }
    }

    /// Sum of reward hints confirmed in the current session. Display only.
    pub fn reward_total(&self) -> f64 {
        self.tally.lock().map(|t| t.total).unwrap_or_default()
    }

    fn current_epoch(&self) -> u64 {
        self.tally.lock().map(|t| t.epoch).unwrap_or_default()
    }
}
