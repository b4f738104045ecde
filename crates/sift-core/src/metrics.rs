use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Trait for metrics backends. Implementations can forward to Prometheus,
/// StatsD, or simply log metrics.
pub trait MetricsBackend: Send + Sync {
    fn record_counter(&self, name: &str, value: u64);
    fn record_gauge(&self, name: &str, value: f64);
}

/// Atomic counters for engine and reporting activity.
pub struct DeckMetrics {
    pub decisions_committed: AtomicU64,
    pub kept: AtomicU64,
    pub discarded: AtomicU64,
    pub ignored_attempts: AtomicU64,
    pub resets: AtomicU64,
    pub reports_sent: AtomicU64,
    pub reports_succeeded: AtomicU64,
    pub reports_failed: AtomicU64,
    pub reports_stale: AtomicU64,
    backend: Option<Arc<dyn MetricsBackend>>,
}

impl std::fmt::Debug for DeckMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeckMetrics")
            .field("decisions_committed", &self.decisions_committed)
            .field("kept", &self.kept)
            .field("discarded", &self.discarded)
            .field("ignored_attempts", &self.ignored_attempts)
            .field("resets", &self.resets)
            .field("reports_sent", &self.reports_sent)
            .field("reports_succeeded", &self.reports_succeeded)
            .field("reports_failed", &self.reports_failed)
            .field("reports_stale", &self.reports_stale)
            .finish()
    }
}

impl Default for DeckMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckMetrics {
    pub fn new() -> Self {
        Self {
            decisions_committed: AtomicU64::new(0),
            kept: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
            ignored_attempts: AtomicU64::new(0),
            resets: AtomicU64::new(0),
            reports_sent: AtomicU64::new(0),
            reports_succeeded: AtomicU64::new(0),
            reports_failed: AtomicU64::new(0),
            reports_stale: AtomicU64::new(0),
            backend: None,
        }
    }

    pub fn with_backend(backend: Arc<dyn MetricsBackend>) -> Self {
        Self {
            backend: Some(backend),
            ..Self::new()
        }
    }

    fn bump(&self, counter: &AtomicU64, name: &str) {
        let val = counter.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(backend) = &self.backend {
            backend.record_counter(name, val);
        }
    }

    pub fn record_commit(&self, kept: bool) {
        self.bump(&self.decisions_committed, "sift.engine.decisions_committed");
        if kept {
            self.bump(&self.kept, "sift.engine.kept");
        } else {
            self.bump(&self.discarded, "sift.engine.discarded");
        }
    }

    pub fn record_ignored(&self) {
        self.bump(&self.ignored_attempts, "sift.engine.ignored_attempts");
    }

    pub fn record_reset(&self) {
        self.bump(&self.resets, "sift.engine.resets");
    }

    pub fn record_report_sent(&self) {
        self.bump(&self.reports_sent, "sift.tracker.reports_sent");
    }

    pub fn record_report_succeeded(&self, reward_hint: Option<f64>) {
        self.bump(&self.reports_succeeded, "sift.tracker.reports_succeeded");
        if let (Some(backend), Some(hint)) = (&self.backend, reward_hint) {
            backend.record_gauge("sift.tracker.reward_hint", hint);
        }
    }

    pub fn record_report_failed(&self) {
        self.bump(&self.reports_failed, "sift.tracker.reports_failed");
    }

    pub fn record_report_stale(&self) {
        self.bump(&self.reports_stale, "sift.tracker.reports_stale");
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            decisions_committed: self.decisions_committed.load(Ordering::Relaxed),
            kept: self.kept.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            ignored_attempts: self.ignored_attempts.load(Ordering::Relaxed),
            resets: self.resets.load(Ordering::Relaxed),
            reports_sent: self.reports_sent.load(Ordering::Relaxed),
            reports_succeeded: self.reports_succeeded.load(Ordering::Relaxed),
            reports_failed: self.reports_failed.load(Ordering::Relaxed),
            reports_stale: self.reports_stale.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of deck metrics.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MetricsSnapshot {
    pub decisions_committed: u64,
    pub kept: u64,
    pub discarded: u64,
    pub ignored_attempts: u64,
    pub resets: u64,
    pub reports_sent: u64,
    pub reports_succeeded: u64,
    pub reports_failed: u64,
    pub reports_stale: u64,
}

/// Logging-based metrics backend. Emits metrics as structured log events.
pub struct LoggingMetricsBackend;

impl MetricsBackend for LoggingMetricsBackend {
    fn record_counter(&self, name: &str, value: u64) {
        tracing::info!(metric = name, value = value, kind = "counter", "metric");
    }

    fn record_gauge(&self, name: &str, value: f64) {
        tracing::info!(metric = name, value = value, kind = "gauge", "metric");
    }
}
