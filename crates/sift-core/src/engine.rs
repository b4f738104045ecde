use std::sync::{Arc, Mutex, MutexGuard, Weak};

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::{EngineConfig, GestureConfig};
use crate::control::DeckControls;
use crate::decision::{CommittedDecision, Decision, DecisionSource, EnginePhase, Outcome};
use crate::events::DeckEvent;
use crate::gesture::{GestureFrame, GestureInterpreter};
use crate::item::{ContentItem, OpenTarget};
use crate::metrics::{DeckMetrics, MetricsSnapshot};
use crate::observer::{DeckObserver, NoopObserver};
use crate::preview::{StackView, stack_view};
use crate::queue::ContentQueue;
use crate::tracker::{DecisionReporter, InteractionTracker, NoopReporter};

const EVENT_CAPACITY: usize = 64;

/// The drag-to-decide state machine.
///
/// `Idle -> Committing -> Exiting -> Idle` with the cursor advanced by one.
/// A gesture release ([`DeckEngine::release`]) and an explicit command
/// ([`DeckControls::decide`]) both enter through the same guarded commit, so
/// at most one decision is ever in flight and every commit is reported
/// exactly once.
///
/// The exit transition runs on a Tokio timer task; the engine must be driven
/// from inside a Tokio runtime. Cloning is cheap and every clone drives the
/// same deck.
#[derive(Clone)]
pub struct DeckEngine {
    inner: Arc<Inner>,
}

struct Inner {
    session_id: String,
    config: EngineConfig,
    gesture: GestureInterpreter,
    state: Mutex<DeckState>,
    tracker: InteractionTracker,
    observer: Arc<dyn DeckObserver>,
    metrics: Arc<DeckMetrics>,
    events: broadcast::Sender<DeckEvent>,
}

struct DeckState {
    queue: ContentQueue,
    phase: EnginePhase,
    matches: Vec<ContentItem>,
    offset: f64,
    last_decision: Option<CommittedDecision>,
    exit_timer: Option<JoinHandle<()>>,
    /// Bumped on every reset; timers scheduled under an older epoch are stale.
    epoch: u64,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Ok(state) = self.state.get_mut()
            && let Some(timer) = state.exit_timer.take()
        {
            timer.abort();
        }
    }
}

/// Read-only view of the engine at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckSnapshot {
    pub cursor: usize,
    pub len: usize,
    pub phase: EnginePhase,
    pub decision: Decision,
    /// Ids of kept items, in the order they were kept.
    pub matches: Vec<String>,
    pub frame: GestureFrame,
    /// Horizontal position the exiting card is animating towards.
    pub exit_target: Option<f64>,
    pub exhausted: bool,
    pub reward_total: f64,
}

pub struct DeckEngineBuilder {
    items: Vec<ContentItem>,
    config: EngineConfig,
    gesture: GestureConfig,
    reporter: Arc<dyn DecisionReporter>,
    observer: Arc<dyn DeckObserver>,
    metrics: Arc<DeckMetrics>,
}

impl DeckEngineBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn gesture(mut self, gesture: GestureConfig) -> Self {
        self.gesture = gesture;
        self
    }

    pub fn reporter(mut self, reporter: Arc<dyn DecisionReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn observer(mut self, observer: Arc<dyn DeckObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn metrics(mut self, metrics: Arc<DeckMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn build(mut self) -> DeckEngine {
        if let Err(e) = self.config.validate() {
            tracing::warn!(error = %e, "Engine config out of range, clamping preview depth");
            self.config.preview_depth = self.config.preview_depth.max(1);
        }

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let session_id = format!("deck_{}", uuid::Uuid::new_v4().simple());
        let tracker = InteractionTracker::new(self.reporter, Arc::clone(&self.metrics), events.clone());

        tracing::info!(
            session = %session_id,
            items = self.items.len(),
            exit_ms = self.config.exit_duration_ms,
            "Deck created"
        );

        DeckEngine {
            inner: Arc::new(Inner {
                session_id,
                config: self.config,
                gesture: GestureInterpreter::new(self.gesture),
                state: Mutex::new(DeckState {
                    queue: ContentQueue::new(self.items),
                    phase: EnginePhase::Idle,
                    matches: Vec::new(),
                    offset: 0.0,
                    last_decision: None,
                    exit_timer: None,
                    epoch: 0,
                }),
                tracker,
                observer: self.observer,
                metrics: self.metrics,
                events,
            }),
        }
    }
}

impl DeckEngine {
    pub fn builder(items: Vec<ContentItem>) -> DeckEngineBuilder {
        DeckEngineBuilder {
            items,
            config: EngineConfig::default(),
            gesture: GestureConfig::default(),
            reporter: Arc::new(NoopReporter),
            observer: Arc::new(NoopObserver),
            metrics: Arc::new(DeckMetrics::new()),
        }
    }

    /// Engine with default timing, no reporting and no callbacks.
    pub fn with_defaults(items: Vec<ContentItem>) -> Self {
        Self::builder(items).build()
    }

    /// The imperative entry point (buttons, keyboard shortcuts).
    pub fn controls(&self) -> DeckControls {
        DeckControls::new(self.clone())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DeckEvent> {
        self.inner.events.subscribe()
    }

    pub fn session_id(&self) -> &str {
        &self.inner.session_id
    }

    pub fn gesture(&self) -> &GestureInterpreter {
        &self.inner.gesture
    }

    // ── Gesture entry point ──────────────────────────────────────────────

    /// Move the interactive card. Ignored while locked or exhausted.
    pub fn drag(&self, offset: f64) -> Option<GestureFrame> {
        let mut state = self.lock_state();
        if state.phase.is_locked() || state.queue.is_exhausted() {
            return None;
        }
        state.offset = offset;
        Some(self.inner.gesture.frame(offset))
    }

    /// Let go of the card at its current offset.
    ///
    /// Past the threshold this commits the outcome for the drag direction;
    /// otherwise the card snaps back and nothing is committed.
    pub fn release(&self) -> Option<Outcome> {
        let outcome = {
            let mut state = self.lock_state();
            if state.phase.is_locked() {
                return None;
            }
            let outcome = self.inner.gesture.release(state.offset);
            if outcome.is_none() {
                tracing::debug!(
                    session = %self.inner.session_id,
                    offset = state.offset,
                    "Release below threshold, snapping back"
                );
                state.offset = 0.0;
            }
            outcome
        }?;

        self.commit(outcome, DecisionSource::Gesture)
            .then_some(outcome)
    }

    /// Ask to view the current item in full. Never changes engine state.
    pub fn open(&self) -> Option<OpenTarget> {
        let item = {
            let state = self.lock_state();
            if state.phase.is_locked() {
                return None;
            }
            state.queue.current().cloned()
        }?;

        let target = item.open_target();
        tracing::info!(session = %self.inner.session_id, item_id = %item.id, target = ?target, "Open requested");
        self.inner.observer.on_open(&item, &target);
        Some(target)
    }

    // ── Shared commit path ───────────────────────────────────────────────

    /// The only place a decision becomes final. Returns false when the
    /// attempt was ignored (lock held or queue exhausted).
    pub(crate) fn commit(&self, outcome: Outcome, source: DecisionSource) -> bool {
        let (item, run_inline) = {
            let mut state = self.lock_state();

            if state.phase.is_locked() {
                self.inner.metrics.record_ignored();
                tracing::debug!(
                    session = %self.inner.session_id,
                    source = %source,
                    phase = %state.phase,
                    "Decision ignored, another decision is in flight"
                );
                return false;
            }

            let Some(item) = state.queue.current().cloned() else {
                self.inner.metrics.record_ignored();
                tracing::debug!(
                    session = %self.inner.session_id,
                    source = %source,
                    "Decision ignored, queue exhausted"
                );
                return false;
            };

            let position = state.queue.cursor();
            state.phase = EnginePhase::Committing(outcome);
            state.last_decision = Some(CommittedDecision {
                item_id: item.id.clone(),
                outcome,
                position,
                committed_at: Utc::now(),
            });
            if outcome.is_kept() {
                state.matches.push(item.clone());
            }
            self.inner.metrics.record_commit(outcome.is_kept());
            self.inner.tracker.track(&item.id, outcome);

            tracing::info!(
                session = %self.inner.session_id,
                item_id = %item.id,
                outcome = %outcome,
                source = %source,
                position,
                "Decision committed"
            );

            state.phase = EnginePhase::Exiting(outcome);
            let timer = self.schedule_exit(state.epoch);
            let run_inline = timer.is_none();
            state.exit_timer = timer;
            // Sent under the lock so a concurrent reset cannot overtake it.
            let _ = self.inner.events.send(DeckEvent::Committed {
                item_id: item.id.clone(),
                outcome,
                position,
            });
            (item, run_inline.then_some(state.epoch))
        };

        match outcome {
            Outcome::Kept => self.inner.observer.on_kept(&item),
            Outcome::Discarded => self.inner.observer.on_discarded(&item),
        }

        if let Some(epoch) = run_inline {
            self.finish_exit(epoch);
        }
        true
    }

    fn schedule_exit(&self, epoch: u64) -> Option<JoinHandle<()>> {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!(
                    session = %self.inner.session_id,
                    "No async runtime available, completing exit without animation"
                );
                return None;
            }
        };

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let duration = self.inner.config.exit_duration();
        Some(handle.spawn(async move {
            tokio::time::sleep(duration).await;
            if let Some(inner) = weak.upgrade() {
                DeckEngine { inner }.finish_exit(epoch);
            }
        }))
    }

    /// `Exiting -> Idle`: advance past the decided item.
    fn finish_exit(&self, epoch: u64) {
        let mut state = self.lock_state();
        if state.epoch != epoch || !matches!(state.phase, EnginePhase::Exiting(_)) {
            tracing::debug!(session = %self.inner.session_id, "Stale exit timer ignored");
            return;
        }
        state.queue.advance();
        state.phase = EnginePhase::Idle;
        state.offset = 0.0;
        state.exit_timer = None;

        let cursor = state.queue.cursor();
        tracing::info!(session = %self.inner.session_id, cursor, "Advanced to next item");
        let _ = self.inner.events.send(DeckEvent::Advanced { cursor });
        if state.queue.is_exhausted() {
            tracing::info!(session = %self.inner.session_id, "Deck exhausted");
            let _ = self.inner.events.send(DeckEvent::Exhausted);
        }
    }

    /// Back to the first item with no matches, from any state. Cancels the
    /// pending exit timer before touching the cursor.
    pub fn reset(&self) {
        {
            let mut state = self.lock_state();
            if let Some(timer) = state.exit_timer.take() {
                timer.abort();
            }
            state.epoch += 1;
            state.queue.rewind();
            state.matches.clear();
            state.phase = EnginePhase::Idle;
            state.offset = 0.0;
            state.last_decision = None;
            self.inner.tracker.begin_epoch();
            let _ = self.inner.events.send(DeckEvent::Reset);
        }

        self.inner.metrics.record_reset();
        tracing::info!(session = %self.inner.session_id, "Deck reset");
        self.inner.observer.on_reset();
    }

    // ── Read side ────────────────────────────────────────────────────────

    pub fn is_locked(&self) -> bool {
        self.lock_state().phase.is_locked()
    }

    pub fn is_exhausted(&self) -> bool {
        self.lock_state().queue.is_exhausted()
    }

    pub fn phase(&self) -> EnginePhase {
        self.lock_state().phase
    }

    pub fn cursor(&self) -> usize {
        self.lock_state().queue.cursor()
    }

    pub fn len(&self) -> usize {
        self.lock_state().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_state().queue.is_empty()
    }

    pub fn current(&self) -> Option<ContentItem> {
        self.lock_state().queue.current().cloned()
    }

    /// Decision for the item under the cursor; `Pending` unless it is exiting.
    pub fn current_decision(&self) -> Decision {
        self.lock_state()
            .phase
            .outcome()
            .map(Decision::from)
            .unwrap_or_default()
    }

    pub fn last_decision(&self) -> Option<CommittedDecision> {
        self.lock_state().last_decision.clone()
    }

    pub fn matches(&self) -> Vec<ContentItem> {
        self.lock_state().matches.clone()
    }

    pub fn reward_total(&self) -> f64 {
        self.inner.tracker.reward_total()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.inner.metrics.snapshot()
    }

    pub fn snapshot(&self) -> DeckSnapshot {
        let state = self.lock_state();
        let exit_target = state
            .phase
            .outcome()
            .map(|o| o.direction() * self.inner.config.exit_distance);
        DeckSnapshot {
            cursor: state.queue.cursor(),
            len: state.queue.len(),
            phase: state.phase,
            decision: state.phase.outcome().map(Decision::from).unwrap_or_default(),
            matches: state.matches.iter().map(|i| i.id.clone()).collect(),
            frame: self.inner.gesture.frame(state.offset),
            exit_target,
            exhausted: state.queue.is_exhausted(),
            reward_total: self.inner.tracker.reward_total(),
        }
    }

    /// Run `f` against the current stack view.
    ///
    /// The engine is locked for the duration of `f`; do not call back into
    /// the engine from inside it.
    pub fn render<R>(&self, f: impl FnOnce(&StackView<'_>) -> R) -> R {
        let state = self.lock_state();
        let view = stack_view(&state.queue, self.inner.config.preview_depth);
        f(&view)
    }

    fn lock_state(&self) -> MutexGuard<'_, DeckState> {
        // State writes never panic midway; a poisoned lock still holds a consistent deck.
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
