use crate::decision::{DecisionSource, Outcome};
use crate::engine::DeckEngine;

/// Imperative handle for on-screen buttons and keyboard shortcuts.
///
/// `decide` goes through the same guarded commit as a drag release, so a
/// button press and a gesture are indistinguishable to the engine.
#[derive(Clone)]
pub struct DeckControls {
    engine: DeckEngine,
}

impl DeckControls {
    pub(crate) fn new(engine: DeckEngine) -> Self {
        Self { engine }
    }

    /// Commit `outcome` for the current item. Returns false (and changes
    /// nothing) while a decision is in flight or the deck is exhausted.
    pub fn decide(&self, outcome: Outcome) -> bool {
        self.engine.commit(outcome, DecisionSource::Command)
    }

    pub fn reset(&self) {
        self.engine.reset();
    }

    pub fn is_locked(&self) -> bool {
        self.engine.is_locked()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::item::ContentItem;

    fn engine(n: usize) -> DeckEngine {
        DeckEngine::with_defaults(
            (0..n)
                .map(|i| ContentItem::new(format!("item{i}"), "t"))
                .collect(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn double_press_commits_once() {
        let engine = engine(3);
        let controls = engine.controls();

        assert!(controls.decide(Outcome::Kept));
        assert!(controls.is_locked());
        assert!(!controls.decide(Outcome::Kept));

        tokio::time::sleep(Duration::from_millis(801)).await;
        assert_eq!(engine.cursor(), 1);
        assert_eq!(engine.matches().len(), 1);
        assert_eq!(engine.metrics().ignored_attempts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn command_blocks_gesture_release() {
        let engine = engine(2);
        engine.drag(180.0);
        assert!(engine.controls().decide(Outcome::Discarded));
        assert_eq!(engine.release(), None);

        tokio::time::sleep(Duration::from_millis(801)).await;
        assert!(engine.matches().is_empty());
        assert_eq!(engine.cursor(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_unlocks_mid_exit() {
        let engine = engine(2);
        let controls = engine.controls();
        controls.decide(Outcome::Kept);
        controls.reset();
        assert!(!controls.is_locked());
        assert_eq!(engine.cursor(), 0);
    }
}
