use crate::decision::Outcome;

/// State changes broadcast to renderers subscribed via `DeckEngine::subscribe`.
#[derive(Debug, Clone, PartialEq)]
pub enum DeckEvent {
    /// A decision became final and the card started exiting.
    Committed {
        item_id: String,
        outcome: Outcome,
        position: usize,
    },
    /// The exit animation finished; `cursor` is the new current position.
    Advanced { cursor: usize },
    /// The cursor reached the end of the queue.
    Exhausted,
    /// Cursor and matches were cleared.
    Reset,
    /// The remote side confirmed a decision and reported reward points.
    RewardReported { item_id: String, reward: f64 },
}
