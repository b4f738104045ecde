use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The binary result of resolving one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The user wants the item (drag right / "keep" button).
    Kept,
    /// The user passed on the item (drag left / "discard" button).
    Discarded,
}

impl Outcome {
    pub fn is_kept(self) -> bool {
        matches!(self, Outcome::Kept)
    }

    /// Sign of the horizontal direction the card leaves in.
    pub fn direction(self) -> f64 {
        match self {
            Outcome::Kept => 1.0,
            Outcome::Discarded => -1.0,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Kept => write!(f, "kept"),
            Outcome::Discarded => write!(f, "discarded"),
        }
    }
}

/// Decision state of the item under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    #[default]
    Pending,
    Kept,
    Discarded,
}

impl From<Outcome> for Decision {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Kept => Decision::Kept,
            Outcome::Discarded => Decision::Discarded,
        }
    }
}

/// Where the engine is in its commit/exit cycle.
///
/// `Committing` only exists for the duration of a single `commit` call; from
/// the outside an engine is observed as either `Idle` or `Exiting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnginePhase {
    #[default]
    Idle,
    Committing(Outcome),
    Exiting(Outcome),
}

impl EnginePhase {
    /// Whether the decision lock is held.
    pub fn is_locked(self) -> bool {
        !matches!(self, EnginePhase::Idle)
    }

    pub fn outcome(self) -> Option<Outcome> {
        match self {
            EnginePhase::Idle => None,
            EnginePhase::Committing(o) | EnginePhase::Exiting(o) => Some(o),
        }
    }
}

impl std::fmt::Display for EnginePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnginePhase::Idle => write!(f, "idle"),
            EnginePhase::Committing(o) => write!(f, "committing({o})"),
            EnginePhase::Exiting(o) => write!(f, "exiting({o})"),
        }
    }
}

/// Which entry point produced a commit. Used for logging only; both sources
/// go through the same commit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionSource {
    Gesture,
    Command,
}

impl std::fmt::Display for DecisionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionSource::Gesture => write!(f, "gesture"),
            DecisionSource::Command => write!(f, "command"),
        }
    }
}

/// A decision that has been made final for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedDecision {
    pub item_id: String,
    pub outcome: Outcome,
    /// Queue position of the item at commit time.
    pub position: usize,
    pub committed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_idle_is_unlocked() {
        assert!(!EnginePhase::Idle.is_locked());
        assert!(EnginePhase::Committing(Outcome::Kept).is_locked());
        assert!(EnginePhase::Exiting(Outcome::Discarded).is_locked());
    }

    #[test]
    fn phase_display() {
        assert_eq!(EnginePhase::Exiting(Outcome::Kept).to_string(), "exiting(kept)");
        assert_eq!(EnginePhase::Idle.to_string(), "idle");
    }

    #[test]
    fn outcome_maps_to_decision() {
        assert_eq!(Decision::from(Outcome::Kept), Decision::Kept);
        assert_eq!(Decision::from(Outcome::Discarded), Decision::Discarded);
        assert_eq!(Decision::default(), Decision::Pending);
    }
}
