pub mod config;
pub mod control;
pub mod decision;
pub mod engine;
pub mod error;
pub mod events;
pub mod gesture;
pub mod item;
pub mod metrics;
pub mod observer;
pub mod preview;
pub mod queue;
pub mod tracker;

pub use control::DeckControls;
pub use decision::{Decision, EnginePhase, Outcome};
pub use engine::{DeckEngine, DeckEngineBuilder, DeckSnapshot};
pub use item::{ContentItem, OpenTarget};
