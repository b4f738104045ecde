//! Line-oriented driver for a deck: one command per stdin line, one response
//! line per command on stdout.

use std::time::Duration;

use sift_core::preview::StackView;
use sift_core::{ContentItem, DeckEngine, OpenTarget, Outcome};
use sift_core::observer::DeckObserver;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Extra slack added to `wait` so the exit timer has fired when we look.
const WAIT_MARGIN: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Drag(f64),
    Release,
    Decide(Outcome),
    Open,
    Reset,
    Status,
    Preview,
    Wait,
    Quit,
}

impl SessionCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else {
            return Err("empty command".into());
        };

        let command = match word {
            "drag" => {
                let offset = parts
                    .next()
                    .ok_or("drag needs an offset")?
                    .parse::<f64>()
                    .map_err(|e| format!("bad offset: {e}"))?;
                SessionCommand::Drag(offset)
            }
            "release" => SessionCommand::Release,
            "keep" | "k" => SessionCommand::Decide(Outcome::Kept),
            "discard" | "d" => SessionCommand::Decide(Outcome::Discarded),
            "open" => SessionCommand::Open,
            "reset" => SessionCommand::Reset,
            "status" => SessionCommand::Status,
            "preview" => SessionCommand::Preview,
            "wait" => SessionCommand::Wait,
            "quit" | "q" => SessionCommand::Quit,
            other => return Err(format!("unknown command: {other}")),
        };

        if parts.next().is_some() {
            return Err(format!("unexpected arguments after {word}"));
        }
        Ok(command)
    }
}

/// Logs host callbacks; a real host would update its UI here.
pub struct LoggingObserver;

impl DeckObserver for LoggingObserver {
    fn on_kept(&self, item: &ContentItem) {
        tracing::info!(item_id = %item.id, title = %item.title, "Kept");
    }

    fn on_discarded(&self, item: &ContentItem) {
        tracing::info!(item_id = %item.id, "Discarded");
    }

    fn on_open(&self, item: &ContentItem, target: &OpenTarget) {
        tracing::info!(item_id = %item.id, target = ?target, "Open requested");
    }

    fn on_reset(&self) {
        tracing::info!("Deck reset by user");
    }
}

pub struct Session {
    engine: DeckEngine,
    exit_duration: Duration,
}

impl Session {
    pub fn new(engine: DeckEngine, exit_duration: Duration) -> Self {
        Self {
            engine,
            exit_duration,
        }
    }

    /// Run one command. `None` means the session should end.
    pub async fn execute(&self, command: SessionCommand) -> Option<String> {
        let controls = self.engine.controls();
        let reply = match command {
            SessionCommand::Drag(offset) => match self.engine.drag(offset) {
                Some(frame) => format!(
                    "frame offset={:.0} rotation={:.1} opacity={:.2} intent={}",
                    frame.offset,
                    frame.rotation,
                    frame.opacity,
                    frame.intent.map_or("none".to_string(), |o| o.to_string())
                ),
                None => "ignored".into(),
            },
            SessionCommand::Release => match self.engine.release() {
                Some(outcome) => format!("committed {outcome}"),
                None if self.engine.is_locked() || self.engine.is_exhausted() => "ignored".into(),
                None => "snap back".into(),
            },
            SessionCommand::Decide(outcome) => {
                if controls.decide(outcome) {
                    format!("committed {outcome}")
                } else {
                    "ignored".into()
                }
            }
            SessionCommand::Open => match self.engine.open() {
                Some(OpenTarget::Inline) => format!(
                    "open inline {}",
                    self.engine.current().map(|i| i.id).unwrap_or_default()
                ),
                Some(OpenTarget::External { url }) => format!("open external {url}"),
                None => "ignored".into(),
            },
            SessionCommand::Reset => {
                controls.reset();
                "reset".into()
            }
            SessionCommand::Status => self.status_line(),
            SessionCommand::Preview => self.preview_line(),
            SessionCommand::Wait => {
                tokio::time::sleep(self.exit_duration + WAIT_MARGIN).await;
                if self.engine.is_exhausted() {
                    "all caught up".into()
                } else {
                    format!("cursor={}", self.engine.cursor())
                }
            }
            SessionCommand::Quit => return None,
        };
        Some(reply)
    }

    pub fn status_line(&self) -> String {
        let snap = self.engine.snapshot();
        format!(
            "cursor={}/{} phase={} matches=[{}] locked={} reward={}",
            snap.cursor,
            snap.len,
            snap.phase,
            snap.matches.join(","),
            snap.phase.is_locked(),
            snap.reward_total
        )
    }

    fn preview_line(&self) -> String {
        self.engine.render(|view| match view {
            StackView::Exhausted => "all caught up".to_string(),
            StackView::Cards(cards) => cards
                .iter()
                .map(|card| format!("[{}] {} scale={:.2}", card.depth, card.item.id, card.scale))
                .collect::<Vec<_>>()
                .join(" "),
        })
    }

    /// Read commands until EOF or `quit`, printing one reply per command.
    pub async fn run<R: AsyncBufRead + Unpin>(&self, input: R) -> anyhow::Result<()> {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match SessionCommand::parse(line) {
                Ok(command) => match self.execute(command).await {
                    Some(reply) => println!("{reply}"),
                    None => break,
                },
                Err(e) => println!("error: {e}"),
            }
        }

        let snap = self.engine.snapshot();
        println!("kept {} of {}", snap.matches.len(), snap.len);
        Ok(())
    }
}
