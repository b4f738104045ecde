//! End-to-end behaviour of the deck engine: gestures, commands, timing,
//! reset and best-effort reporting, with the remote side stubbed in-process.

use std::sync::Arc;
use std::time::Duration;

use sift_core::tracker::{DecisionReport, StubReporter, StubResponse};
use sift_core::{ContentItem, DeckEngine, Outcome};

const EXIT_WINDOW: Duration = Duration::from_millis(800);

fn items(n: usize) -> Vec<ContentItem> {
    (0..n)
        .map(|i| ContentItem::new(format!("item{i}"), format!("Item {i}")))
        .collect()
}

fn engine_with(n: usize, reporter: Arc<StubReporter>) -> DeckEngine {
    DeckEngine::builder(items(n)).reporter(reporter).build()
}

async fn wait_out_exit() {
    tokio::time::sleep(EXIT_WINDOW + Duration::from_millis(1)).await;
}

fn match_ids(engine: &DeckEngine) -> Vec<String> {
    engine.matches().into_iter().map(|i| i.id).collect()
}

// ── Concrete scenarios ───────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn drag_right_past_threshold_keeps_first_item() {
    let stub = Arc::new(StubReporter::succeeding(None));
    let engine = engine_with(5, stub.clone());

    engine.drag(40.0);
    engine.drag(120.0);
    assert_eq!(engine.release(), Some(Outcome::Kept));
    wait_out_exit().await;

    assert_eq!(match_ids(&engine), vec!["item0"]);
    assert_eq!(engine.cursor(), 1);
    assert_eq!(stub.sent(), vec![DecisionReport::new("item0", Outcome::Kept)]);
}

#[tokio::test(start_paused = true)]
async fn second_decision_in_exit_window_is_ignored() {
    let stub = Arc::new(StubReporter::succeeding(None));
    let engine = engine_with(1, stub.clone());
    let controls = engine.controls();

    assert!(controls.decide(Outcome::Discarded));
    assert!(!controls.decide(Outcome::Kept));
    wait_out_exit().await;

    assert!(engine.matches().is_empty());
    assert_eq!(engine.cursor(), 1);
    assert_eq!(stub.sent().len(), 1);
    assert!(!stub.sent()[0].kept);
}

#[tokio::test(start_paused = true)]
async fn deciding_every_item_exhausts_the_deck() {
    let stub = Arc::new(StubReporter::succeeding(None));
    let engine = engine_with(3, stub.clone());
    let controls = engine.controls();

    for outcome in [Outcome::Kept, Outcome::Discarded, Outcome::Kept] {
        assert!(controls.decide(outcome));
        wait_out_exit().await;
    }

    assert_eq!(engine.cursor(), 3);
    assert!(engine.is_exhausted());
    assert!(!controls.decide(Outcome::Kept));
    wait_out_exit().await;
    assert_eq!(engine.cursor(), 3);
    assert_eq!(stub.sent().len(), 3);
    assert_eq!(match_ids(&engine), vec!["item0", "item2"]);
}

#[tokio::test(start_paused = true)]
async fn server_error_does_not_change_local_state() {
    let failing = Arc::new(StubReporter::failing_with_status(500));
    let healthy = Arc::new(StubReporter::succeeding(Some(1.0)));
    let a = engine_with(4, failing);
    let b = engine_with(4, healthy);

    for engine in [&a, &b] {
        engine.controls().decide(Outcome::Kept);
        wait_out_exit().await;
        engine.drag(-150.0);
        engine.release();
        wait_out_exit().await;
    }

    assert_eq!(a.cursor(), b.cursor());
    assert_eq!(match_ids(&a), match_ids(&b));
    assert_eq!(a.metrics().reports_failed, 2);
    assert_eq!(b.metrics().reports_failed, 0);
}

#[tokio::test(start_paused = true)]
async fn reset_mid_exit_cancels_pending_advance() {
    let engine = engine_with(3, Arc::new(StubReporter::succeeding(None)));
    let controls = engine.controls();

    controls.decide(Outcome::Kept);
    tokio::time::sleep(Duration::from_millis(300)).await;
    controls.reset();

    assert_eq!(engine.cursor(), 0);
    assert!(engine.matches().is_empty());
    assert!(!engine.is_locked());

    // Past the moment the original timer would have fired.
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(engine.cursor(), 0);
    assert!(!engine.is_locked());
}

// ── Properties ───────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn cursor_counts_commits_until_exhaustion() {
    let engine = engine_with(4, Arc::new(StubReporter::succeeding(None)));
    let controls = engine.controls();
    let mut previous = 0;

    for n in 1..=6 {
        controls.decide(if n % 2 == 0 { Outcome::Kept } else { Outcome::Discarded });
        wait_out_exit().await;
        let cursor = engine.cursor();
        assert_eq!(cursor, n.min(4));
        assert!(cursor >= previous);
        previous = cursor;
    }
}

#[tokio::test(start_paused = true)]
async fn gesture_and_command_are_equivalent() {
    let by_gesture_stub = Arc::new(StubReporter::succeeding(None));
    let by_command_stub = Arc::new(StubReporter::succeeding(None));
    let by_gesture = engine_with(3, by_gesture_stub.clone());
    let by_command = engine_with(3, by_command_stub.clone());

    for outcome in [Outcome::Discarded, Outcome::Kept] {
        by_gesture.drag(outcome.direction() * 140.0);
        by_gesture.release();
        by_command.controls().decide(outcome);
        wait_out_exit().await;
    }

    assert_eq!(by_gesture.cursor(), by_command.cursor());
    assert_eq!(match_ids(&by_gesture), match_ids(&by_command));
    assert_eq!(by_gesture_stub.sent(), by_command_stub.sent());
}

#[tokio::test(start_paused = true)]
async fn reset_from_any_state_is_clean() {
    let engine = engine_with(2, Arc::new(StubReporter::succeeding(None)));
    let controls = engine.controls();

    let assert_clean = |engine: &DeckEngine| {
        assert_eq!(engine.cursor(), 0);
        assert!(engine.matches().is_empty());
        assert!(!engine.is_locked());
    };

    // Idle, fresh.
    controls.reset();
    assert_clean(&engine);

    // Idle after a decision.
    controls.decide(Outcome::Kept);
    wait_out_exit().await;
    controls.reset();
    assert_clean(&engine);

    // Exhausted.
    controls.decide(Outcome::Kept);
    wait_out_exit().await;
    controls.decide(Outcome::Kept);
    wait_out_exit().await;
    assert!(engine.is_exhausted());
    controls.reset();
    assert_clean(&engine);

    // Twice in a row.
    controls.reset();
    assert_clean(&engine);
    assert_eq!(engine.metrics().resets, 4);
}

#[tokio::test(start_paused = true)]
async fn preview_window_tracks_cursor() {
    let engine = engine_with(5, Arc::new(StubReporter::succeeding(None)));

    for cursor in 0..=5usize {
        let len = engine.render(|view| match view {
            sift_core::preview::StackView::Cards(cards) => cards.len(),
            sift_core::preview::StackView::Exhausted => 0,
        });
        assert_eq!(len, 3.min(5 - cursor));
        engine.controls().decide(Outcome::Discarded);
        wait_out_exit().await;
    }
}

#[tokio::test(start_paused = true)]
async fn late_reward_after_reset_is_dropped() {
    let stub = Arc::new(
        StubReporter::new(StubResponse::Ack(sift_core::tracker::TrackAck {
            success: true,
            reward_hint: Some(4.0),
        }))
        .with_delay(Duration::from_secs(5)),
    );
    let engine = engine_with(2, stub);

    engine.controls().decide(Outcome::Kept);
    engine.controls().reset();
    tokio::time::sleep(Duration::from_secs(6)).await;

    assert_eq!(engine.reward_total(), 0.0);
    assert_eq!(engine.cursor(), 0);
    assert_eq!(engine.metrics().reports_stale, 1);
}
