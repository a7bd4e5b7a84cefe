//! QA tests for the timed reveal, driven by a paused tokio clock.

use infographic_core::testing::{assert_visible, FeedHarness};
use infographic_core::{Card, RevealTicker, REVEAL_INTERVAL};
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_ticker_reveals_one_card_per_interval() {
    let mut harness = FeedHarness::new();
    harness.expect_cards(vec![Card::title("A"), Card::text("b"), Card::text("c")]);
    harness.submit("Letters").await.unwrap();

    let (ticker, mut ticks) = RevealTicker::start();
    let started = Instant::now();

    while harness.feed.reveal_pending() {
        ticks.recv().await.expect("ticker stopped early");
        harness.feed.tick();
    }
    drop(ticker);

    assert_visible(&harness.feed, 3);
    let elapsed = started.elapsed();
    assert!(elapsed >= REVEAL_INTERVAL * 3, "revealed too fast: {elapsed:?}");
    assert!(elapsed < REVEAL_INTERVAL * 4, "revealed too slowly: {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_ticks_ignored_while_generating() {
    let mut harness = FeedHarness::new();
    harness
        .expect_cards(vec![Card::title("A")])
        .expect_cards(vec![Card::text("b")]);
    harness.submit("Letters").await.unwrap();
    harness.reveal_all();

    let job = harness.feed.load_more().unwrap();
    let (_ticker, mut ticks) = RevealTicker::start();
    for _ in 0..3 {
        ticks.recv().await.unwrap();
        assert!(!harness.feed.tick());
    }
    assert_visible(&harness.feed, 0);

    harness.run(job).await.unwrap();
    ticks.recv().await.unwrap();
    assert!(harness.feed.tick());
}

#[tokio::test(start_paused = true)]
async fn test_stopped_ticker_closes_channel() {
    let (ticker, mut ticks) = RevealTicker::start();
    ticks.recv().await.unwrap();
    ticker.stop();
    assert!(ticks.recv().await.is_none());
}
