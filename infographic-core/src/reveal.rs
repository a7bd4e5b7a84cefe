//! Progressive reveal of generated cards.
//!
//! A generation round returns its whole batch at once; the reveal counter
//! exposes the flattened cards one at a time on a fixed cadence.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Delay between two revealed cards.
pub const REVEAL_INTERVAL: Duration = Duration::from_millis(300);

/// Reveal state: how many flattened cards are visible, and whether a
/// generation round is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Revealer {
    count: usize,
    generating: bool,
}

impl Revealer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// A flattened card at `position` is visible iff it is below the count.
    pub fn is_visible(&self, position: usize) -> bool {
        position < self.count
    }

    pub fn start_generation(&mut self) {
        self.count = 0;
        self.generating = true;
    }

    /// A regeneration replaces a card in place, so it pauses the reveal
    /// without hiding what is already shown.
    pub fn begin_regeneration(&mut self) {
        self.generating = true;
    }

    /// Called on success and on failure alike.
    pub fn finish_generation(&mut self) {
        self.generating = false;
    }

    /// Whether a tick would advance the count.
    pub fn is_pending(&self, total: usize) -> bool {
        !self.generating && self.count < total
    }

    /// Reveal one more card if allowed. Returns true if the count moved.
    pub fn tick(&mut self, total: usize) -> bool {
        if self.is_pending(total) {
            self.count += 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.generating = false;
    }

    /// Keep the count within a store that just shrank.
    pub fn clamp(&mut self, total: usize) {
        self.count = self.count.min(total);
    }

    /// Show everything immediately (restored saves).
    pub fn reveal_all(&mut self, total: usize) {
        self.count = total;
        self.generating = false;
    }
}

/// One reveal step, emitted by [`RevealTicker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTick;

/// Periodic task emitting [`RevealTick`]s until stopped or dropped.
#[derive(Debug)]
pub struct RevealTicker {
    handle: JoinHandle<()>,
}

impl RevealTicker {
    /// Start a ticker at [`REVEAL_INTERVAL`]. Must be called inside a tokio runtime.
    pub fn start() -> (Self, mpsc::Receiver<RevealTick>) {
        Self::with_period(REVEAL_INTERVAL)
    }

    pub fn with_period(period: Duration) -> (Self, mpsc::Receiver<RevealTick>) {
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(RevealTick).await.is_err() {
                    break;
                }
            }
        });
        (Self { handle }, rx)
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(self) {
        // Drop aborts the task.
    }
}

impl Drop for RevealTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_sequence() {
        let mut reveal = Revealer::new();
        reveal.start_generation();
        assert!(!reveal.tick(3), "no reveal while generating");

        reveal.finish_generation();
        assert!(reveal.tick(3));
        assert!(reveal.tick(3));
        assert!(reveal.tick(3));
        assert!(!reveal.tick(3));
        assert_eq!(reveal.count(), 3);
        assert!(reveal.is_visible(2));
        assert!(!reveal.is_visible(3));
    }

    #[test]
    fn test_new_generation_resets() {
        let mut reveal = Revealer::new();
        reveal.reveal_all(4);
        reveal.start_generation();
        assert_eq!(reveal.count(), 0);
        assert!(reveal.is_generating());
    }

    #[test]
    fn test_clamp_on_shrink() {
        let mut reveal = Revealer::new();
        reveal.reveal_all(5);
        reveal.clamp(3);
        assert_eq!(reveal.count(), 3);
        reveal.clamp(10);
        assert_eq!(reveal.count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_cadence() {
        let (ticker, mut rx) = RevealTicker::start();
        let started = tokio::time::Instant::now();

        rx.recv().await.unwrap();
        assert!(started.elapsed() >= REVEAL_INTERVAL);

        rx.recv().await.unwrap();
        assert!(started.elapsed() >= REVEAL_INTERVAL * 2);

        ticker.stop();
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_stops_when_receiver_dropped() {
        let (ticker, rx) = RevealTicker::with_period(Duration::from_millis(10));
        drop(rx);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!ticker.is_running());
    }
}
