//! Testing utilities.
//!
//! - `MockGenerator` returns scripted model text without API calls
//! - `FeedHarness` drives a [`Feed`] through scripted generation rounds
//! - Assertion helpers for verifying feed state

use crate::card::{Card, CardKind};
use crate::feed::{Completion, Feed, FeedError, GenerationJob};
use crate::generator::{GenerationError, Generator};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A scripted generator reply.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Raw model text, passed through untouched.
    Text(String),
    /// A generation failure with this message.
    Fail(String),
}

impl MockResponse {
    /// Model text holding `cards` in a fenced JSON block, as a well-behaved model replies.
    pub fn cards(cards: Vec<Card>) -> Self {
        let json = serde_json::to_string_pretty(&cards).unwrap_or_else(|_| "[]".to_string());
        MockResponse::Text(format!("Here is the next section.\n```json\n{json}\n```"))
    }

    pub fn raw(text: impl Into<String>) -> Self {
        MockResponse::Text(text.into())
    }

    pub fn fail(message: impl Into<String>) -> Self {
        MockResponse::Fail(message.into())
    }
}

/// One recorded call to a [`MockGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub topic: String,
    pub history: Vec<Card>,
    /// `Some` for regeneration calls.
    pub regenerate: Option<usize>,
}

/// A generator that replays scripted responses in order and records its calls.
#[derive(Debug, Default)]
pub struct MockGenerator {
    responses: Mutex<VecDeque<MockResponse>>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockGenerator {
    pub fn new(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Add a response to the queue.
    pub fn queue_response(&self, response: MockResponse) {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(response);
    }

    /// Every call made so far.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn reply(&self, call: MockCall) -> Result<String, GenerationError> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
        let next = self
            .responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        match next {
            Some(MockResponse::Text(text)) => Ok(text),
            Some(MockResponse::Fail(message)) => Err(GenerationError::Other(message)),
            None => Err(GenerationError::Other(
                "The mock generator has no more scripted responses".to_string(),
            )),
        }
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, topic: &str, history: &[Card]) -> Result<String, GenerationError> {
        self.reply(MockCall {
            topic: topic.to_string(),
            history: history.to_vec(),
            regenerate: None,
        })
    }

    async fn regenerate(
        &self,
        topic: &str,
        history: &[Card],
        index: usize,
    ) -> Result<String, GenerationError> {
        self.reply(MockCall {
            topic: topic.to_string(),
            history: history.to_vec(),
            regenerate: Some(index),
        })
    }
}

/// Drives a [`Feed`] with a [`MockGenerator`].
#[derive(Debug, Default)]
pub struct FeedHarness {
    pub feed: Feed,
    pub generator: MockGenerator,
}

impl FeedHarness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply containing `cards`.
    pub fn expect_cards(&mut self, cards: Vec<Card>) -> &mut Self {
        self.generator.queue_response(MockResponse::cards(cards));
        self
    }

    /// Queue raw model text.
    pub fn expect_raw(&mut self, text: impl Into<String>) -> &mut Self {
        self.generator.queue_response(MockResponse::raw(text));
        self
    }

    /// Queue a generation failure.
    pub fn expect_failure(&mut self, message: impl Into<String>) -> &mut Self {
        self.generator.queue_response(MockResponse::fail(message));
        self
    }

    /// Run `job` against the mock and apply the result.
    pub async fn run(&mut self, job: GenerationJob) -> Result<Completion, FeedError> {
        let result = job.run(&self.generator).await;
        self.feed.complete(&job, result)
    }

    /// Submit `topic` and complete the first round. `Ok(None)` if the topic was blank.
    pub async fn submit(&mut self, topic: &str) -> Result<Option<Completion>, FeedError> {
        match self.feed.submit_topic(topic) {
            Some(job) => self.run(job).await.map(Some),
            None => Ok(None),
        }
    }

    /// Load the next section. `Ok(None)` if the feed refused to start one.
    pub async fn more(&mut self) -> Result<Option<Completion>, FeedError> {
        match self.feed.load_more() {
            Some(job) => self.run(job).await.map(Some),
            None => Ok(None),
        }
    }

    /// Regenerate the card at `index`. `Ok(None)` if the feed was busy.
    pub async fn regenerate(&mut self, index: usize) -> Result<Option<Completion>, FeedError> {
        match self.feed.regenerate(index)? {
            Some(job) => self.run(job).await.map(Some),
            None => Ok(None),
        }
    }

    /// Run the reveal to completion, returning the number of ticks it took.
    pub fn reveal_all(&mut self) -> usize {
        let mut ticks = 0;
        while self.feed.tick() {
            ticks += 1;
        }
        ticks
    }

    pub fn kinds(&self) -> Vec<CardKind> {
        self.feed.cards().iter().map(Card::kind).collect()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the feed holds exactly `expected` cards.
#[track_caller]
pub fn assert_card_count(feed: &Feed, expected: usize) {
    assert_eq!(
        feed.len(),
        expected,
        "Expected {expected} cards, found {}",
        feed.len()
    );
}

/// Assert the card types in the feed, in order.
#[track_caller]
pub fn assert_kinds(feed: &Feed, expected: &[CardKind]) {
    let actual: Vec<CardKind> = feed.cards().iter().map(Card::kind).collect();
    assert_eq!(actual, expected, "Unexpected card types");
}

/// Assert how many cards are revealed.
#[track_caller]
pub fn assert_visible(feed: &Feed, expected: usize) {
    assert_eq!(
        feed.visible_count(),
        expected,
        "Expected {expected} visible cards, found {}",
        feed.visible_count()
    );
}

/// Assert the user-visible error mentions `needle`.
#[track_caller]
pub fn assert_error_contains(feed: &Feed, needle: &str) {
    match feed.error() {
        Some(message) => assert!(
            message.contains(needle),
            "Expected error containing '{needle}', got '{message}'"
        ),
        None => panic!("Expected an error containing '{needle}', found none"),
    }
}

/// Assert there is no user-visible error.
#[track_caller]
pub fn assert_no_error(feed: &Feed) {
    assert!(
        feed.error().is_none(),
        "Expected no error, got '{}'",
        feed.error().unwrap_or_default()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_generator_replays_in_order() {
        let generator = MockGenerator::new(vec![
            MockResponse::raw("first"),
            MockResponse::fail("boom"),
        ]);

        assert_eq!(generator.generate("t", &[]).await.unwrap(), "first");
        assert!(matches!(
            generator.regenerate("t", &[Card::title("x")], 0).await,
            Err(GenerationError::Other(m)) if m == "boom"
        ));
        assert!(generator.generate("t", &[]).await.is_err());

        let calls = generator.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].regenerate, Some(0));
        assert_eq!(calls[1].history, vec![Card::title("x")]);
    }

    #[tokio::test]
    async fn test_harness_basic_round() {
        let mut harness = FeedHarness::new();
        harness.expect_cards(vec![Card::title("Owls"), Card::text("Owls hoot.")]);

        let completion = harness.submit("Owls").await.unwrap();
        assert_eq!(completion, Some(Completion::Appended(2)));
        assert_kinds(&harness.feed, &[CardKind::Title, CardKind::Text]);
        assert_visible(&harness.feed, 0);
        assert_eq!(harness.reveal_all(), 2);
        assert_visible(&harness.feed, 2);
        assert_no_error(&harness.feed);
    }

    #[tokio::test]
    async fn test_harness_chained_expectations() {
        let mut harness = FeedHarness::new();
        harness
            .expect_cards(vec![Card::title("A")])
            .expect_failure("quota exceeded")
            .expect_cards(vec![Card::text("B")]);

        harness.submit("Letters").await.unwrap();
        assert!(harness.more().await.is_err());
        assert_error_contains(&harness.feed, "quota exceeded");
        assert_card_count(&harness.feed, 1);

        harness.more().await.unwrap();
        assert_card_count(&harness.feed, 2);
        assert_no_error(&harness.feed);
    }
}
