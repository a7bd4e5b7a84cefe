//! Headless infographic interface for programmatic use.
//!
//! [`HeadlessFeed`] runs each generation job to completion before returning,
//! and skips the reveal animation. It is meant for scripts, tests and the
//! line-oriented mode of the binary.
//!
//! # Example
//!
//! ```ignore
//! use infographic_core::headless::HeadlessFeed;
//! use infographic_core::FeedConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut feed = HeadlessFeed::from_config(FeedConfig::from_env())?;
//!
//!     feed.submit("The history of tea").await?;
//!     feed.more().await?;
//!     for (i, card) in feed.cards().iter().enumerate() {
//!         println!("{i}: [{}] {}", card.kind(), card.headline());
//!     }
//!
//!     feed.save().await?;
//!     Ok(())
//! }
//! ```

use crate::card::Card;
use crate::config::FeedConfig;
use crate::creative::CreativeTool;
use crate::feed::{Completion, Feed, FeedError, GenerationJob};
use crate::generator::{ClaudeGenerator, GenerationError, Generator};
use crate::persist::{FileSlot, PersistError, SaveSlot};
use crate::store::IndexError;
use std::sync::Arc;
use thiserror::Error;

/// Errors from headless operations.
#[derive(Debug, Error)]
pub enum HeadlessError {
    #[error("{0}")]
    Feed(#[from] FeedError),

    #[error("Save error: {0}")]
    Persist(#[from] PersistError),

    #[error("{0}")]
    Rejected(&'static str),
}

impl From<IndexError> for HeadlessError {
    fn from(e: IndexError) -> Self {
        HeadlessError::Feed(FeedError::Index(e))
    }
}

impl From<GenerationError> for HeadlessError {
    fn from(e: GenerationError) -> Self {
        HeadlessError::Feed(FeedError::Generation(e))
    }
}

/// A feed driven synchronously from the caller's point of view.
pub struct HeadlessFeed {
    feed: Feed,
    generator: Arc<dyn Generator>,
    slot: Box<dyn SaveSlot>,
}

impl HeadlessFeed {
    pub fn new(generator: Arc<dyn Generator>, slot: Box<dyn SaveSlot>) -> Self {
        Self {
            feed: Feed::new(),
            generator,
            slot,
        }
    }

    /// Claude generator and file slot from `config`.
    pub fn from_config(config: FeedConfig) -> Result<Self, GenerationError> {
        let generator = ClaudeGenerator::new(config.generator)?;
        Ok(Self::new(
            Arc::new(generator),
            Box::new(FileSlot::new(config.save_path)),
        ))
    }

    async fn run(&mut self, job: GenerationJob) -> Result<Completion, HeadlessError> {
        let result = job.run(self.generator.as_ref()).await;
        let completion = self.feed.complete(&job, result)?;
        self.feed.reveal_all();
        Ok(completion)
    }

    /// Start a new infographic about `topic` and wait for its first section.
    pub async fn submit(&mut self, topic: &str) -> Result<Completion, HeadlessError> {
        let job = self
            .feed
            .submit_topic(topic)
            .ok_or(HeadlessError::Rejected("Topic is empty"))?;
        self.run(job).await
    }

    /// Generate the next section.
    pub async fn more(&mut self) -> Result<Completion, HeadlessError> {
        let job = self
            .feed
            .load_more()
            .ok_or(HeadlessError::Rejected("Nothing to continue - submit a topic first"))?;
        self.run(job).await
    }

    /// Replace the card at `index` with a freshly generated one.
    pub async fn regenerate(&mut self, index: usize) -> Result<Completion, HeadlessError> {
        let job = self
            .feed
            .regenerate(index)?
            .ok_or(HeadlessError::Rejected("A generation is already running"))?;
        self.run(job).await
    }

    pub fn delete(&mut self, index: usize) -> Result<Card, HeadlessError> {
        Ok(self.feed.delete(index)?)
    }

    /// Run a creative tool and append its card. Returns false for blank input.
    pub fn creative<S: AsRef<str>>(&mut self, tool: CreativeTool, inputs: &[S]) -> bool {
        match tool.run(inputs) {
            Some(run) => {
                self.feed.push_card(run.into_card());
                self.feed.reveal_all();
                true
            }
            None => false,
        }
    }

    pub async fn save(&self) -> Result<(), HeadlessError> {
        self.slot.save(self.feed.cards()).await?;
        Ok(())
    }

    /// Restore the saved cards. Returns false if the slot is empty.
    pub async fn load(&mut self) -> Result<bool, HeadlessError> {
        match self.slot.load().await? {
            Some(cards) => {
                self.feed.restore(cards);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Empty the save slot and the current feed.
    pub async fn clear_saved(&mut self) -> Result<(), HeadlessError> {
        self.slot.clear().await?;
        self.feed.clear();
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn cards(&self) -> &[Card] {
        self.feed.cards()
    }

    pub fn topic(&self) -> Option<&str> {
        self.feed.topic()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.feed.error()
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn feed_mut(&mut self) -> &mut Feed {
        &mut self.feed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemorySlot;
    use crate::testing::{MockGenerator, MockResponse};

    fn headless(responses: Vec<MockResponse>) -> HeadlessFeed {
        HeadlessFeed::new(
            Arc::new(MockGenerator::new(responses)),
            Box::new(MemorySlot::new()),
        )
    }

    #[tokio::test]
    async fn test_submit_reveals_everything() {
        let mut feed = headless(vec![MockResponse::cards(vec![
            Card::title("Tea"),
            Card::text("Tea is old."),
        ])]);
        assert_eq!(feed.submit("Tea").await.unwrap(), Completion::Appended(2));
        assert_eq!(feed.feed().visible_count(), 2);
        assert_eq!(feed.topic(), Some("Tea"));
    }

    #[tokio::test]
    async fn test_more_without_topic_rejected() {
        let mut feed = headless(vec![]);
        assert!(matches!(
            feed.more().await,
            Err(HeadlessError::Rejected(_))
        ));
        assert!(matches!(
            feed.submit("  ").await,
            Err(HeadlessError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn test_save_load_clear() {
        let mut feed = headless(vec![MockResponse::cards(vec![Card::title("Tea")])]);
        feed.submit("Tea").await.unwrap();
        feed.save().await.unwrap();

        feed.delete(0).unwrap();
        assert!(feed.cards().is_empty());

        assert!(feed.load().await.unwrap());
        assert_eq!(feed.cards(), &[Card::title("Tea")]);

        feed.clear_saved().await.unwrap();
        assert!(feed.cards().is_empty());
        assert!(!feed.load().await.unwrap());
    }

    #[tokio::test]
    async fn test_creative_appends() {
        let mut feed = headless(vec![]);
        assert!(!feed.creative(CreativeTool::Simile, &[""]));
        assert!(feed.creative(CreativeTool::Simile, &["city"]));
        assert_eq!(feed.cards().len(), 1);
        assert_eq!(feed.feed().visible_count(), 1);
    }

    #[tokio::test]
    async fn test_regenerate_bad_index() {
        let mut feed = headless(vec![]);
        assert!(matches!(
            feed.regenerate(0).await,
            Err(HeadlessError::Feed(FeedError::Index(_)))
        ));
    }
}
