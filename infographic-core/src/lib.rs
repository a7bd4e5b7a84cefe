//! Generative infographic engine.
//!
//! This crate provides:
//! - A typed card model for LLM-generated infographics
//! - Best-effort extraction of card arrays from raw model text
//! - An ordered card store, two-column layout grouping and timed reveal
//! - A `Feed` session with single-flight generation jobs
//! - Claude-backed generation with web search grounding
//! - Single-slot persistence and placeholder creative tools
//!
//! # Quick Start
//!
//! ```ignore
//! use infographic_core::{ClaudeGenerator, Feed, GeneratorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let generator = ClaudeGenerator::new(GeneratorConfig::from_env())?;
//!     let mut feed = Feed::new();
//!
//!     if let Some(job) = feed.submit_topic("Deep sea creatures") {
//!         let result = job.run(&generator).await;
//!         feed.complete(&job, result)?;
//!     }
//!
//!     for group in feed.groups() {
//!         for card in group.cards {
//!             println!("[{}] {}", card.kind(), card.headline());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod card;
pub mod config;
pub mod creative;
pub mod extract;
pub mod feed;
pub mod generator;
pub mod headless;
pub mod layout;
pub mod persist;
pub mod prompt;
pub mod reveal;
pub mod store;
pub mod testing;

// Primary public API
pub use card::{Card, CardKind, ChartType, Source, Width};
pub use config::{FeedConfig, GeneratorConfig};
pub use creative::{CreativeRun, CreativeTool};
pub use extract::{extract_cards, ExtractionError};
pub use feed::{Completion, Feed, FeedError, GenerationJob, JobKind};
pub use generator::{ClaudeGenerator, GenerationError, Generator};
pub use headless::{HeadlessError, HeadlessFeed};
pub use layout::{flatten, group_cards, DisplayGroup, Layout};
pub use persist::{FileSlot, MemorySlot, PersistError, SaveSlot};
pub use reveal::{RevealTick, RevealTicker, Revealer, REVEAL_INTERVAL};
pub use store::{CardId, CardStore, IndexError};
pub use testing::{FeedHarness, MockGenerator, MockResponse};
