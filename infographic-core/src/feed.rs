//! The infographic session: topic, cards, reveal state and generation jobs.
//!
//! A [`Feed`] never performs I/O itself. Operations that need the model hand
//! back a [`GenerationJob`]; the caller runs it (on a spawned task, inline,
//! anywhere) and passes the outcome to [`Feed::complete`]. At most one job is
//! in flight at a time, and jobs issued before a topic change or clear are
//! recognised as stale and discarded.

use crate::card::Card;
use crate::extract::{extract_cards, ExtractionError};
use crate::generator::{GenerationError, Generator};
use crate::layout::{group_cards, DisplayGroup};
use crate::reveal::Revealer;
use crate::store::{CardId, CardStore, IndexError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Topic shown for restored saves that have no title card.
pub const RESTORED_TOPIC: &str = "Saved infographic";

/// Errors from feed operations.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("{0}")]
    Extraction(#[from] ExtractionError),

    #[error("{0}")]
    Index(#[from] IndexError),

    #[error("{0}")]
    Generation(#[from] GenerationError),
}

impl FeedError {
    /// The message shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            FeedError::Index(e) => e.to_string(),
            other => format!("An error occurred while generating content. Details: {other}"),
        }
    }
}

/// What a job asks the model for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    /// The next section, appended to the end.
    Append,
    /// A replacement for one card. `index` is its position when the job was issued.
    Regenerate { target: CardId, index: usize },
}

/// One generation request, detached from the feed so it can run elsewhere.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub kind: JobKind,
    pub topic: String,
    pub history: Arc<Vec<Card>>,
    epoch: u64,
    serial: u64,
}

impl GenerationJob {
    /// Ask `generator` for this job's raw text.
    pub async fn run(&self, generator: &dyn Generator) -> Result<String, GenerationError> {
        match self.kind {
            JobKind::Append => generator.generate(&self.topic, &self.history).await,
            JobKind::Regenerate { index, .. } => {
                generator
                    .regenerate(&self.topic, &self.history, index)
                    .await
            }
        }
    }

    pub fn is_regenerate(&self) -> bool {
        matches!(self.kind, JobKind::Regenerate { .. })
    }
}

/// Result of applying a finished job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// This many cards were appended.
    Appended(usize),
    /// The card at this index was replaced.
    Replaced(usize),
    /// The regenerated card was deleted while the job ran.
    TargetGone,
    /// The job belonged to an earlier topic or was superseded.
    Stale,
}

/// An infographic session.
#[derive(Debug, Default)]
pub struct Feed {
    topic: Option<String>,
    store: CardStore,
    reveal: Revealer,
    in_flight: Option<u64>,
    regenerating: Option<CardId>,
    epoch: u64,
    next_serial: u64,
    error: Option<String>,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn store(&self) -> &CardStore {
        &self.store
    }

    pub fn cards(&self) -> &[Card] {
        self.store.cards()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Display groups over the current cards.
    pub fn groups(&self) -> Vec<DisplayGroup<'_>> {
        group_cards(self.store.cards())
    }

    pub fn reveal(&self) -> &Revealer {
        &self.reveal
    }

    pub fn visible_count(&self) -> usize {
        self.reveal.count()
    }

    pub fn is_generating(&self) -> bool {
        self.reveal.is_generating()
    }

    /// Whether a job has been issued and not yet completed.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Current index of the card being regenerated, if any.
    pub fn regenerating_index(&self) -> Option<usize> {
        self.regenerating.and_then(|id| self.store.index_of(id))
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Start a new infographic. Blank topics are ignored.
    pub fn submit_topic(&mut self, topic: &str) -> Option<GenerationJob> {
        let topic = topic.trim();
        if topic.is_empty() {
            return None;
        }
        info!(topic, "new topic");

        self.reset_session();
        self.topic = Some(topic.to_string());
        self.reveal.start_generation();
        Some(self.issue(JobKind::Append))
    }

    /// Request the next section. `None` while busy, without a topic, or
    /// before the first section has arrived.
    pub fn load_more(&mut self) -> Option<GenerationJob> {
        if self.is_busy() || self.topic.is_none() || self.store.is_empty() {
            return None;
        }
        self.error = None;
        self.reveal.start_generation();
        Some(self.issue(JobKind::Append))
    }

    /// Request a replacement for the card at `index`. `Ok(None)` while busy.
    pub fn regenerate(&mut self, index: usize) -> Result<Option<GenerationJob>, IndexError> {
        let target = self.store.id_at(index).ok_or(IndexError {
            index,
            len: self.store.len(),
        })?;
        if self.is_busy() || self.topic.is_none() {
            return Ok(None);
        }
        debug!(index, "regenerating card");

        self.error = None;
        self.regenerating = Some(target);
        self.reveal.begin_regeneration();
        Ok(Some(self.issue(JobKind::Regenerate { target, index })))
    }

    /// Remove the card at `index`.
    pub fn delete(&mut self, index: usize) -> Result<Card, IndexError> {
        let removed = self.store.remove_at(index)?;
        self.reveal.clamp(self.store.len());
        debug!(index, remaining = self.store.len(), "deleted card");
        Ok(removed)
    }

    /// Append a card produced locally (creative tools). Visible immediately.
    pub fn push_card(&mut self, card: Card) {
        let was_fully_revealed = self.reveal.count() >= self.store.len();
        self.store.append(vec![card]);
        if was_fully_revealed && !self.reveal.is_generating() {
            self.reveal.reveal_all(self.store.len());
        }
    }

    /// Apply the outcome of `job`.
    ///
    /// Stale jobs are dropped without touching anything. Otherwise the
    /// in-flight and regenerating markers are cleared whether or not the job
    /// succeeded; a failure leaves the cards untouched and records a message.
    pub fn complete(
        &mut self,
        job: &GenerationJob,
        result: Result<String, GenerationError>,
    ) -> Result<Completion, FeedError> {
        if job.epoch != self.epoch || self.in_flight != Some(job.serial) {
            debug!(job_epoch = job.epoch, epoch = self.epoch, "discarding stale job");
            return Ok(Completion::Stale);
        }

        self.in_flight = None;
        self.regenerating = None;
        self.reveal.finish_generation();

        match self.apply(job, result) {
            Ok(completion) => Ok(completion),
            Err(e) => {
                warn!(error = %e, "generation failed");
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    fn apply(
        &mut self,
        job: &GenerationJob,
        result: Result<String, GenerationError>,
    ) -> Result<Completion, FeedError> {
        let cards = extract_cards(&result?)?;
        match job.kind {
            JobKind::Append => {
                let count = cards.len();
                self.store.append(cards);
                info!(count, total = self.store.len(), "appended cards");
                Ok(Completion::Appended(count))
            }
            JobKind::Regenerate { target, .. } => {
                let card = cards.into_iter().next().ok_or(ExtractionError::Empty)?;
                let Some(index) = self.store.index_of(target) else {
                    warn!("regenerated card was deleted before the result arrived");
                    return Ok(Completion::TargetGone);
                };
                self.store.replace_at(index, card)?;
                info!(index, "replaced card");
                Ok(Completion::Replaced(index))
            }
        }
    }

    /// Advance the reveal by one card. Returns true if anything changed.
    pub fn tick(&mut self) -> bool {
        self.reveal.tick(self.store.len())
    }

    /// Skip the reveal animation.
    pub fn reveal_all(&mut self) {
        if !self.reveal.is_generating() {
            self.reveal.reveal_all(self.store.len());
        }
    }

    /// Whether the reveal still has cards to show.
    pub fn reveal_pending(&self) -> bool {
        self.reveal.is_pending(self.store.len())
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Leave the feed: drop the topic and every card.
    pub fn back_to_input(&mut self) {
        self.reset_session();
        self.topic = None;
    }

    /// Drop every card but keep the topic.
    pub fn clear(&mut self) {
        self.reset_session();
    }

    /// Replace the session with saved cards, fully revealed.
    pub fn restore(&mut self, cards: Vec<Card>) {
        self.reset_session();
        self.topic = Some(topic_from_cards(&cards));
        self.store = CardStore::from_cards(cards);
        self.reveal.reveal_all(self.store.len());
        info!(count = self.store.len(), "restored saved cards");
    }

    fn reset_session(&mut self) {
        self.epoch += 1;
        self.store.clear();
        self.reveal.reset();
        self.in_flight = None;
        self.regenerating = None;
        self.error = None;
    }

    fn issue(&mut self, kind: JobKind) -> GenerationJob {
        self.next_serial += 1;
        self.in_flight = Some(self.next_serial);
        GenerationJob {
            kind,
            topic: self.topic.clone().unwrap_or_default(),
            history: self.store.snapshot(),
            epoch: self.epoch,
            serial: self.next_serial,
        }
    }
}

/// The first title card's text, or [`RESTORED_TOPIC`].
pub fn topic_from_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .find_map(|card| match card {
            Card::Title(title) if !title.title.trim().is_empty() => Some(title.title.clone()),
            _ => None,
        })
        .unwrap_or_else(|| RESTORED_TOPIC.to_string())
}
