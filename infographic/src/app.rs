//! Main application state and logic

use std::collections::HashMap;
use std::sync::Arc;

use infographic_core::{
    Card, CardId, ChartType, Completion, Feed, GenerationError, GenerationJob, Generator,
    RevealTick, RevealTicker, SaveSlot,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::ui::theme::Theme;
use crate::ui::widgets::{CreativeForm, LineEditor};
use crate::ui::Overlay;

/// A finished job, sent back from its task to the UI loop.
pub type JobResult = (GenerationJob, Result<String, GenerationError>);

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Topic entry
    #[default]
    Input,
    /// The generated infographic
    Feed,
}

/// A save slot operation waiting for the main loop to await it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAction {
    Save,
    Load,
    Clear,
}

/// Main application state
pub struct App {
    pub feed: Feed,
    generator: Arc<dyn Generator>,
    slot: Box<dyn SaveSlot>,

    // Generation jobs report back here
    job_tx: mpsc::Sender<JobResult>,
    job_rx: mpsc::Receiver<JobResult>,

    // Reveal animation
    ticker: Option<RevealTicker>,
    tick_rx: Option<mpsc::Receiver<RevealTick>>,

    // UI state
    pub screen: Screen,
    pub theme: Theme,
    overlay: Option<Overlay>,
    input: LineEditor,
    selected: usize,
    chart_overrides: HashMap<CardId, ChartType>,

    // Status
    status_message: Option<String>,
    pending_slot: Option<SlotAction>,
    pub should_quit: bool,

    // Animation
    pub animation_frame: u8,
}

impl App {
    pub fn new(generator: Arc<dyn Generator>, slot: Box<dyn SaveSlot>) -> Self {
        let (job_tx, job_rx) = mpsc::channel(4);
        Self {
            feed: Feed::new(),
            generator,
            slot,
            job_tx,
            job_rx,
            ticker: None,
            tick_rx: None,
            screen: Screen::Input,
            theme: Theme::default(),
            overlay: None,
            input: LineEditor::new(),
            selected: 0,
            chart_overrides: HashMap::new(),
            status_message: None,
            pending_slot: None,
            should_quit: false,
            animation_frame: 0,
        }
    }

    // ========================================================================
    // Generation
    // ========================================================================

    /// Submit the topic in the input box.
    pub fn submit_topic(&mut self) {
        if self.input.is_blank() {
            self.set_status("Enter a topic first");
            return;
        }
        let topic = self.input.take();
        if let Some(job) = self.feed.submit_topic(&topic) {
            self.screen = Screen::Feed;
            self.selected = 0;
            self.chart_overrides.clear();
            self.clear_status();
            self.start_round(job);
        }
    }

    /// Ask for the next section.
    pub fn load_more(&mut self) {
        if self.feed.is_busy() {
            self.set_status("Already generating");
            return;
        }
        match self.feed.load_more() {
            Some(job) => {
                self.set_status("Loading more...");
                self.start_round(job);
            }
            None => self.set_status("Nothing to continue yet"),
        }
    }

    pub fn regenerate_selected(&mut self) {
        if !self.feed.is_empty() && !self.selected_is_revealed() {
            return;
        }
        match self.feed.regenerate(self.selected) {
            Ok(Some(job)) => {
                self.set_status(format!("Regenerating card {}", self.selected + 1));
                self.spawn(job);
            }
            Ok(None) => self.set_status("Wait for the current generation to finish"),
            Err(e) => self.set_status(e.to_string()),
        }
    }

    pub fn delete_selected(&mut self) {
        if self.feed.is_empty() || !self.selected_is_revealed() {
            return;
        }
        let id = self.feed.store().id_at(self.selected);
        match self.feed.delete(self.selected) {
            Ok(card) => {
                if let Some(id) = id {
                    self.chart_overrides.remove(&id);
                }
                self.set_status(format!("Deleted {} card", card.kind()));
                self.clamp_selection();
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    /// An append round: the reveal restarts along with its ticker.
    fn start_round(&mut self, job: GenerationJob) {
        self.restart_ticker();
        self.spawn(job);
    }

    fn spawn(&self, job: GenerationJob) {
        let generator = Arc::clone(&self.generator);
        let tx = self.job_tx.clone();
        tokio::spawn(async move {
            let result = job.run(generator.as_ref()).await;
            if tx.send((job, result)).await.is_err() {
                debug!("app closed before the job finished");
            }
        });
    }

    /// Apply a finished job to the feed.
    pub fn apply_job(&mut self, job: GenerationJob, result: Result<String, GenerationError>) {
        match self.feed.complete(&job, result) {
            Ok(Completion::Appended(count)) => {
                self.set_status(format!("Added {count} cards"));
            }
            Ok(Completion::Replaced(index)) => {
                // The slot keeps its id, but the new card starts with its own chart type.
                if let Some(id) = self.feed.store().id_at(index) {
                    self.chart_overrides.remove(&id);
                }
                self.set_status(format!("Regenerated card {}", index + 1));
            }
            Ok(Completion::TargetGone) => {
                self.set_status("The card was deleted before its replacement arrived");
            }
            Ok(Completion::Stale) => {}
            Err(e) => {
                warn!(error = %e, "job failed");
                self.set_status("Generation failed");
            }
        }
        self.clamp_selection();
    }

    /// Drain finished jobs and reveal ticks. Returns true if anything changed.
    pub fn poll_background(&mut self) -> bool {
        let mut changed = false;
        while let Ok((job, result)) = self.job_rx.try_recv() {
            self.apply_job(job, result);
            changed = true;
        }

        let mut ticks = 0;
        if let Some(rx) = self.tick_rx.as_mut() {
            while rx.try_recv().is_ok() {
                ticks += 1;
            }
        }
        for _ in 0..ticks {
            changed |= self.feed.tick();
        }

        if self.ticker.is_some() && !self.feed.is_generating() && !self.feed.reveal_pending() {
            debug!("reveal finished, stopping ticker");
            self.stop_ticker();
        }
        changed
    }

    fn restart_ticker(&mut self) {
        let (ticker, rx) = RevealTicker::start();
        self.ticker = Some(ticker);
        self.tick_rx = Some(rx);
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
        self.tick_rx = None;
    }

    pub fn ticker_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Show every card now.
    pub fn skip_reveal(&mut self) {
        self.feed.reveal_all();
    }

    /// Leave the feed for a new topic. Late results from running jobs are ignored.
    pub fn back_to_input(&mut self) {
        self.feed.back_to_input();
        self.stop_ticker();
        self.chart_overrides.clear();
        self.selected = 0;
        self.overlay = None;
        self.screen = Screen::Input;
        self.clear_status();
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    pub fn request_slot_action(&mut self, action: SlotAction) {
        self.pending_slot = Some(action);
    }

    pub fn pending_slot_action(&self) -> Option<SlotAction> {
        self.pending_slot
    }

    /// Await the pending save slot action, if any. Returns true if one ran.
    pub async fn run_slot_action(&mut self) -> bool {
        let Some(action) = self.pending_slot.take() else {
            return false;
        };
        match action {
            SlotAction::Save => {
                if self.feed.is_empty() {
                    self.set_status("Nothing to save");
                    return true;
                }
                match self.slot.save(self.feed.cards()).await {
                    Ok(()) => {
                        info!(count = self.feed.len(), "saved infographic");
                        self.set_status(format!("Saved {} cards", self.feed.len()));
                    }
                    Err(e) => {
                        warn!(error = %e, "save failed");
                        self.set_status(format!("Save failed: {e}"));
                    }
                }
            }
            SlotAction::Load => match self.slot.load().await {
                Ok(Some(cards)) => {
                    let count = cards.len();
                    self.feed.restore(cards);
                    self.stop_ticker();
                    self.chart_overrides.clear();
                    self.selected = 0;
                    self.screen = Screen::Feed;
                    self.set_status(format!("Loaded {count} cards"));
                }
                Ok(None) => self.set_status("No saved infographic"),
                Err(e) => {
                    warn!(error = %e, "load failed");
                    self.set_status(format!("Load failed: {e}"));
                }
            },
            SlotAction::Clear => match self.slot.clear().await {
                Ok(()) => {
                    self.feed.clear();
                    self.stop_ticker();
                    self.chart_overrides.clear();
                    self.selected = 0;
                    self.set_status("Cleared the saved infographic");
                }
                Err(e) => {
                    warn!(error = %e, "clear failed");
                    self.set_status(format!("Clear failed: {e}"));
                }
            },
        }
        true
    }

    // ========================================================================
    // Selection and presentation
    // ========================================================================

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Move down; moving past the last revealed card loads more.
    pub fn select_next(&mut self) {
        let visible = self.feed.visible_count().min(self.feed.len());
        if self.selected + 1 < visible {
            self.selected += 1;
        } else if !self.feed.reveal_pending() && !self.feed.is_busy() {
            self.load_more();
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        let visible = self.feed.visible_count().min(self.feed.len());
        self.selected = visible.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.feed.len().saturating_sub(1));
    }

    /// Per-card actions only apply to cards already on screen.
    fn selected_is_revealed(&mut self) -> bool {
        if self.selected < self.feed.visible_count() {
            return true;
        }
        self.set_status(format!("Card {} is not shown yet", self.selected + 1));
        false
    }

    /// Cycle the selected chart card through bar, line and pie.
    pub fn cycle_chart(&mut self) {
        let Some(Card::Chart(chart)) = self.feed.cards().get(self.selected) else {
            self.set_status("Select a chart card to change its type");
            return;
        };
        let chart_type = chart.chart_type;
        if !self.selected_is_revealed() {
            return;
        }
        let Some(id) = self.feed.store().id_at(self.selected) else {
            return;
        };
        let current = self
            .chart_overrides
            .get(&id)
            .copied()
            .unwrap_or(chart_type);
        let next = current.next();
        self.chart_overrides.insert(id, next);
        self.set_status(format!("Showing as a {} chart", next.name().to_lowercase()));
    }

    /// Chart type overrides by card position.
    pub fn chart_types(&self) -> Vec<Option<ChartType>> {
        let store = self.feed.store();
        (0..store.len())
            .map(|i| {
                store
                    .id_at(i)
                    .and_then(|id| self.chart_overrides.get(&id).copied())
            })
            .collect()
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.set_status(format!("{} theme", self.theme.mode.name()));
    }

    pub fn tick(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
    }

    // ========================================================================
    // Overlays
    // ========================================================================

    pub fn toggle_help(&mut self) {
        if matches!(self.overlay, Some(Overlay::Help)) {
            self.overlay = None;
        } else {
            self.overlay = Some(Overlay::Help);
        }
    }

    pub fn open_creative(&mut self) {
        self.overlay = Some(Overlay::Creative(CreativeForm::new()));
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// The creative form, if its overlay is open.
    pub fn creative_form_mut(&mut self) -> Option<&mut CreativeForm> {
        match self.overlay.as_mut() {
            Some(Overlay::Creative(form)) => Some(form),
            _ => None,
        }
    }

    /// Run the open creative tool and append its card.
    pub fn run_creative(&mut self) {
        let Some(form) = self.creative_form_mut() else {
            return;
        };
        let Some(run) = form.run() else {
            self.set_status("Fill in every input first");
            return;
        };
        let tool = run.tool;
        self.feed.push_card(run.into_card());
        self.overlay = None;
        self.screen = Screen::Feed;
        self.selected = self.feed.len() - 1;
        self.set_status(format!("Added {} card", tool.label().to_lowercase()));
    }

    // ========================================================================
    // Input and status
    // ========================================================================

    pub fn input(&self) -> &LineEditor {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut LineEditor {
        &mut self.input
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infographic_core::card::{ChartCard, ChartData, ChartDataset};
    use infographic_core::{MemorySlot, MockGenerator, MockResponse};
    use std::time::Duration;

    fn app(responses: Vec<MockResponse>) -> App {
        App::new(
            Arc::new(MockGenerator::new(responses)),
            Box::new(MemorySlot::new()),
        )
    }

    fn type_topic(app: &mut App, topic: &str) {
        for c in topic.chars() {
            app.input_mut().insert(c);
        }
    }

    /// Poll until a job result has been applied.
    async fn settle(app: &mut App) {
        for _ in 0..100 {
            if !app.feed.is_busy() {
                return;
            }
            app.poll_background();
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("job never completed");
    }

    fn chart() -> Card {
        Card::Chart(ChartCard {
            title: "Yield".into(),
            data: ChartData {
                labels: vec!["a".into()],
                datasets: vec![ChartDataset {
                    label: "x".into(),
                    data: vec![1.0],
                }],
            },
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_submit_runs_job_and_reveals() {
        let mut app = app(vec![MockResponse::cards(vec![
            Card::title("Tea"),
            Card::text("Old."),
        ])]);
        app.submit_topic();
        assert_eq!(app.screen, Screen::Input);
        assert_eq!(app.status_message(), Some("Enter a topic first"));

        type_topic(&mut app, "Tea");
        app.submit_topic();
        assert_eq!(app.screen, Screen::Feed);
        assert!(app.ticker_running());
        assert!(app.input().is_blank());

        settle(&mut app).await;
        assert_eq!(app.feed.len(), 2);
        assert_eq!(app.status_message(), Some("Added 2 cards"));

        app.skip_reveal();
        app.poll_background();
        assert_eq!(app.feed.visible_count(), 2);
        assert!(!app.ticker_running());
    }

    #[tokio::test]
    async fn test_scrolling_past_end_loads_more() {
        let mut app = app(vec![
            MockResponse::cards(vec![Card::title("Tea")]),
            MockResponse::cards(vec![Card::text("More tea.")]),
        ]);
        type_topic(&mut app, "Tea");
        app.submit_topic();
        settle(&mut app).await;
        app.skip_reveal();

        app.select_next();
        assert!(app.feed.is_busy());
        settle(&mut app).await;
        assert_eq!(app.feed.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_job_sets_error() {
        let mut app = app(vec![MockResponse::fail("quota exceeded")]);
        type_topic(&mut app, "Tea");
        app.submit_topic();
        settle(&mut app).await;

        assert!(app.feed.error().unwrap().contains("quota exceeded"));
        assert_eq!(app.status_message(), Some("Generation failed"));
    }

    #[tokio::test]
    async fn test_back_to_input_drops_late_result() {
        let mut app = app(vec![MockResponse::cards(vec![Card::title("Tea")])]);
        type_topic(&mut app, "Tea");
        app.submit_topic();
        app.back_to_input();
        assert!(!app.ticker_running());

        tokio::time::sleep(Duration::from_millis(20)).await;
        app.poll_background();
        assert!(app.feed.is_empty());
        assert_eq!(app.screen, Screen::Input);
    }

    #[tokio::test]
    async fn test_chart_cycle_and_delete() {
        let mut app = app(vec![]);
        app.feed.restore(vec![Card::title("Tea"), chart()]);

        app.cycle_chart();
        assert_eq!(app.chart_types(), vec![None, None]);

        app.select_next();
        app.cycle_chart();
        assert_eq!(app.chart_types(), vec![None, Some(ChartType::Line)]);
        app.cycle_chart();
        app.cycle_chart();
        assert_eq!(app.chart_types(), vec![None, Some(ChartType::Bar)]);

        app.delete_selected();
        assert_eq!(app.feed.len(), 1);
        assert_eq!(app.selected(), 0);
        assert!(app.chart_overrides.is_empty());
    }

    #[tokio::test]
    async fn test_hidden_selection_is_not_acted_on() {
        let mut app = app(vec![
            MockResponse::cards(vec![Card::title("Tea"), chart()]),
            MockResponse::cards(vec![Card::text("More tea.")]),
        ]);
        type_topic(&mut app, "Tea");
        app.submit_topic();
        settle(&mut app).await;
        app.skip_reveal();
        app.select_last();
        assert_eq!(app.selected(), 1);

        // A new round hides every card until it is revealed again
        app.load_more();
        assert_eq!(app.feed.visible_count(), 0);

        app.delete_selected();
        assert_eq!(app.feed.len(), 2);
        assert_eq!(app.status_message(), Some("Card 2 is not shown yet"));

        app.cycle_chart();
        assert_eq!(app.chart_types(), vec![None, None]);

        settle(&mut app).await;
        app.skip_reveal();
        app.delete_selected();
        assert_eq!(app.feed.len(), 2);
        assert_eq!(app.feed.cards()[1], Card::text("More tea."));
    }

    #[tokio::test]
    async fn test_save_clear_load() {
        let mut app = app(vec![]);
        app.feed.restore(vec![Card::title("Tea")]);

        app.request_slot_action(SlotAction::Save);
        assert!(app.run_slot_action().await);
        assert_eq!(app.status_message(), Some("Saved 1 cards"));

        app.request_slot_action(SlotAction::Clear);
        app.run_slot_action().await;
        assert!(app.feed.is_empty());

        app.request_slot_action(SlotAction::Load);
        app.run_slot_action().await;
        assert_eq!(app.status_message(), Some("No saved infographic"));
        assert!(!app.run_slot_action().await);
    }

    #[tokio::test]
    async fn test_creative_overlay_appends_card() {
        let mut app = app(vec![]);
        app.open_creative();
        app.run_creative();
        assert_eq!(app.status_message(), Some("Fill in every input first"));
        assert!(app.has_overlay());

        if let Some(form) = app.creative_form_mut() {
            form.editor_mut().set("city");
        }
        app.run_creative();
        assert!(!app.has_overlay());
        assert_eq!(app.feed.len(), 1);
        assert_eq!(app.feed.visible_count(), 1);
        assert_eq!(app.screen, Screen::Feed);
    }
}
