//! Generative infographic TUI application.
//!
//! Type a topic and the model builds an infographic of sourced cards, one
//! section at a time.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface suitable for scripts:
//!
//! ```bash
//! echo "topic The history of tea" | cargo run -p infographic -- --headless
//! ```

mod app;
mod events;
mod headless;
mod ui;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use infographic_core::{ClaudeGenerator, FeedConfig, FileSlot};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use app::App;
use events::{handle_event, EventResult};
use ui::render::render;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let config = FeedConfig::from_env();

    if args.iter().any(|a| a == "--headless") {
        init_stderr_logging();
        if config.generator.api_key.is_none() {
            eprintln!("Warning: ANTHROPIC_API_KEY is not set; generation will fail.");
        }
        return headless::run_headless(config).await.map_err(|e| e.into());
    }

    // Stdout belongs to the terminal UI, so logs go to a file
    let _guard = init_file_logging();

    let missing_key = config.generator.api_key.is_none();
    let slot = FileSlot::new(config.save_path.clone());
    let generator = ClaudeGenerator::new(config.generator)?;
    tracing::info!(save_path = %slot.path().display(), "starting");

    let mut app = App::new(Arc::new(generator), Box::new(slot));
    if missing_key {
        app.set_status("No API key configured - set ANTHROPIC_API_KEY to generate");
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    loop {
        // Render
        terminal.draw(|f| render(f, &app))?;

        // Finished jobs and reveal ticks
        app.poll_background();

        // Save slot operations are awaited before the next event
        app.run_slot_action().await;

        // Poll for events with timeout for animations
        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            match handle_event(&mut app, ev) {
                EventResult::Quit => return Ok(()),
                EventResult::NeedsRedraw | EventResult::Continue => {}
            }
        } else {
            app.tick();
        }

        if app.should_quit {
            return Ok(());
        }

        // Let spawned jobs and the reveal ticker make progress
        tokio::task::yield_now().await;
    }
}

/// Log to a daily file under the data directory. The guard flushes on drop.
fn init_file_logging() -> Option<WorkerGuard> {
    let dir = log_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Could not create log directory {}: {e}", dir.display());
        return None;
    }
    let appender = tracing_appender::rolling::daily(&dir, "infographic.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .init();
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("infographic")
        .join("logs")
}

fn print_help() {
    println!("Generative Infographic - AI-built infographics in the terminal");
    println!();
    println!("USAGE:");
    println!("  infographic [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help       Show this help message");
    println!("  --headless       Run in headless mode (line commands on stdin, no TUI)");
    println!();
    println!("ENVIRONMENT:");
    println!("  ANTHROPIC_API_KEY        API key (required to generate)");
    println!("  INFOGRAPHIC_MODEL        Model override");
    println!("  INFOGRAPHIC_MAX_TOKENS   Max tokens per response (default 8192)");
    println!("  INFOGRAPHIC_WEB_SEARCH   Ground answers with web search (default on)");
    println!("  INFOGRAPHIC_SAVE_PATH    Save slot file");
    println!("  RUST_LOG                 Log filter (default info)");
    println!();
    println!("EXAMPLES:");
    println!("  infographic                                   # Interactive TUI mode");
    println!("  echo 'topic Coral reefs' | infographic --headless");
}
