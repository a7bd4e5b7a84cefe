//! Headless mode for the infographic generator.
//!
//! A line-oriented interface for running without a TUI, meant for scripts
//! and automated testing. Each line on stdin is one command; results are
//! printed as tagged lines (`[CARD]`, `[SAVED]`, `[ERROR]`, ...).

use infographic_core::{
    Card, Completion, CreativeTool, FeedConfig, HeadlessError, HeadlessFeed,
};
use std::io::{self, BufRead, Write};

/// One headless command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Topic(String),
    More,
    Regen(usize),
    Delete(usize),
    Save,
    Load,
    Clear,
    List,
    Creative {
        tool: CreativeTool,
        inputs: Vec<String>,
    },
    Help,
    Quit,
}

/// Parse one input line. Card indices are 0-based, as printed by `list`.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let index = |what: &str| -> Result<usize, String> {
        rest.parse::<usize>()
            .map_err(|_| format!("Usage: {what} <index>"))
    };

    match word.to_ascii_lowercase().as_str() {
        "topic" if rest.is_empty() => Err("Usage: topic <text>".to_string()),
        "topic" => Ok(Command::Topic(rest.to_string())),
        "more" => Ok(Command::More),
        "regen" | "regenerate" => index("regen").map(Command::Regen),
        "delete" | "del" => index("delete").map(Command::Delete),
        "save" => Ok(Command::Save),
        "load" => Ok(Command::Load),
        "clear" => Ok(Command::Clear),
        "list" | "ls" => Ok(Command::List),
        "creative" => parse_creative(rest),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err("Unknown command. Type help for help.".to_string()),
    }
}

/// `creative <tool> <input>[, <second input>]`
fn parse_creative(rest: &str) -> Result<Command, String> {
    let (key, inputs) = rest
        .split_once(char::is_whitespace)
        .unwrap_or((rest, ""));
    let tool = CreativeTool::from_key(key).ok_or_else(|| {
        let keys: Vec<&str> = CreativeTool::ALL.iter().map(|t| t.key()).collect();
        format!("Unknown tool. Tools: {}", keys.join(", "))
    })?;
    let inputs: Vec<String> = if tool.input_count() > 1 {
        inputs.split(',').map(|s| s.trim().to_string()).collect()
    } else {
        vec![inputs.trim().to_string()]
    };
    Ok(Command::Creative { tool, inputs })
}

fn print_help() {
    println!("Commands:");
    println!("  topic <text>                 - Start a new infographic");
    println!("  more                         - Generate the next section");
    println!("  regen <index>                - Regenerate a card");
    println!("  delete <index>               - Delete a card");
    println!("  creative <tool> <input>[, <input>]");
    println!("                               - Add a creative card");
    println!("  list                         - List the cards");
    println!("  save / load / clear          - Use the save slot");
    println!("  help                         - Show this help");
    println!("  quit                         - Exit");
}

fn print_card(index: usize, card: &Card) {
    println!("[CARD] {index}: ({}) {}", card.kind(), card.headline());
    let hosts: Vec<&str> = card.sources().iter().map(|s| s.host()).collect();
    if !hosts.is_empty() {
        println!("       sources: {}", hosts.join(", "));
    }
}

fn print_completion(feed: &HeadlessFeed, completion: Completion) {
    match completion {
        Completion::Appended(count) => {
            let cards = feed.cards();
            let first = cards.len() - count.min(cards.len());
            for (i, card) in cards.iter().enumerate().skip(first) {
                print_card(i, card);
            }
            println!("[DONE] {count} cards added, {} total", cards.len());
        }
        Completion::Replaced(index) => {
            if let Some(card) = feed.cards().get(index) {
                print_card(index, card);
            }
            println!("[DONE] card {index} regenerated");
        }
        Completion::TargetGone => println!("[DONE] card was deleted before regeneration finished"),
        Completion::Stale => println!("[DONE] result discarded"),
    }
}

/// Execute one command. Returns false when the session should end.
pub async fn execute(feed: &mut HeadlessFeed, command: Command) -> Result<bool, HeadlessError> {
    match command {
        Command::Topic(topic) => {
            let completion = feed.submit(&topic).await?;
            print_completion(feed, completion);
        }
        Command::More => {
            let completion = feed.more().await?;
            print_completion(feed, completion);
        }
        Command::Regen(index) => {
            let completion = feed.regenerate(index).await?;
            print_completion(feed, completion);
        }
        Command::Delete(index) => {
            let card = feed.delete(index)?;
            println!("[DELETED] ({}) {}", card.kind(), card.headline());
        }
        Command::Save => {
            feed.save().await?;
            println!("[SAVED] {} cards", feed.cards().len());
        }
        Command::Load => {
            if feed.load().await? {
                println!(
                    "[LOADED] {} cards about {}",
                    feed.cards().len(),
                    feed.topic().unwrap_or_default()
                );
            } else {
                println!("[LOADED] nothing saved");
            }
        }
        Command::Clear => {
            feed.clear_saved().await?;
            println!("[CLEARED]");
        }
        Command::List => {
            if feed.cards().is_empty() {
                println!("[LIST] no cards");
            }
            for (i, card) in feed.cards().iter().enumerate() {
                print_card(i, card);
            }
        }
        Command::Creative { tool, inputs } => {
            if !feed.creative(tool, &inputs) {
                return Err(HeadlessError::Rejected("Every input must be filled in"));
            }
            let index = feed.cards().len() - 1;
            print_card(index, &feed.cards()[index]);
        }
        Command::Help => print_help(),
        Command::Quit => {
            println!("Goodbye!");
            return Ok(false);
        }
    }
    Ok(true)
}

/// Run the headless loop over stdin until EOF or `quit`.
pub async fn run_headless(config: FeedConfig) -> Result<(), HeadlessError> {
    let mut feed = HeadlessFeed::from_config(config)?;

    println!("=== Infographic Headless Mode ===");
    println!();
    print_help();
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("[ERROR] {message}");
                stdout.flush().ok();
                continue;
            }
        };

        let generating = matches!(command, Command::Topic(_) | Command::More | Command::Regen(_));
        if generating {
            println!("[PROCESSING]");
            stdout.flush().ok();
        }

        match execute(&mut feed, command).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("[ERROR] {e}"),
        }
        stdout.flush().ok();
    }

    Ok(())
}
