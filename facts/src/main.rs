//! Facts: an endless AI trivia feed for the terminal.
//!
//! Page through fact cards with j/k; more are fetched as you reach the last
//! one. Press t on a card to have a tutor explain the topic.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a text-based interface suitable for scripting:
//!
//! ```bash
//! printf '#next\n#tutor\n#quit\n' | cargo run -p facts -- --headless
//! ```

mod app;
mod events;
mod headless;
mod logging;
mod ui;
mod worker;

use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use facts_core::{ClaudeFactProvider, FactProvider, FactsConfig, API_KEY_ENV};
use ratatui::{backend::CrosstermBackend, Terminal};

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

    let log_path = logging::init();
    let config = FactsConfig::from_env()?;
    tracing::info!(log = ?log_path, ?config, "starting");

    // The key is read on every request, so a missing key only degrades the feed
    let has_key = std::env::var(API_KEY_ENV).is_ok_and(|key| !key.trim().is_empty());
    if !has_key {
        eprintln!("Warning: {API_KEY_ENV} is not set; the feed will only show a fallback fact.");
        eprintln!("Set it in a .env file or with: export {API_KEY_ENV}=your_key_here");
        tracing::warn!("{API_KEY_ENV} not set");
    }

    let provider = ClaudeFactProvider::new(config.clone());

    if args.iter().any(|a| a == "--headless") {
        let stdin = io::stdin();
        return headless::run_headless(provider, config, stdin.lock(), stdout())
            .await
            .map_err(Into::into);
    }

    let provider: Arc<dyn FactProvider> = Arc::new(provider);
    let (request_tx, response_rx) = worker::spawn_worker(provider, config.clone());
    let mut app = App::new(request_tx, response_rx, config);
    if args.iter().any(|a| a == "--feed") {
        app.open_feed();
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        tracing::error!(error = %e, "terminal loop failed");
        eprintln!("Error: {e}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        // Apply whatever the worker finished since the last frame
        app.process_responses();

        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout for animations
        if event::poll(Duration::from_millis(100))? {
            match handle_event(app, event::read()?) {
                EventResult::Quit => return Ok(()),
                EventResult::NeedsRedraw | EventResult::Continue => {}
            }
        } else {
            app.tick();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn print_help() {
    println!("Facts - an endless AI trivia feed");
    println!();
    println!("USAGE:");
    println!("  facts [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help       Show this help message");
    println!("  --feed           Skip the home screen and open the feed");
    println!("  --headless       Run in headless mode (text-only, no TUI)");
    println!();
    println!("KEYS:");
    println!("  j/k, arrows, mouse wheel   Next/previous card");
    println!("  g/G                        First/last card");
    println!("  t                          Learn more about the card's topic");
    println!("  i                          Ask the tutor a follow-up question");
    println!("  Esc                        Back");
    println!();
    println!("ENVIRONMENT:");
    println!("  ANTHROPIC_API_KEY     API key (required for live facts)");
    println!("  FACTS_MODEL           Model override");
    println!("  FACTS_INITIAL_BATCH   Facts loaded when the feed opens (default: 10)");
    println!("  FACTS_BATCH_SIZE      Facts per incremental fetch (default: 5)");
    println!("  FACTS_MAX_TOKENS      Max tokens per response (default: 2048)");
    println!("  FACTS_TEMPERATURE     Sampling temperature 0.0-1.0 (default: 1.0)");
    println!("  FACTS_LOG             Log filter (default: info)");
    println!("  FACTS_LOG_FILE        Log file path (default: facts.log)");
}
