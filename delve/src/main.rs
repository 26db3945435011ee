//! Delve - a terminal text adventure.
//!
//! A vim-style terminal interface: create a character, pick an adventure,
//! then explore by typing commands.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a plain line-oriented interface suitable for
//! scripted play:
//!
//! ```bash
//! printf 'rogue\nhuman\n\nPip\ncellar\nlook\nquit\n' | cargo run -p delve -- --headless
//! ```

mod app;
mod events;
mod flow;
mod headless;
mod ui;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use delve_core::SessionConfig;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use app::App;
use events::{handle_event, EventResult};
use flow::GameFlow;
use ui::render::render;

const DEFAULT_LOG_FILTER: &str = "delve=info,delve_core=info";

/// Command line options.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Options {
    headless: bool,
    help: bool,
    adventures_dir: PathBuf,
    saves_dir: PathBuf,
    autosave: bool,
}

impl Options {
    fn session_config(&self) -> SessionConfig {
        SessionConfig::new()
            .with_adventures_dir(&self.adventures_dir)
            .with_saves_dir(&self.saves_dir)
            .with_autosave(self.autosave)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let options = parse_args(
        &args,
        std::env::var("DELVE_ADVENTURES").ok(),
        std::env::var("DELVE_SAVES").ok(),
    );

    if options.help {
        print_help();
        return Ok(());
    }

    let config = options.session_config();

    if options.headless {
        init_stderr_logging();
        if let Err(e) = headless::run_headless(config).await {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        return Ok(());
    }

    init_file_logging(&options.saves_dir)?;

    // Content errors are fatal before the terminal is touched
    let flow = match GameFlow::new(config).await {
        Ok(flow) => flow,
        Err(e) => {
            eprintln!("Failed to start: {e}");
            std::process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, App::new(flow)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    match result {
        Ok(Some(fatal)) => {
            eprintln!("Error: {fatal}");
            std::process::exit(1);
        }
        Ok(None) => Ok(()),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Run the TUI until the player quits. Returns the fatal error, if the game
/// ended on one.
async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<Option<String>> {
    let mut pending_input: Option<String> = None;

    loop {
        terminal.draw(|f| render(f, &app))?;

        if app.pending_save {
            app.pending_save = false;
            app.save().await;
        }

        if let Some(input) = pending_input.take() {
            app.set_status("Processing...");
            terminal.draw(|f| render(f, &app))?;
            app.process_player_input(&input).await;
        }

        if app.should_quit {
            return Ok(app.fatal_error.take());
        }

        if event::poll(Duration::from_millis(100))? {
            match handle_event(&mut app, event::read()?) {
                EventResult::Quit => return Ok(app.fatal_error.take()),
                EventResult::ProcessInput(input) => pending_input = Some(input),
                EventResult::NeedsRedraw | EventResult::Continue => {}
            }
        }
    }
}

/// Parse arguments, falling back to the environment and then to defaults.
fn parse_args(
    args: &[String],
    env_adventures: Option<String>,
    env_saves: Option<String>,
) -> Options {
    let mut options = Options {
        headless: false,
        help: false,
        adventures_dir: PathBuf::from(env_adventures.unwrap_or_else(|| "adventures".to_string())),
        saves_dir: PathBuf::from(env_saves.unwrap_or_else(|| "saves".to_string())),
        autosave: true,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--headless" => options.headless = true,
            "-h" | "--help" => options.help = true,
            "--no-autosave" => options.autosave = false,
            "--adventures" => {
                if let Some(dir) = args.get(i + 1) {
                    options.adventures_dir = PathBuf::from(dir);
                    i += 1;
                }
            }
            "--saves" => {
                if let Some(dir) = args.get(i + 1) {
                    options.saves_dir = PathBuf::from(dir);
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }

    options
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into())
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Logs go to `delve.log` in the save directory so they stay off the
/// alternate screen.
fn init_file_logging(saves_dir: &std::path::Path) -> io::Result<()> {
    std::fs::create_dir_all(saves_dir)?;
    let file = File::options()
        .create(true)
        .append(true)
        .open(saves_dir.join("delve.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn print_help() {
    println!("Delve - a terminal text adventure");
    println!();
    println!("USAGE:");
    println!("  delve [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help            Show this help message");
    println!("  --headless            Run in headless mode (text-only, no TUI)");
    println!("  --adventures <DIR>    Adventure directory (default: adventures)");
    println!("  --saves <DIR>         Save directory (default: saves)");
    println!("  --no-autosave         Do not save after each command");
    println!();
    println!("ENVIRONMENT:");
    println!("  DELVE_ADVENTURES      Adventure directory, overridden by --adventures");
    println!("  DELVE_SAVES           Save directory, overridden by --saves");
    println!("  RUST_LOG              Log filter (default: {DEFAULT_LOG_FILTER})");
    println!();
    println!("EXAMPLES:");
    println!("  delve                               # Interactive TUI mode");
    println!("  delve --headless --no-autosave");
    println!("  delve --adventures ./my-adventures --saves ~/.delve");
}
