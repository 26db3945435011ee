//! Headless mode for delve.
//!
//! A plain line-oriented interface with no TUI, for scripted play and
//! automated testing.

use delve_core::{SessionConfig, SessionError};
use std::io::{self, BufRead, Write};

use crate::flow::{roll_dice, GameFlow};

/// Run the game in headless mode.
///
/// Lines starting with `#` are meta commands (help, status, save, quit).
/// Everything else goes to the current phase: character creation, the
/// adventure lobby, or the game itself.
pub async fn run_headless(config: SessionConfig) -> Result<(), SessionError> {
    let mut flow = GameFlow::new(config).await?;

    println!("=== Delve Headless Mode ===");
    print_help();
    println!();
    println!("{}", flow.opening());
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
        let line = line.trim();

        if let Some(command) = line.strip_prefix('#') {
            match command.split_whitespace().next() {
                Some("quit") | Some("exit") => {
                    println!("Goodbye!");
                    break;
                }
                Some("status") => print_status(&flow),
                Some("save") => match flow.save().await {
                    Ok(true) => println!("[SAVED]"),
                    Ok(false) => println!("[ERROR] Nothing to save."),
                    Err(e) => println!("[ERROR] Save failed: {e}"),
                },
                Some("roll") => {
                    let notation = command.trim_start_matches("roll").trim();
                    println!("[ROLL] {}", roll_dice(notation));
                }
                Some("help") => print_help(),
                _ => println!("[ERROR] Unknown command. Type #help for help."),
            }
            stdout.flush().ok();
            continue;
        }

        let reply = flow.input(line).await?;
        println!("{}", reply.text);
        println!();
        stdout.flush().ok();

        if reply.finished {
            break;
        }
    }

    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  #quit    - Exit the game");
    println!("  #save    - Save the running game now");
    println!("  #status  - Show character and location");
    println!("  #roll    - Roll dice, e.g. #roll 2d6+1");
    println!("  #help    - Show this help");
    println!("  (anything else is sent to the game)");
}

fn print_status(flow: &GameFlow) {
    println!("[STATUS]");
    for line in flow.status_lines() {
        println!("  {line}");
    }
}
