//! Shared CLI helpers — banner and turn printing.

use colored::Colorize;

use reagent_core::types::TurnResult;

/// Print the banner shown at REPL start.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "reagent".cyan().bold(), version.dimmed());
    println!("{}", "Type a message, or \"exit\" to quit.".dimmed());
    println!();
}

/// Print the outcome of one turn.
pub fn print_turn(result: &TurnResult) {
    println!();
    println!("{}", "reagent".cyan().bold());

    if let Some(error) = &result.error {
        println!("{}", result.response);
        eprintln!("{}", format!("(error: {error})").red().dimmed());
    } else {
        if result.response.is_empty() {
            println!("{}", "(no response)".dimmed());
        } else {
            println!("{}", result.response);
        }
        if let Some(tool) = &result.tool_used {
            println!("{}", format!("(used tool: {tool})").dimmed());
        }
    }
    println!();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
