//! CLI command implementations

mod action;
mod context;
mod local;

pub use action::run_action;
pub use local::run_local;

use anstream::{eprintln, println};
use owo_colors::OwoColorize;
use pr_autoupdate::error::Result;
use pr_autoupdate::outcome::Outcome;
use pr_autoupdate::router::EventReport;
use std::process::ExitCode;

/// Exit code GitHub Actions shows as "neutral"
const NEUTRAL_EXIT_CODE: u8 = 78;

/// Print the outcome and map it to an exit code
pub fn finish(result: Result<Outcome<EventReport>>) -> ExitCode {
    match result {
        Ok(Outcome::Success(report)) => {
            println!("{} {report}", "✓".green());
            ExitCode::SUCCESS
        }
        Ok(Outcome::Neutral(reason)) => {
            println!("{} {}", "–".dimmed(), reason.dimmed());
            ExitCode::from(NEUTRAL_EXIT_CODE)
        }
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            if e.is_client_error() {
                eprintln!(
                    "{}",
                    "hint: check the command arguments, event payload and configuration".dimmed()
                );
            }
            ExitCode::FAILURE
        }
    }
}
