//! autoupdate - keep pull requests up to date with their base branch

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "autoupdate")]
#[command(about = "Keep pull requests up to date with their base branch and merge them when ready")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle the webhook event of the current GitHub Actions run
    Action {
        /// Event name (push, status, pull_request, pull_request_review)
        #[arg(long, env = "GITHUB_EVENT_NAME")]
        event_name: String,

        /// Path to the JSON event payload
        #[arg(long, env = "GITHUB_EVENT_PATH")]
        event_path: PathBuf,
    },
    /// Update a single PR or all PRs based on a branch, given its GitHub URL
    Local {
        /// https://github.com/<owner>/<repo>/pull/<n> or .../tree/<branch>
        url: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Action {
            event_name,
            event_path,
        } => cli::run_action(cli.config.as_deref(), &event_name, &event_path).await,
        Commands::Local { url } => cli::run_local(cli.config.as_deref(), &url).await,
    };

    cli::finish(result)
}
