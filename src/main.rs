//! SUDA_WiFi - login client for the campus network portal
//!
//! Detects whether this machine is authenticated on the gateway, logs in
//! with a carrier account, and logs out.

mod cli;
mod config;
mod error;
mod gateway;
mod http;
mod i18n;
mod models;
mod parser;
mod session;
mod update;
mod utils;

#[cfg(test)]
mod test_util;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::Console;
use gateway::DrcomGateway;
use i18n::Language;
use models::Carrier;
use session::SessionReconciler;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use update::UpdateCheck;

/// Longest we wait for the update check once the main work is done
const UPDATE_GRACE: Duration = Duration::from_secs(3);

#[derive(Parser, Debug)]
#[command(name = "sudawifi")]
#[command(about = "SUDA_WiFi Campus Network Login", long_about = None)]
struct Args {
    /// Config file path (default: search config.toml, /etc, ~/.config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface language
    #[arg(short, long, value_enum)]
    lang: Option<Language>,

    /// Skip the background version check
    #[arg(long)]
    no_update_check: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the current session
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log in and wait for the gateway to confirm
    Login {
        #[arg(long, value_enum)]
        carrier: Carrier,

        /// Account name without carrier suffix
        #[arg(long)]
        account: String,

        #[arg(long, env = "SUDAWIFI_PASSWORD", hide_env_values = true)]
        password: String,

        /// Client address (default: detected)
        #[arg(long)]
        ip: Option<String>,
    },
    /// Log out the account the gateway currently reports
    Logout {
        /// Client address (default: as reported by the gateway)
        #[arg(long)]
        ip: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Load configuration
    let cfg = config::Config::load(args.config.as_deref())?;

    // Initialize logging; stdout belongs to the prompts
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cfg.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let console = Console::new(args.lang.unwrap_or(cfg.ui.language));

    let json_output = matches!(args.command, Some(Command::Status { json: true }));
    let update = if args.no_update_check || json_output {
        UpdateCheck::disabled()
    } else {
        UpdateCheck::spawn(&cfg.update)
    };

    let gateway = DrcomGateway::new(&cfg.gateway)?;
    let mut reconciler = SessionReconciler::new(gateway, cfg.session.poll_policy());

    if !json_output {
        console.banner();
    }

    let success = match args.command {
        None => cli::run_interactive(&console, &mut reconciler).await?,
        Some(Command::Status { json }) => cli::run_status(&console, &reconciler, json).await?,
        Some(Command::Login {
            carrier,
            account,
            password,
            ip,
        }) => {
            cli::run_login(
                &console,
                &reconciler,
                carrier,
                &account,
                &password,
                ip.as_deref(),
            )
            .await?
        }
        Some(Command::Logout { ip }) => {
            cli::run_logout(&console, &mut reconciler, ip.as_deref()).await?
        }
    };

    if update.finish(UPDATE_GRACE).await {
        console.update_notice(update::PROJECT_URL);
    }
    if !json_output {
        console.banner();
        println!();
    }

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
