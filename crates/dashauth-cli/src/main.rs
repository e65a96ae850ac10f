//! dashauth - log in to a token-gated dashboard from the terminal.
//!
//! Stores the dashboard token, validates it against the backend and reports
//! the session state. All session changes go through `SessionClient`.

use std::future::Future;
use std::io;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use dashauth_core::{Config, SessionClient, SessionState};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ============================================================================
// Constants
// ============================================================================

/// Default re-validation period for `watch`, in seconds
const DEFAULT_WATCH_INTERVAL_SECS: u64 = 60;

#[derive(Parser)]
#[command(name = "dashauth", version, about = "Manage a dashboard session token")]
struct Cli {
    /// Override the API base URL (e.g. https://dash.example.com/api)
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store a token and validate it
    Login {
        /// Token to use; prompted for when omitted
        #[arg(long)]
        token: Option<String>,
    },
    /// Forget the stored token
    Logout,
    /// Validate the stored token and print the session state
    Status,
    /// Re-validate periodically and print every change
    Watch {
        /// Seconds between validations
        #[arg(long, default_value_t = DEFAULT_WATCH_INTERVAL_SECS)]
        interval: u64,
    },
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base;
    }
    info!(api_base = %config.api_base, storage = ?config.storage, "dashauth starting");

    let session = SessionClient::from_config(&config)?;

    let authenticated = match cli.command {
        Command::Login { token } => {
            let token = match token {
                Some(token) => token,
                None => rpassword::prompt_password("Dashboard token: ")?,
            };
            let token = token.trim();
            if token.is_empty() {
                bail!("Token must not be empty");
            }
            session.login(token).await;
            print_state(&session.state());
            session.state().is_authenticated
        }
        Command::Logout => {
            session.logout();
            println!("Logged out");
            true
        }
        Command::Status => {
            session.check_auth().await;
            print_state(&session.state());
            session.state().is_authenticated
        }
        Command::Watch { interval } => {
            watch(&session, Duration::from_secs(interval.max(1))).await;
            true
        }
    };

    Ok(if authenticated {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Re-validate on a timer until Ctrl-C, printing each settled change
async fn watch(session: &SessionClient, interval: Duration) {
    let mut watcher = session.subscribe();
    let printer = tokio::spawn(async move {
        let mut last: Option<SessionState> = None;
        while let Some(state) = watcher.settled().await {
            if last.as_ref() != Some(&state) {
                print_state(&state);
                last = Some(state);
            }
            if watcher.changed().await.is_none() {
                break;
            }
        }
    });

    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    revalidate_until(session, interval, ctrl_c).await;
    info!("Stopping watch");
    printer.abort();
}

/// Run `check_auth` on every tick until `shutdown` resolves, even mid-request
async fn revalidate_until(
    session: &SessionClient,
    interval: Duration,
    shutdown: impl Future<Output = ()>,
) {
    tokio::pin!(shutdown);
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                tokio::select! {
                    _ = session.check_auth() => {}
                    _ = &mut shutdown => break,
                }
            }
            _ = &mut shutdown => break,
        }
    }
}

fn print_state(state: &SessionState) {
    match (state.is_authenticated, state.user_id.as_deref()) {
        (true, Some(user_id)) => println!("Authenticated as user {}", user_id),
        _ => println!("Not authenticated"),
    }
}
