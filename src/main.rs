#![allow(clippy::uninlined_format_args)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod browser;
mod challenge;
mod commands;
mod config;
mod crypto;
mod driver;
mod errors;
mod login;
mod store;
mod token;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const _EXIT_COMMAND_ERROR: i32 = 1;
const _EXIT_LOGIN_VERIFICATION: i32 = 2;
const _EXIT_MISSING_CREDENTIALS: i32 = 3;
const _EXIT_LAUNCH_FAILED: i32 = 4;
const _EXIT_TIMEOUT: i32 = 5;

#[derive(Parser)]
#[command(name = "linkpilot")]
#[command(about = "Session-lifecycle manager for LinkedIn automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// State directory for stored cookies (default: ~/.linkpilot)
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in, reusing the stored session cookie when possible
    Login {
        /// Run the browser without a visible window
        #[arg(long)]
        headless: bool,

        /// Run the browser with a visible, maximized window
        #[arg(long, conflicts_with = "headless")]
        headful: bool,

        /// Pick a random realistic user-agent per launch
        #[arg(long)]
        rotate_user_agent: bool,

        /// Keep the session open until Ctrl+C
        #[arg(long)]
        hold: bool,
    },

    /// Log out of the remote session and delete the stored cookie
    Logout {
        /// Run the browser without a visible window
        #[arg(long)]
        headless: bool,

        /// Run the browser with a visible, maximized window
        #[arg(long, conflicts_with = "headless")]
        headful: bool,
    },

    /// Show the state of the stored session cookie
    Status,

    /// Encrypt the plaintext cookie file at rest
    Seal {
        /// Encryption secret (falls back to DECRYPT_KEY)
        #[arg(long)]
        secret: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let result = run().await;

    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(err) => {
            // Convert to our error type to get the proper exit code
            let pilot_err: errors::LinkpilotError = err.into();

            // JSON error to stdout for programmatic consumption
            let error_json = json!({
                "error": true,
                "message": pilot_err.to_string(),
                "exit_code": pilot_err.exit_code()
            });
            println!(
                "{}",
                serde_json::to_string(&error_json).unwrap_or_else(|_| "{}".to_string())
            );

            // Also log to stderr for human reading
            eprintln!("Error: {}", pilot_err);
            std::process::exit(pilot_err.exit_code());
        }
    }
}

async fn run() -> Result<()> {
    // Logs to stderr so JSON output on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkpilot=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Login {
            headless,
            headful,
            rotate_user_agent,
            hold,
        } => {
            commands::login::handle_login(cli.state_dir, headless, headful, rotate_user_agent, hold)
                .await?
        }

        Commands::Logout { headless, headful } => {
            commands::logout::handle_logout(cli.state_dir, headless, headful).await?
        }

        Commands::Status => commands::status::handle_status(cli.state_dir).await?,

        Commands::Seal { secret } => commands::seal::handle_seal(cli.state_dir, secret).await?,
    }

    Ok(())
}
