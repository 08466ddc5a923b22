//! Faucet Store CLI - operator tooling for the admin roster.
//!
//! # Usage
//!
//! ```bash
//! # Grant the first admin claim (no existing admin required)
//! faucet-cli admin bootstrap --email admin@example.com
//!
//! # List every user holding the admin claim
//! faucet-cli admin list
//! ```
//!
//! # Commands
//!
//! - `admin bootstrap` - Grant the admin claim directly in the directory
//! - `admin list` - List admins

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "faucet-cli")]
#[command(author, version, about = "Faucet Store CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the admin claim
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Grant the admin claim without an existing admin caller
    Bootstrap {
        /// Email of a user already in the directory
        #[arg(short, long)]
        email: String,
    },
    /// List users holding the admin claim
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<(), commands::admin::CliError> {
    match cli.command {
        Commands::Admin { action } => {
            let path = commands::admin::directory_path()?;
            match action {
                AdminAction::Bootstrap { email } => {
                    commands::admin::bootstrap(&path, &email).await?;
                }
                AdminAction::List => {
                    for admin in commands::admin::list(&path).await? {
                        tracing::info!("{} ({})", admin.email, admin.uid);
                    }
                }
            }
        }
    }
    Ok(())
}
