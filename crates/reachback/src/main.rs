// SPDX-FileCopyrightText: 2026 Reachback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reachback - automated client follow-up for phone calls.
//!
//! This is the binary entry point for the Reachback daemon.

mod bridge;
mod serve;
mod status;

use clap::{Parser, Subcommand};

/// Reachback - automated client follow-up for phone calls.
#[derive(Parser, Debug)]
#[command(name = "reachback", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Reachback daemon over the stdio host bridge.
    Serve,
    /// Print the persisted monitoring state.
    Status,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match reachback_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            reachback_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Status) => status::run_status(config).await,
        Some(Commands::Config) => {
            match toml::to_string_pretty(&config) {
                Ok(rendered) => {
                    print!("{rendered}");
                    Ok(())
                }
                Err(e) => Err(reachback_core::ReachbackError::Internal(format!(
                    "failed to render config: {e}"
                ))),
            }
        }
        None => {
            println!("reachback: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("reachback: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed).
        let config = reachback_config::load_and_validate()
            .expect("default config should be valid");
        assert_eq!(config.service.name, "reachback");
    }
}
