//! # Storefront Terminal Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Terminal                              │
//! │                                                                         │
//! │  main.rs ────► parses flags, starts the runtime                        │
//! │  lib.rs ─────► logging, config, wiring, shell                          │
//! │                                                                         │
//! │  Remote API ◄──── storefront-client (HTTP) ◄──── checkout / catalog    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use clap::Parser;

use storefront_terminal::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match storefront_terminal::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("storefront: {}", err.message);
            ExitCode::FAILURE
        }
    }
}
