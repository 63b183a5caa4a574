//! # Storefront Terminal Library
//!
//! The storefront as a terminal application: views render into a text
//! surface and the user acts through `press` and `fill` commands.
//!
//! ## Module Organization
//! ```text
//! storefront_terminal/
//! ├── lib.rs          ◄─── You are here (logging, startup, run)
//! ├── cli.rs          ◄─── Command line flags
//! ├── error.rs        ◄─── AppError { code, message }
//! ├── storefront.rs   ◄─── Wiring: bus, state holders, presenters, checkout
//! ├── checkout.rs     ◄─── Order submission with the in-flight guard
//! ├── surface.rs      ◄─── Rendered regions + modal
//! ├── shell.rs        ◄─── Command loop
//! ├── state/
//! │   └── config.rs   ◄─── Display configuration
//! └── views/
//!     ├── mod.rs      ◄─── View / Presenter traits, mount()
//!     ├── element.rs  ◄─── Element, Control
//!     └── ...         ◄─── One view + presenter per region
//! ```

pub mod checkout;
pub mod cli;
pub mod error;
pub mod shell;
pub mod state;
pub mod storefront;
pub mod surface;
pub mod views;

use std::sync::Arc;

use storefront_client::{ClientConfig, HttpTransport};
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use error::AppError;
use shell::Shell;
use state::ConfigState;
use storefront::Storefront;

/// Runs the terminal storefront.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  1. Initialize Logging ── stderr, RUST_LOG or warn,storefront=info      │
/// │  2. Load ClientConfig ─── defaults → client.toml → env → validate       │
/// │     (--config must load; the default file falls back to defaults)       │
/// │     --init-config writes the result and stops here                      │
/// │  3. Build HttpTransport                                                 │
/// │  4. Storefront::new ───── wire bus, state, presenters, checkout         │
/// │  5. Load catalog ──────── a failure shows a banner, the shell still runs│
/// │  6. Run the shell on stdin/stdout                                       │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(cli: Cli) -> Result<(), AppError> {
    init_tracing(cli.verbose);

    info!("Starting storefront");

    let client_config = load_client_config(&cli)?;
    if cli.init_config {
        let path = client_config.save(cli.config)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }
    info!(api = %client_config.api_url(), "Client configured");
    let transport = Arc::new(HttpTransport::new(client_config)?);

    let storefront = Storefront::new(ConfigState::from_env(), transport)?;
    if let Err(err) = storefront.load_catalog().await {
        warn!(error = %err, "Starting without a catalog");
    }

    let stdin = BufReader::new(tokio::io::stdin());
    Shell::new(&storefront).run(stdin, tokio::io::stdout()).await
}

/// An explicit `--config` file must load cleanly. Problems with the
/// platform default file only produce a warning.
fn load_client_config(cli: &Cli) -> Result<ClientConfig, AppError> {
    match &cli.config {
        Some(path) => Ok(ClientConfig::load(Some(path.clone()))?),
        None => Ok(ClientConfig::load_or_default(None)),
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=storefront_core=trace` - Trace bus dispatch
/// - Default: WARN, INFO for storefront crates (DEBUG with `--verbose`)
///
/// Logs go to stderr so they never interleave with the screen.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,storefront=debug"
    } else {
        "warn,storefront=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use clap::Parser;

    fn temp_path() -> std::path::PathBuf {
        std::env::temp_dir()
            .join(format!("storefront-{}", uuid::Uuid::new_v4()))
            .join("client.toml")
    }

    #[tokio::test]
    async fn test_init_config_writes_file_and_exits() {
        let path = temp_path();
        let cli = Cli::parse_from(["storefront", "--init-config", "--config", path.to_str().unwrap()]);

        run(cli).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[api]"));
        assert!(ClientConfig::load(Some(path.clone())).is_ok());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_explicit_config_must_load() {
        let path = temp_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[api]\nbase_url = \"ftp://nope\"\n").unwrap();

        let cli = Cli::parse_from(["storefront", "--config", path.to_str().unwrap()]);
        let err = load_client_config(&cli).unwrap_err();
        assert_eq!(err.code, ErrorCode::Config);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
