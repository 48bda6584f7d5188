//! docchat: DocChat Main Binary
//!
//! Interactive client for chatting with an uploaded PDF.
//!
//! Usage:
//!   docchat              - Start the REPL against the configured backend
//!   docchat --mock       - Start the REPL against the in-process mock backend
//!   docchat --help       - Show help

mod cli;

use std::sync::Arc;
use std::time::Duration;

use docchat_core::{BackendGateway, Config, HttpGateway, MockGateway, SessionController};
use tracing_subscriber::EnvFilter;

/// Run mode
enum RunMode {
    /// Interactive REPL
    Repl { mock: bool },
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mode = parse_args();

    match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("docchat {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    let RunMode::Repl { mock } = mode else {
        unreachable!()
    };

    let gateway: Arc<dyn BackendGateway> = if mock || config.gateway.mock {
        tracing::info!("Using mock backend");
        Arc::new(MockGateway::with_delay(Duration::from_millis(500)))
    } else {
        tracing::info!("Using backend at {}", config.gateway.base_url);
        let gateway = HttpGateway::new(&config)
            .map_err(|e| anyhow::anyhow!("Failed to create gateway: {}", e))?;
        Arc::new(gateway)
    };

    let controller = SessionController::new(gateway);
    cli::run_repl(controller).await
}

/// Parse command line arguments
fn parse_args() -> RunMode {
    let mut mock = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--mock" | "-m" => mock = true,
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    RunMode::Repl { mock }
}

/// Print help message
fn print_help() {
    println!("docchat - chat with your PDF");
    println!();
    println!("Usage:");
    println!("  docchat              Start the REPL against the configured backend");
    println!("  docchat --mock       Use the in-process mock backend");
    println!("  docchat --help       Show this help");
    println!("  docchat --version    Show version");
    println!();
    println!("Configuration:");
    println!("  docchat.toml in the working directory, or environment variables");
    println!("  DOCCHAT_BASE_URL, DOCCHAT_TIMEOUT_SECS, DOCCHAT_MOCK.");
    println!("  A .env file is loaded if present.");
}
