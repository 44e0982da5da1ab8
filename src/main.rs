//! Sentinel Chat server and terminal client.

use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use mimalloc::MiMalloc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use sentinel_chat::config::{AppConfig, Cli, Command};
use sentinel_chat::{repl, server};

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Initialize tracing (M-LOG-STRUCTURED).
///
/// The server logs to stdout at `info`; the terminal client keeps stdout for
/// the transcript and logs to stderr at `warn`. `RUST_LOG` overrides both.
fn init_tracing(command: &Command) {
    let default_filter = match command {
        Command::Serve => "info",
        Command::Chat { .. } => "warn",
    };
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(filter_layer);
    match command {
        Command::Serve => registry.with(fmt::layer().with_target(true).compact()).init(),
        Command::Chat { .. } => registry
            .with(fmt::layer().with_writer(std::io::stderr).compact())
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or_default();
    init_tracing(&command);

    let config = match AppConfig::load(&cli) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    match command {
        Command::Serve => server::start_server(config).await,
        Command::Chat { url } => repl::run(&config, url).await,
    }
}
