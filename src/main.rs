//! # Main Entry Point
//!
//! Initializes the application:
//! - Domain: Configuration and Types
//! - Infrastructure: Telegram transport
//! - Application: Registry, Router, Retry, Polling loop
//! - Interface: Command Handlers

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::sync::Arc;

use crate::application::poller::{PollingLoop, stop_channel};
use crate::application::retry::{RetryExecutor, RetryPolicy};
use crate::application::router::CommandRouter;
use crate::domain::config::AppConfig;
use crate::domain::traits::Transport;
use crate::infrastructure::telegram::TelegramTransport;

#[derive(Parser)]
#[command(name = "courier", about = "Telegram command bot with retry-wrapped dispatch")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "data/config.yaml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load Configuration
    let config_content = fs::read_to_string(&args.config)
        .with_context(|| format!("Failed to read {}", args.config))?;
    let config = AppConfig::from_yaml(&config_content)?;

    // 2. Logging Setup
    if !std::path::Path::new(&config.logging.dir).exists() {
        fs::create_dir_all(&config.logging.dir).context("Failed to create log directory")?;
    }

    let file_appender = tracing_appender::rolling::never(&config.logging.dir, &config.logging.file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,hyper=warn,reqwest=warn"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);
    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::info!("Starting Courier...");

    // 3. Initialize Infrastructure
    let token = config.telegram_token()?;
    let transport: Arc<dyn Transport> = Arc::new(TelegramTransport::new(
        &token,
        config.services.telegram.poll_timeout_secs,
    )?);

    // 4. Initialize Application Components
    let registry = interface::commands::default_registry();
    tracing::info!("Registered {} command(s)", registry.len());

    let retry = RetryExecutor::new(RetryPolicy::new(
        config.retry.max_attempts,
        config.retry.delay(),
    ));
    let router = CommandRouter::new(registry, retry, transport.clone());

    let (stop_tx, stop_rx) = stop_channel();
    let mut polling_loop = PollingLoop::new(
        transport,
        router,
        retry,
        config.system.on_command_failure,
        stop_rx,
    );

    // 5. Shutdown Signal
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C received, requesting stop");
            let _ = stop_tx.send(true);
        }
    });

    // 6. Run
    if let Err(e) = polling_loop.run().await {
        tracing::error!("Bot stopped due to error: {:#}", e);
        // process::exit would skip _guard's drop and lose the buffered line;
        // returning the error still exits nonzero.
        return Err(e);
    }

    tracing::info!("Bot stopped");
    Ok(())
}
