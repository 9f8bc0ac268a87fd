//! Feedback service - CLI server
//!
//! ```sh
//! # Run with default config (~/.config/feedback-service/config.toml)
//! feedback-service
//!
//! # Custom config path and port
//! feedback-service --config /etc/feedback-service/config.toml --port 8081
//!
//! # Validate config without starting
//! feedback-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use feedback_service::config::AppConfig;
use feedback_service::server::{init_tracing, ServerHandle, ServerOptions};

/// Role-aware feedback collection service.
#[derive(Parser, Debug)]
#[command(
    name = "feedback-service",
    version,
    about = "REST API for collecting student and staff feedback",
    long_about = "Feedback service: department and question catalogue, rating \
                  submission and statistics behind a JWT-secured REST API.\n\n\
                  Default config: ~/.config/feedback-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "FEEDBACK_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen host.
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the database URL.
    #[arg(long)]
    database_url: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the bootstrap executive director.
    #[arg(long)]
    no_admin: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(feedback_service::default_config_path);

    let loaded = AppConfig::load(&config_path);
    let mut config = loaded.as_ref().cloned().unwrap_or_default();
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    // Tracing first so every later line is formatted
    init_tracing(&config);
    match &loaded {
        Ok(_) => info!("Configuration loaded from {}", config_path.display()),
        Err(e) => {
            error!("Failed to load config: {}", e);
            error!("Using default configuration.");
        }
    }

    // ── CLI overrides ──────────────────────────────────────────
    if let Some(host) = cli.host {
        info!("CLI override: host = {}", host);
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }
    if let Some(url) = cli.database_url {
        info!("CLI override: database url = {}", url);
        config.database.url = url;
    }

    if cli.check {
        if let Err(e) = loaded {
            return Err(e.into());
        }
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}", config.server.address());
        println!("   Database    : {}", config.database.url);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        bootstrap_admin: !cli.no_admin,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
