//! Utility billing service: CLI server
//!
//! Headless REST billing service suitable for deployment as a systemd
//! service, Docker container, or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/utility-billing/config.toml)
//! billing-service
//!
//! # Custom config path
//! billing-service --config /etc/utility-billing/config.toml
//!
//! # Override the API port
//! billing-service --api-port 8080
//!
//! # Validate config without starting
//! billing-service --check
//!
//! # Write a default config file and exit
//! billing-service --init-config
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use utility_billing::config::{AppConfig, CONFIG_ENV_VAR};
use utility_billing::server::{init_tracing, ServerHandle, ServerOptions};

/// Tiered and cumulative consumption billing for utility meters.
#[derive(Parser, Debug)]
#[command(
    name = "billing-service",
    version,
    about = "Utility consumption billing service",
    long_about = "REST API server computing tiered and cumulative consumption \
                  charges for electricity, water and gas meters.\n\n\
                  Default config: ~/.config/utility-billing/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Write the default configuration to the config path and exit.
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .unwrap_or_else(utility_billing::default_config_path);

    if cli.init_config {
        AppConfig::default().save(&config_path)?;
        println!("Default configuration written to {}", config_path.display());
        return Ok(());
    }

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Init tracing first so subsequent logs are formatted properly
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            // Fallback tracing init
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
            AppConfig::default()
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.api_port {
        info!("CLI override: api_port = {}", port);
        config.server.api_port = port;
    }
    if let Some(ref level) = cli.log_level {
        info!("CLI override: log_level = {}", level);
        config.logging.level = level.clone();
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file   : {}", config_path.display());
        println!("   API address   : {}", config.server.address());
        println!("   Database      : {}", config.database.connection_url());
        println!("   Log level     : {}", config.logging.level);
        println!("   Default rate  : {}", config.billing.default_rate);
        println!("   High usage at : {}", config.billing.high_consumption_threshold);
        println!("   Avg. window   : {}", config.billing.default_average_window);
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("Press Ctrl+C to shutdown gracefully.");

    handle.wait().await;

    Ok(())
}
