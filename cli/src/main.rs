//! ParkWatch Pass CLI server
//!
//! ```sh
//! # Run with default config (~/.config/parkwatch-pass/config.toml)
//! parkwatch-pass
//!
//! # Custom config path
//! parkwatch-pass --config /etc/parkwatch-pass/config.toml
//!
//! # Override port
//! parkwatch-pass --port 3000
//!
//! # Validate config without starting
//! parkwatch-pass --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use parkwatch::config::{AppConfig, CONFIG_ENV_VAR};
use parkwatch::server::{init_tracing, ServerHandle, ServerOptions};

/// ParkWatch Pass parking booking server.
#[derive(Parser, Debug)]
#[command(
    name = "parkwatch-pass",
    version,
    about = "Parking booking demo server: spots, payments and QR passes",
    long_about = "ParkWatch Pass REST API server.\n\n\
                  Default config: ~/.config/parkwatch-pass/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────
    let config_path = cli.config.unwrap_or_else(parkwatch::default_config_path);

    let (mut config, load_error) = if config_path.exists() {
        match AppConfig::load(&config_path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (AppConfig::default(), Some(e)),
        }
    } else {
        (AppConfig::default(), None)
    };

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_tracing(&config);
    match load_error {
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            if cli.check {
                return Err(e.into());
            }
            error!("Using default configuration.");
        }
        None if config_path.exists() => {
            info!("Configuration loaded from {}", config_path.display())
        }
        None => info!(
            "No config at {}, using defaults",
            config_path.display()
        ),
    }
    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
    }
    if let Some(ref level) = cli.log_level {
        info!("CLI override: log_level = {}", level);
    }

    // ── Config validation mode ─────────────────────────────
    if cli.check {
        config.validate()?;
        println!("✅ Configuration is valid");
        println!("   Config file   : {}", config_path.display());
        println!("   API address   : {}", config.address());
        println!("   Payment delay : {} ms", config.booking.payment_delay_ms);
        println!(
            "   Scanner       : {} ms, p(success) = {}",
            config.scanner.delay_ms, config.scanner.success_probability
        );
        println!(
            "   Chatbot       : {}",
            if config.chatbot_api_key().is_some() {
                config.chatbot.model.as_str()
            } else {
                "disabled (no API key)"
            }
        );
        println!("   Log level     : {}", config.logging.level);
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions { config }).await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().notified().await;
    handle.wait().await;

    Ok(())
}
