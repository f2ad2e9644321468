//! # Tollgate - reCAPTCHA v3 form guard
//!
//! Serves a demo form protected by an invisible challenge and validates
//! submissions against the verification service.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tollgate::config::{AppConfig, ConfigOverrides};
use tollgate::routes;
use tollgate::state::AppState;

/// Tollgate - reCAPTCHA v3 form guard
#[derive(Parser, Debug)]
#[command(name = "tollgate")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/tollgate.toml")]
    config: String,

    /// Listen address (overrides config)
    #[arg(short, long, env = "LISTEN_ADDR")]
    listen: Option<String>,

    /// reCAPTCHA secret key (overrides config)
    #[arg(long, env = "RECAPTCHA_PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// reCAPTCHA site key (overrides config)
    #[arg(long, env = "RECAPTCHA_PUBLIC_KEY")]
    public_key: Option<String>,

    /// Minimum accepted score (overrides config)
    #[arg(long, env = "RECAPTCHA_SCORE_THRESHOLD")]
    score_threshold: Option<f64>,

    /// Verification host, for proxied deployments (overrides config)
    #[arg(long, env = "RECAPTCHA_VERIFY_HOST")]
    verify_host: Option<String>,

    /// Skip remote verification and accept every token (testing only).
    /// Any value other than 0/false/no/off/n/f enables it.
    #[arg(
        long,
        env = "RECAPTCHA_DISABLE",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    disable: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, default_value = "false")]
    json_logs: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            listen_addr: self.listen.clone(),
            private_key: self.private_key.clone(),
            public_key: self.public_key.clone(),
            score_threshold: self.score_threshold,
            verify_host: self.verify_host.clone(),
            disabled: self.disable,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level, args.json_logs)?;

    info!("Starting Tollgate v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::load(&args.config, &args.overrides())?;
    info!(
        config = %args.config,
        verify_host = %config.recaptcha.verify_host,
        score_threshold = ?config.recaptcha.score_threshold,
        "Configuration loaded"
    );

    let listen_addr = config.listen_addr.clone();
    let state = AppState::new(config).context("Failed to build reCaptcha field")?;

    // Build router
    let app = routes::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", listen_addr))?;
    info!("Tollgate listening on {}", listen_addr);

    // Handle graceful shutdown
    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Shutdown signal received");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .context("Server error")?;

    info!("Tollgate shutdown complete");
    Ok(())
}

/// Initialize structured logging with tracing
fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .init();
    }

    Ok(())
}
