//! Coinshop API server
//!
//! REST server for the coin ledger: authentication, transfers, purchases,
//! account views.
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings (sqlite://coinshop.db)
//! coinshop-server
//!
//! # Start with custom config
//! coinshop-server --config /path/to/config.toml
//!
//! # Start with environment overrides
//! COINSHOP__SERVER__PORT=3000 coinshop-server
//! ```

mod config;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use coinshop_api::{create_router, AppState};
use coinshop_auth::{AuthConfig, IdentityGate, JwtConfig};
use coinshop_db::Database;

use crate::config::ServerConfig;

/// Coinshop API server
#[derive(Parser, Debug)]
#[command(name = "coinshop-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML, JSON, or YAML)
    #[arg(short, long, env = "COINSHOP_CONFIG")]
    config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "COINSHOP_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "COINSHOP_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "COINSHOP_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log format (json, pretty)
    #[arg(long, env = "COINSHOP_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    /// SQLite connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// JWT secret key
    #[arg(long, env = "JWT_SECRET")]
    jwt_secret: Option<String>,

    /// Enable development mode (relaxed secret validation)
    #[arg(long, env = "COINSHOP_DEV_MODE")]
    dev_mode: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut server_config = ServerConfig::load(args.config.as_deref())?;

    // CLI overrides
    if let Some(host) = args.host {
        server_config.server.host = host;
    }
    if let Some(port) = args.port {
        server_config.server.port = port;
    }
    if let Some(db_url) = args.database_url {
        server_config.database.url = db_url;
    }
    if let Some(jwt_secret) = args.jwt_secret {
        server_config.auth.jwt_secret = jwt_secret;
    }
    server_config.logging.level = args.log_level;
    server_config.logging.format = args.log_format;

    init_logging(&server_config.logging)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Coinshop API server"
    );

    validate_config(&server_config, args.dev_mode)?;

    // Database
    let db = Database::connect(&server_config.database).await?;
    if server_config.database.run_migrations {
        db.migrate().await?;
    }
    db.health_check().await?;
    tracing::info!("Database ready");

    // Identity gate
    let auth_config = AuthConfig {
        jwt: JwtConfig {
            secret: server_config.auth.jwt_secret.clone(),
            issuer: server_config.auth.jwt_issuer.clone(),
            token_lifetime: Duration::from_secs(server_config.auth.token_lifetime_secs),
        },
        password: Default::default(),
    };
    let identity = IdentityGate::new(auth_config);

    // Application state and router
    let state = Arc::new(AppState::new(db, identity));
    let app = create_router(state);

    let addr = server_config.server.socket_addr()?;
    tracing::info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &config::LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            subscriber.with(fmt::layer().json().with_target(true)).init();
        }
        _ => {
            subscriber.with(fmt::layer().with_target(true)).init();
        }
    }

    Ok(())
}

/// Validate configuration
fn validate_config(config: &ServerConfig, dev_mode: bool) -> anyhow::Result<()> {
    if !dev_mode && config.auth.jwt_secret == "change-me-in-production" {
        anyhow::bail!(
            "JWT secret must be changed in production. Set JWT_SECRET environment variable."
        );
    }

    if config.auth.jwt_secret.len() < 32 {
        tracing::warn!("JWT secret is shorter than 32 bytes");
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parsing() {
        let args = Args::parse_from(["coinshop-server", "--port", "3000"]);
        assert_eq!(args.port, Some(3000));
    }

    #[test]
    fn default_secret_rejected_outside_dev_mode() {
        let config = ServerConfig::default();
        assert!(validate_config(&config, false).is_err());
        assert!(validate_config(&config, true).is_ok());
    }
}
