use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use jwt_simple::prelude::HS256Key;
use tracing_subscriber::EnvFilter;

use rolegate::app::{AppState, app};
use rolegate::config::{Config, GatewayMode};
use rolegate::resolver::SqliteRoleResolver;

#[derive(Debug, Parser)]
#[command(name = "rolegate", about = "Role-based authorization gateway")]
struct Cli {
    /// Override HOST
    #[arg(long)]
    host: Option<String>,
    /// Override PORT
    #[arg(long)]
    port: Option<u16>,
    /// Run in production mode regardless of PRODUCTION
    #[arg(long)]
    production: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rolegate=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("loading configuration")?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if cli.production {
        config.gateway.mode = GatewayMode::Production;
    }

    let resolver = SqliteRoleResolver::open_read_only(&config.database_path, config.db_pool_size)
        .with_context(|| format!("opening role store at {}", config.database_path))?;
    let token_key = HS256Key::from_bytes(config.access_token_secret.as_bytes());

    tracing::info!(
        mode = ?config.gateway.mode,
        extension = ?config.gateway.extension(),
        database = %config.database_path,
        "starting rolegate"
    );

    let state = AppState::new(config.gateway.clone(), Arc::new(resolver), token_key);
    let listener = tokio::net::TcpListener::bind(config.addr())
        .await
        .with_context(|| format!("binding {}", config.addr()))?;
    tracing::info!("listening on {}", config.addr());
    axum::serve(listener, app(state)).await?;

    Ok(())
}
