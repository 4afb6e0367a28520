//! Dropbox document gateway
//!
//! Provides:
//! - OAuth code exchange with Dropbox
//! - Folder listings with extension filtering
//! - Document registration (download + fingerprint)
//! - Certificate save, multipart upload and PDF signing back to Dropbox

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docs_gateway::config::Config;
use docs_gateway::routes::DROPBOX_PREFIX;
use docs_gateway::AppState;

#[derive(Parser, Debug)]
#[command(name = "docs-gateway")]
#[command(about = "HTTP gateway between the document backend and Dropbox")]
struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = 3002, env = "GATEWAY_PORT")]
    port: u16,

    /// Address to bind to
    #[arg(long, default_value = "0.0.0.0", env = "GATEWAY_BIND")]
    bind: String,

    /// Path to config directory
    #[arg(long, default_value = "/config", env = "GATEWAY_CONFIG_PATH")]
    config_path: String,

    /// Dropbox app key (overrides config.json)
    #[arg(long, env = "DROPBOX_CLIENT_ID")]
    client_id: Option<String>,

    /// Dropbox app secret (overrides config.json)
    #[arg(long, env = "DROPBOX_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docs_gateway=info,dropbox=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config_path)?.with_credentials(cli.client_id, cli.client_secret);
    let state = Arc::new(AppState::new(config)?);

    tracing::info!(
        "Dropbox routes mounted at {} (token header: {})",
        DROPBOX_PREFIX,
        state.token_gate.name()
    );

    let app = docs_gateway::router(state);

    // Parse bind address
    let addr: SocketAddr = format!("{}:{}", cli.bind, cli.port).parse()?;

    tracing::info!("Starting docs-gateway on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gateway shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
