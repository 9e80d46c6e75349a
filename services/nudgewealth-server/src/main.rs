//! NudgeWealth Server
//!
//! ```bash
//! # File-backed store under ./data, demo data seeded on first start
//! nudgewealth-server
//!
//! # Throwaway in-memory store on another port
//! nudgewealth-server --memory --port 9090
//!
//! # Advisor through a local Ollama
//! NUDGEWEALTH_LLM_PROVIDER=ollama nudgewealth-server
//!
//! # Environment overrides of config keys
//! NUDGEWEALTH__ENGINE__NUDGE_THRESHOLD_PERCENT=75 nudgewealth-server
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use nudgewealth_advisor::{LlmAdvisor, LlmRouter, ProviderKind};
use nudgewealth_engine::TransactionEngine;
use nudgewealth_server::config::{LoggingConfig, StorageBackend, StorageSettings};
use nudgewealth_server::{create_router, AppState, ServerConfig};
use nudgewealth_store::{seed_if_empty, FileStore, MemoryStore, RecordStore};
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// NudgeWealth Server - spending control API
#[derive(Parser, Debug)]
#[command(name = "nudgewealth-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML, JSON, or YAML)
    #[arg(short, long, env = "NUDGEWEALTH_CONFIG")]
    config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "NUDGEWEALTH_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "NUDGEWEALTH_PORT")]
    port: Option<u16>,

    /// Directory of the JSON collections
    #[arg(long, env = "NUDGEWEALTH_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Keep records in memory only
    #[arg(long)]
    memory: bool,

    /// Do not write demo data into empty collections
    #[arg(long)]
    no_seed: bool,

    /// Never call an LLM; messages come from templates
    #[arg(long, env = "NUDGEWEALTH_OFFLINE")]
    offline: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut server_config = ServerConfig::load(args.config.as_deref())?;

    if let Some(host) = args.host {
        server_config.server.host = host;
    }
    if let Some(port) = args.port {
        server_config.server.port = port;
    }
    if let Some(data_dir) = args.data_dir {
        server_config.storage.data_dir = data_dir;
    }
    if args.memory {
        server_config.storage.backend = StorageBackend::Memory;
    }
    if args.no_seed {
        server_config.storage.seed_on_start = false;
    }

    init_logging(&server_config.logging)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting NudgeWealth Server"
    );

    let store = open_store(&server_config.storage).await?;

    let mut engine = TransactionEngine::new(Arc::clone(&store), server_config.engine.clone());

    if server_config.storage.seed_on_start {
        let report = seed_if_empty(store.as_ref())
            .await
            .context("failed to seed demo data")?;
        if report.any() {
            tracing::info!(?report, "Seeded demo data");
        }
    }
    let rewritten = engine.reconcile_rules().await?;
    if rewritten > 0 {
        tracing::info!(rewritten, "Reconciled cached rule totals");
    }

    if args.offline {
        tracing::info!("Offline mode, advisor disabled");
    } else {
        let router = LlmRouter::from_env();
        if router.kind() == ProviderKind::Deterministic {
            tracing::info!("No LLM provider configured, using message templates");
        } else {
            tracing::info!(provider = ?router.kind(), "Advisor enabled");
            engine = engine.with_advisor(Arc::new(LlmAdvisor::new(router)));
        }
    }

    let state = AppState::new(engine);
    let app = create_router(state, &server_config.api);

    let addr = server_config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => subscriber
            .with(fmt::layer().json().with_target(true))
            .try_init()?,
        _ => subscriber
            .with(fmt::layer().pretty().with_target(true))
            .try_init()?,
    }

    Ok(())
}

async fn open_store(settings: &StorageSettings) -> anyhow::Result<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match settings.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => {
            let store = FileStore::open(settings.data_dir.clone())
                .await
                .with_context(|| format!("failed to open {}", settings.data_dir.display()))?;
            Arc::new(store)
        }
    };
    tracing::info!(backend = store.name(), "Store ready");
    Ok(store)
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
