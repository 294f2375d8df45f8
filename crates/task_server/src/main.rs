use std::path::PathBuf;
use std::sync::Arc;

use axum::http::header::HeaderName;
use clap::Parser;
use task_core::TaskRepository;
use task_core::config::{ConfigOverrides, load_config_with_fallback, merge_overrides};
use task_core::storage::{DocumentStore, JsonFileStore, MemoryStore, json_store};
use task_server::identity::{DEFAULT_IDENTITY_HEADER, HeaderIdentity};
use task_server::{AppState, build_router};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Task tracking HTTP API", long_about = None)]
struct Cli {
    /// Listen address (defaults to the configured value or 127.0.0.1:5000)
    #[arg(long)]
    listen: Option<String>,

    /// Path of the JSON task store
    #[arg(long, value_name = "PATH", conflicts_with = "memory")]
    store: Option<PathBuf>,

    /// Keep tasks in memory only
    #[arg(long)]
    memory: bool,

    /// Header carrying the authenticated user id
    #[arg(long, default_value = DEFAULT_IDENTITY_HEADER)]
    identity_header: String,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE")]
    config_override: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "task_server=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let loaded = load_config_with_fallback();
    if let Some(err) = loaded.error {
        warn!("ignoring configuration file: {err}");
    }
    let overrides = ConfigOverrides::parse_all(&cli.config_override)?;
    let config = merge_overrides(&loaded.config.with_env(), &overrides);

    let store: Arc<dyn DocumentStore> = if cli.memory {
        info!("using in-memory task store");
        Arc::new(MemoryStore::new())
    } else {
        let path = match cli.store.or_else(|| config.store_path.clone().map(PathBuf::from)) {
            Some(path) => path,
            None => json_store::store_path()?,
        };
        info!("using task store at {}", path.display());
        Arc::new(JsonFileStore::open(path)?)
    };

    let identity_header = HeaderName::try_from(cli.identity_header.as_str())?;
    let state = AppState::new(
        TaskRepository::new(store),
        Arc::new(HeaderIdentity::new(identity_header)),
    );

    let listen = cli
        .listen
        .unwrap_or_else(|| config.listen_addr().to_string());
    let listener = tokio::net::TcpListener::bind(&listen).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
    }
}
