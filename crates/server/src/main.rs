use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use waveforge_core::{
    load_config, validate_config, JobRegistry, MediaOperations, SystemInvoker, ToolInvoker,
    WorkspaceManager,
};

use waveforge_server::api::create_router;
use waveforge_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("WAVEFORGE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration; a missing file means defaults everywhere.
    let config = if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        info!("No config file at {:?}, using defaults", config_path);
        waveforge_core::Config::default()
    };

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Workspace root: {:?}", config.workspace.root);
    info!("Outputs dir: {:?}", config.workspace.outputs_dir);

    // Build the shared services
    let invoker: Arc<dyn ToolInvoker> = match config.media.tool_timeout() {
        Some(timeout) => Arc::new(SystemInvoker::with_timeout(timeout)),
        None => Arc::new(SystemInvoker::new()),
    };
    let workspace = Arc::new(WorkspaceManager::new(config.workspace.clone()));
    let media = Arc::new(MediaOperations::new(
        Arc::clone(&invoker),
        Arc::clone(&workspace),
        config.media.clone(),
    ));
    let registry = Arc::new(JobRegistry::new(
        Arc::clone(&invoker),
        Arc::clone(&workspace),
        config.media.clone(),
        config.jobs.clone(),
    ));

    // Warn (but keep serving) when a tool is missing; the health endpoint
    // reports the same probe.
    let tools = media.validate_tools().await;
    if !tools.all_available() {
        warn!(
            ffmpeg = tools.ffmpeg,
            ffprobe = tools.ffprobe,
            ytdlp = tools.ytdlp,
            "some external tools are unavailable"
        );
    }

    // Start the retention sweep for unretrieved job results
    registry.start_retention_sweep();
    info!("Retention sweep started");

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::clone(&registry),
        media,
        workspace,
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    registry.shutdown();

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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
