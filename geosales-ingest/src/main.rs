//! geosales-ingest - sales dataset ingestion service
//!
//! Accepts spreadsheet uploads of regional sales figures, geocodes each
//! locality, keeps the dataset in memory and serves it with market
//! analytics to the dashboard.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};

use geosales_common::config::{load_toml_config, ConfigResolver};
use geosales_common::logging::init_tracing;
use geosales_ingest::config::{resolve_geocode_api_key, IngestToml, DEFAULT_BIND, MODULE_NAME};
use geosales_ingest::services::{DisabledGeocoder, GeocodeProvider, GoogleGeocoder, IngestPipeline};
use geosales_ingest::store::RecordStore;
use geosales_ingest::{build_router, AppState};

/// Command-line arguments for geosales-ingest
#[derive(Parser, Debug)]
#[command(name = "geosales-ingest")]
#[command(about = "Sales ingestion and geocoding service")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long, env = "GEOSALES_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, overrides the config file
    #[arg(short, long, env = "GEOSALES_BIND")]
    bind: Option<String>,

    /// Log level, overrides the config file (RUST_LOG still wins)
    #[arg(long, env = "GEOSALES_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let dotenv = dotenvy::dotenv().ok();

    let args = Args::parse();

    let config_path = ConfigResolver::new(MODULE_NAME).resolve(args.config.as_deref());
    let mut config: IngestToml = load_toml_config(config_path.as_deref())
        .context("Failed to load configuration")?;
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    init_tracing(&config.logging).context("Failed to initialize logging")?;

    info!(
        "Starting geosales-ingest v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    if let Some(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }
    match &config_path {
        Some(path) => info!("Config: {}", path.display()),
        None => info!("Config: none found, using defaults"),
    }

    let store = RecordStore::new();
    let api_key = resolve_geocode_api_key(&config.geocode);

    let google = match &api_key {
        Some(key) => Some(Arc::new(
            GoogleGeocoder::new(key.clone(), &config.geocode)
                .context("Failed to build geocoding client")?,
        )),
        None => None,
    };
    let provider: Arc<dyn GeocodeProvider> = match &google {
        Some(geocoder) => geocoder.clone() as Arc<dyn GeocodeProvider>,
        None => Arc::new(DisabledGeocoder),
    };

    let pipeline = IngestPipeline::from_settings(
        store,
        provider,
        &config.pipeline,
        Duration::from_millis(config.geocode.timeout_ms),
    );
    info!(
        concurrency = config.pipeline.concurrency,
        batch_size = config.pipeline.batch_size,
        "Ingest pipeline ready"
    );

    let mut state =
        AppState::new(pipeline).with_max_upload_bytes(config.pipeline.max_upload_bytes);
    if let (Some(geocoder), Some(key)) = (google, api_key) {
        state = state.with_geocoder(geocoder, key);
    }

    let app = build_router(state);

    let bind = args
        .bind
        .or(config.bind)
        .unwrap_or_else(|| DEFAULT_BIND.to_string());
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind to {}", bind))?;
    info!("Listening on http://{}", bind);
    info!("Health check: http://{}/health", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
