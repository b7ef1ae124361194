//! Map poster API service.
//!
//! HTTP server rendering city map posters from OpenStreetMap data.

use anyhow::{Context, Result};
use clap::Parser;
use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use poster_api::{router, AppState, ServiceConfig, DEFAULT_DISTANCE_M};
use poster_common::DEFAULT_THEME_NAME;

#[derive(Parser, Debug)]
#[command(name = "poster-api")]
#[command(about = "City map poster rendering server")]
struct Args {
    /// Listen address
    #[arg(short, long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    listen: String,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Number of tokio worker threads (default: number of CPU cores)
    #[arg(long, env = "TOKIO_WORKER_THREADS")]
    worker_threads: Option<usize>,

    /// Directory holding `<name>.json` theme files
    #[arg(long, env = "THEMES_DIR", default_value = "themes")]
    themes_dir: PathBuf,

    /// Directory holding Roboto-{Light,Regular,Bold}.ttf
    #[arg(long, env = "FONTS_DIR")]
    fonts_dir: Option<PathBuf>,

    /// Theme used when a request names none
    #[arg(long, env = "DEFAULT_THEME", default_value = DEFAULT_THEME_NAME)]
    default_theme: String,

    /// Radius in meters used when a request names none
    #[arg(long, env = "DEFAULT_DISTANCE", default_value_t = DEFAULT_DISTANCE_M)]
    default_distance: f64,

    /// Nominatim base URL
    #[arg(long, env = "NOMINATIM_URL", default_value = "https://nominatim.openstreetmap.org")]
    nominatim_url: String,

    /// Overpass interpreter URL
    #[arg(long, env = "OVERPASS_URL", default_value = "https://overpass-api.de/api/interpreter")]
    overpass_url: String,

    /// User-Agent sent to upstream services
    #[arg(long, env = "USER_AGENT", default_value = "MapPosterGenerator/1.0")]
    user_agent: String,

    /// Upstream request timeout in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 90)]
    timeout_secs: u64,
}

impl Args {
    fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            themes_dir: self.themes_dir.clone(),
            fonts_dir: self.fonts_dir.clone(),
            default_theme: self.default_theme.clone(),
            default_distance_m: self.default_distance,
            nominatim_url: self.nominatim_url.clone(),
            overpass_url: self.overpass_url.clone(),
            user_agent: self.user_agent.clone(),
            upstream_timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(args))?;
    Ok(())
}

async fn async_main(args: Args) -> Result<()> {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    if args.default_distance <= 0.0 || !args.default_distance.is_finite() {
        anyhow::bail!("default distance must be a positive number of meters");
    }

    info!(worker_threads = ?args.worker_threads, "Starting map poster API server");

    let state = Arc::new(AppState::new(args.service_config(), Some(prometheus_handle))?);
    let app = router(state);

    let addr: SocketAddr = args.listen.parse().context("Invalid listen address")?;
    info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
