//! Application state and shared resources.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use poster_common::{ThemeDirectory, DEFAULT_THEME_NAME};
use renderer::{PosterRenderer, Typography};
use tracing::info;

use crate::geocoder::{Geocoder, NominatimGeocoder};
use crate::metrics::MetricsCollector;
use crate::overpass::{FeatureProvider, OverpassClient};

/// Default poster radius in meters.
pub const DEFAULT_DISTANCE_M: f64 = 29_000.0;

/// Runtime settings for the poster service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub themes_dir: PathBuf,
    pub fonts_dir: Option<PathBuf>,
    pub default_theme: String,
    pub default_distance_m: f64,
    pub nominatim_url: String,
    pub overpass_url: String,
    pub user_agent: String,
    pub upstream_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            themes_dir: PathBuf::from("themes"),
            fonts_dir: None,
            default_theme: DEFAULT_THEME_NAME.to_string(),
            default_distance_m: DEFAULT_DISTANCE_M,
            nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
            overpass_url: "https://overpass-api.de/api/interpreter".to_string(),
            user_agent: "MapPosterGenerator/1.0".to_string(),
            upstream_timeout: Duration::from_secs(90),
        }
    }
}

/// Shared application state.
pub struct AppState {
    pub geocoder: Arc<dyn Geocoder>,
    pub features: Arc<dyn FeatureProvider>,
    pub themes: ThemeDirectory,
    pub renderer: PosterRenderer,
    pub metrics: Arc<MetricsCollector>,
    pub config: ServiceConfig,
    pub prometheus: Option<PrometheusHandle>,
    /// Canvas size override for in-process tests.
    pub(crate) preview_size: Option<(u32, u32)>,
}

impl AppState {
    /// Build state with the Nominatim and Overpass clients and fonts loaded
    /// from the configured directory.
    pub fn new(config: ServiceConfig, prometheus: Option<PrometheusHandle>) -> Result<Self> {
        let geocoder = NominatimGeocoder::new(
            &config.nominatim_url,
            &config.user_agent,
            config.upstream_timeout,
        )?;
        let features = OverpassClient::new(
            &config.overpass_url,
            &config.user_agent,
            config.upstream_timeout,
        )?;
        let typography = Typography::load(config.fonts_dir.as_deref());
        info!(
            themes_dir = %config.themes_dir.display(),
            fonts = typography.has_fonts(),
            "Initialized poster service state"
        );

        Ok(Self::with_providers(
            config,
            Arc::new(geocoder),
            Arc::new(features),
            Arc::new(typography),
            prometheus,
        ))
    }

    /// Build state around explicit providers.
    pub fn with_providers(
        config: ServiceConfig,
        geocoder: Arc<dyn Geocoder>,
        features: Arc<dyn FeatureProvider>,
        typography: Arc<Typography>,
        prometheus: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            geocoder,
            features,
            themes: ThemeDirectory::new(config.themes_dir.clone()),
            renderer: PosterRenderer::new(typography),
            metrics: Arc::new(MetricsCollector::new()),
            config,
            prometheus,
            preview_size: None,
        }
    }

    /// Render posters on a small canvas instead of the full poster size.
    #[doc(hidden)]
    pub fn with_preview_size(mut self, width: u32, height: u32) -> Self {
        self.preview_size = Some((width, height));
        self
    }
}
