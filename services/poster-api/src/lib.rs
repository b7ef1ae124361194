//! Map poster HTTP service.
//!
//! Geocodes a place, fetches its roads, water and parks, and renders a
//! themed poster PNG.

pub mod geocoder;
pub mod handlers;
pub mod metrics;
pub mod overpass;
pub mod state;

use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub use geocoder::{Geocoder, NominatimGeocoder};
pub use overpass::{FeatureProvider, FetchedFeatures, OverpassClient};
pub use state::{AppState, ServiceConfig, DEFAULT_DISTANCE_M};

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/poster", get(handlers::poster_handler))
        .route("/api/themes", get(handlers::themes_handler))
        // Health check
        .route("/health", get(handlers::health_handler))
        // Metrics
        .route("/metrics", get(handlers::metrics_handler))
        .route("/api/metrics", get(handlers::api_metrics_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
