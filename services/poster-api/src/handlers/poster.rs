//! Poster generation endpoint.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Extension, Query},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use poster_common::{resolve_theme, GeoPoint, PosterError, PosterResult};
use renderer::PosterLabels;
use serde::Deserialize;
use tracing::{info, instrument};

use super::common::{error_response, poster_filename};
use crate::state::AppState;

/// Query parameters for `GET /api/poster`. Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct PosterParams {
    pub city: Option<String>,
    pub country: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub theme: Option<String>,
    pub distance: Option<String>,
}

/// Where the poster is centered and what it is labeled.
#[derive(Debug, Clone, PartialEq)]
pub enum PosterLocation {
    /// Explicit coordinates with display labels.
    Coordinates {
        point: GeoPoint,
        city: String,
        country: String,
    },
    /// A place to be geocoded.
    Place { city: String, country: String },
}

/// A validated poster request.
#[derive(Debug, Clone, PartialEq)]
pub struct PosterRequest {
    pub location: PosterLocation,
    pub theme: String,
    pub distance_m: f64,
}

/// Longest city or country label accepted, in characters.
pub const MAX_LABEL_CHARS: usize = 100;

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number(param: &str, value: &str) -> PosterResult<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| PosterError::InvalidParameter {
            param: param.to_string(),
            message: format!("'{}' is not a number", value),
        })
}

fn check_label<'a>(param: &str, value: Option<&'a str>) -> PosterResult<Option<&'a str>> {
    match value {
        Some(v) if v.chars().count() > MAX_LABEL_CHARS => Err(PosterError::InvalidParameter {
            param: param.to_string(),
            message: format!("longer than {} characters", MAX_LABEL_CHARS),
        }),
        other => Ok(other),
    }
}

fn out_of_range(param: &str, value: f64, limit: f64) -> PosterError {
    PosterError::InvalidParameter {
        param: param.to_string(),
        message: format!("{} is outside [-{}, {}]", value, limit, limit),
    }
}

impl PosterParams {
    /// Validate the raw query against the service defaults.
    pub fn into_request(self, default_theme: &str, default_distance_m: f64) -> PosterResult<PosterRequest> {
        let city = check_label("city", present(&self.city))?;
        let country = check_label("country", present(&self.country))?;
        let lat = present(&self.lat);
        let lon = present(&self.lon);

        let location = match (lat, lon, city, country) {
            (Some(lat), Some(lon), city, country) => {
                let lat_v = parse_number("lat", lat)?;
                let lon_v = parse_number("lon", lon)?;
                if !(-90.0..=90.0).contains(&lat_v) {
                    return Err(out_of_range("lat", lat_v, 90.0));
                }
                if !(-180.0..=180.0).contains(&lon_v) {
                    return Err(out_of_range("lon", lon_v, 180.0));
                }
                PosterLocation::Coordinates {
                    point: GeoPoint::new(lat_v, lon_v),
                    city: city
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("{}, {}", lat, lon)),
                    country: country.unwrap_or_default().to_string(),
                }
            }
            (_, _, Some(city), Some(country)) => PosterLocation::Place {
                city: city.to_string(),
                country: country.to_string(),
            },
            _ => {
                return Err(PosterError::MissingParameter(
                    "city and country, or lat and lon".to_string(),
                ))
            }
        };

        let distance_m = match present(&self.distance) {
            Some(raw) => {
                let d = parse_number("distance", raw)?;
                if d <= 0.0 {
                    return Err(PosterError::InvalidParameter {
                        param: "distance".to_string(),
                        message: "must be positive".to_string(),
                    });
                }
                d
            }
            None => default_distance_m,
        };

        Ok(PosterRequest {
            location,
            theme: present(&self.theme).unwrap_or(default_theme).to_string(),
            distance_m,
        })
    }
}

/// GET /api/poster - render a poster and return it as PNG
#[instrument(skip(state))]
pub async fn poster_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<PosterParams>,
) -> Response {
    state.metrics.record_poster_request();
    match generate(&state, params).await {
        Ok((filename, png)) => png_response(&filename, png),
        Err(err) => error_response(&err),
    }
}

async fn generate(state: &AppState, params: PosterParams) -> PosterResult<(String, Vec<u8>)> {
    let request = params.into_request(&state.config.default_theme, state.config.default_distance_m)?;
    let theme = resolve_theme(&state.themes, &request.theme)?;

    let (point, city, country) = match request.location {
        PosterLocation::Coordinates { point, city, country } => (point, city, country),
        PosterLocation::Place { city, country } => {
            let result = state.geocoder.lookup(&city, &country).await;
            state.metrics.record_geocode(result.is_ok());
            (result?, city, country)
        }
    };

    let fetch_start = Instant::now();
    let fetched = state.features.fetch_features(point, request.distance_m).await?;
    state
        .metrics
        .record_feature_fetch(fetch_start.elapsed().as_micros() as u64)
        .await;

    let labels = PosterLabels::new(city.clone(), country, point);
    let renderer = state.renderer.clone();
    let preview_size = state.preview_size;
    let render_start = Instant::now();
    let rendered = tokio::task::spawn_blocking(move || {
        let (features, bounds) = (&fetched.features, &fetched.bounds);
        match preview_size {
            Some((width, height)) => renderer.render_sized(&labels, features, bounds, &theme, width, height),
            None => renderer.render(&labels, features, bounds, &theme),
        }
    })
    .await
    .map_err(|e| PosterError::InternalError(format!("render task failed: {}", e)))
    .and_then(|result| result);

    let elapsed_us = render_start.elapsed().as_micros() as u64;
    state.metrics.record_render(elapsed_us, rendered.is_ok()).await;
    let png = rendered?;

    info!(
        city = %city,
        theme = %request.theme,
        bytes = png.len(),
        render_ms = elapsed_us / 1000,
        "Served poster"
    );
    Ok((poster_filename(&city, &request.theme, chrono::Utc::now()), png))
}

fn png_response(filename: &str, png: Vec<u8>) -> Response {
    let disposition = HeaderValue::from_bytes(format!("inline; filename=\"{}\"", filename).as_bytes())
        .unwrap_or_else(|_| HeaderValue::from_static("inline"));
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("image/png")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        png,
    )
        .into_response()
}
