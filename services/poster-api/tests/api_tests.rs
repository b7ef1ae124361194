//! End-to-end tests of the HTTP routes with in-process providers.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use poster_api::{router, AppState, FeatureProvider, FetchedFeatures, Geocoder, ServiceConfig};
use poster_common::{BoundingBox, GeoPoint, PosterError, PosterResult};
use renderer::Typography;
use tempfile::TempDir;
use poster_api::handlers::theme_summaries;
use poster_common::{ThemeDirectory, ThemeSource, DEFAULT_THEME_NAME};
use test_utils::{coords, generators::sample_city, temp_themes_dir, themes, themes_dir};
use tower::ServiceExt;

struct FixedGeocoder {
    point: Option<GeoPoint>,
    queries: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn lookup(&self, city: &str, country: &str) -> PosterResult<GeoPoint> {
        self.queries
            .lock()
            .unwrap()
            .push((city.to_string(), country.to_string()));
        self.point
            .ok_or_else(|| PosterError::GeocodeNotFound(format!("{}, {}", city, country)))
    }
}

struct SampleFeatures {
    fail: bool,
    calls: Mutex<Vec<(GeoPoint, f64)>>,
}

#[async_trait]
impl FeatureProvider for SampleFeatures {
    async fn fetch_features(&self, center: GeoPoint, radius_m: f64) -> PosterResult<FetchedFeatures> {
        self.calls.lock().unwrap().push((center, radius_m));
        if self.fail {
            return Err(PosterError::FeatureFetch("roads query returned 504".to_string()));
        }
        let bounds = BoundingBox::around(center.lat, center.lon, radius_m);
        Ok(FetchedFeatures {
            features: sample_city(&bounds),
            bounds,
        })
    }
}

struct Harness {
    app: Router,
    state: Arc<AppState>,
    geocoder: Arc<FixedGeocoder>,
    features: Arc<SampleFeatures>,
    _themes: TempDir,
}

fn harness(point: Option<GeoPoint>, fail_fetch: bool) -> Harness {
    let themes_dir = temp_themes_dir(&[("noir", themes::NOIR), ("broken", themes::MISSING_FIELD)]);
    let config = ServiceConfig {
        themes_dir: themes_dir.path().to_path_buf(),
        ..ServiceConfig::default()
    };
    let geocoder = Arc::new(FixedGeocoder {
        point,
        queries: Mutex::new(Vec::new()),
    });
    let features = Arc::new(SampleFeatures {
        fail: fail_fetch,
        calls: Mutex::new(Vec::new()),
    });
    let state = Arc::new(
        AppState::with_providers(
            config,
            geocoder.clone(),
            features.clone(),
            Arc::new(Typography::none()),
            None,
        )
        .with_preview_size(240, 320),
    );
    Harness {
        app: router(state.clone()),
        state,
        geocoder,
        features,
        _themes: themes_dir,
    }
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(resp: Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn header_str<'a>(resp: &'a Response, name: header::HeaderName) -> &'a str {
    resp.headers().get(name).unwrap().to_str().unwrap()
}

#[tokio::test]
async fn test_health() {
    let h = harness(None, false);
    let resp = get(&h.app, "/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_missing_location_is_bad_request() {
    let h = harness(None, false);
    for uri in ["/api/poster", "/api/poster?city=Paris", "/api/poster?lat=48.85"] {
        let resp = get(&h.app, uri).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let body = json_body(resp).await;
        assert!(body["error"].as_str().unwrap().contains("Missing required parameter"));
    }
    assert!(h.features.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_place_is_not_found() {
    let h = harness(None, false);
    let resp = get(&h.app, "/api/poster?city=Atlantis&country=Nowhere").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("Atlantis"));

    let snapshot = h.state.metrics.snapshot().await;
    assert_eq!(snapshot.geocode_requests, 1);
    assert_eq!(snapshot.geocode_failures, 1);
    assert!(h.features.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_poster_from_coordinates() {
    let h = harness(None, false);
    let resp = get(&h.app, "/api/poster?lat=40.7128&lon=-74.0060&theme=noir").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header_str(&resp, header::CONTENT_TYPE), "image/png");
    let disposition = header_str(&resp, header::CONTENT_DISPOSITION).to_string();
    assert!(
        disposition.starts_with("inline; filename=\"40.7128,_-74.0060_noir_"),
        "{}",
        disposition
    );
    assert!(disposition.ends_with(".png\""));

    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let img = image::load_from_memory(&bytes).unwrap();
    assert_eq!((img.width(), img.height()), (240, 320));

    // Geocoder is bypassed and the default radius applies
    assert!(h.geocoder.queries.lock().unwrap().is_empty());
    let calls = h.features.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, GeoPoint::new(40.7128, -74.006));
    assert_eq!(calls[0].1, 29_000.0);
    drop(calls);

    let snapshot = h.state.metrics.snapshot().await;
    assert_eq!(snapshot.posters_rendered, 1);
    assert_eq!(snapshot.render.count, 1);
    assert_eq!(snapshot.feature_fetch.count, 1);
}

#[tokio::test]
async fn test_poster_from_place_uses_geocoder() {
    let h = harness(Some(coords::PARIS), false);
    let resp = get(&h.app, "/api/poster?city=Paris&country=France&distance=8000").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(header_str(&resp, header::CONTENT_DISPOSITION).starts_with("inline; filename=\"paris_feature_based_"));

    assert_eq!(
        h.geocoder.queries.lock().unwrap().as_slice(),
        &[("Paris".to_string(), "France".to_string())]
    );
    let calls = h.features.calls.lock().unwrap();
    assert_eq!(calls[0], (coords::PARIS, 8000.0));
}

#[tokio::test]
async fn test_unknown_theme_renders_with_fallback() {
    let h = harness(None, false);
    let resp = get(&h.app, "/api/poster?lat=1&lon=2&theme=does_not_exist").await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_theme_errors() {
    let h = harness(None, false);

    let resp = get(&h.app, "/api/poster?lat=1&lon=2&theme=..%2Fsecrets").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = get(&h.app, "/api/poster?lat=1&lon=2&theme=broken").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("broken"));
    assert!(h.features.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_parameters() {
    let h = harness(None, false);
    for uri in [
        "/api/poster?lat=north&lon=2",
        "/api/poster?lat=95&lon=2",
        "/api/poster?lat=1&lon=2&distance=-5",
    ] {
        let resp = get(&h.app, uri).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
    }
}

#[tokio::test]
async fn test_overlong_city_is_rejected_before_fetch() {
    let h = harness(Some(coords::PARIS), false);
    let uri = format!("/api/poster?city={}&country=France", "W".repeat(20_000));
    let resp = get(&h.app, &uri).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("city"));
    assert!(h.geocoder.queries.lock().unwrap().is_empty());
    assert!(h.features.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_feature_fetch_failure_is_bad_gateway() {
    let h = harness(None, true);
    let resp = get(&h.app, "/api/poster?lat=1&lon=2").await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("504"));
    assert_eq!(h.state.metrics.snapshot().await.posters_rendered, 0);
}

#[tokio::test]
async fn test_themes_listing_skips_malformed() {
    let h = harness(None, false);
    let resp = get(&h.app, "/api/themes").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["default"], "feature_based");
    let themes = body["themes"].as_array().unwrap();
    assert_eq!(themes.len(), 1);
    assert_eq!(themes[0]["id"], "noir");
    assert_eq!(themes[0]["name"], "Noir");
}

#[tokio::test]
async fn test_metrics_endpoints() {
    let h = harness(None, false);
    let resp = get(&h.app, "/metrics").await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    get(&h.app, "/api/poster").await;
    let resp = get(&h.app, "/api/metrics").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["poster_requests"], 1);
    assert_eq!(body["posters_rendered"], 0);
}

#[test]
fn test_bundled_themes_are_valid() {
    let store = ThemeDirectory::new(themes_dir());
    let names = store.available_themes().unwrap();
    assert!(names.contains(&DEFAULT_THEME_NAME.to_string()));
    for name in &names {
        assert!(store.load(name).unwrap().is_some(), "{}", name);
    }
    assert_eq!(theme_summaries(&store).unwrap().len(), names.len());
}
