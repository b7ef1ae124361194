//! Shared handler utilities: error responses and download file names.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use poster_common::PosterError;
use serde_json::json;
use tracing::{error, warn};

/// JSON error body `{"error": message}` with the error's status code.
pub fn error_response(err: &PosterError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(code = err.error_code(), error = %err, "Request failed");
    } else {
        warn!(code = err.error_code(), error = %err, "Request rejected");
    }
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

/// Download name `{city}_{theme}_{YYYY-MM-DD_HH-MM-SS}.png`.
///
/// The city is lowercased with each whitespace run replaced by `_`.
pub fn poster_filename(city: &str, theme: &str, at: DateTime<Utc>) -> String {
    format!(
        "{}_{}_{}.png",
        filename_part(&city.to_lowercase()),
        filename_part(theme),
        at.format("%Y-%m-%d_%H-%M-%S")
    )
}

fn filename_part(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_space = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        // Keep the Content-Disposition value well formed
        if c == '"' || c == '\\' || c == '/' || c.is_control() {
            continue;
        }
        out.push(c);
    }
    out
}
