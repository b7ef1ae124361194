//! Theme catalog endpoint.

use std::sync::Arc;

use axum::{extract::Extension, response::{IntoResponse, Response}, Json};
use poster_common::{PosterResult, ThemeDirectory, ThemeSource};
use serde::Serialize;
use tracing::warn;

use super::common::error_response;
use crate::state::AppState;

/// One entry of the theme catalog.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ThemeSummary {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
struct ThemeCatalog {
    themes: Vec<ThemeSummary>,
    default: String,
}

/// Summaries of every readable theme in the directory.
///
/// Definitions that fail to parse are logged and left out.
pub fn theme_summaries(themes: &ThemeDirectory) -> PosterResult<Vec<ThemeSummary>> {
    let mut out = Vec::new();
    for id in themes.available_themes()? {
        match themes.load(&id) {
            Ok(Some(theme)) => out.push(ThemeSummary {
                id,
                name: theme.name,
                description: theme.description,
            }),
            Ok(None) => {}
            Err(e) => warn!(theme = %id, error = %e, "Skipping unreadable theme"),
        }
    }
    Ok(out)
}

/// GET /api/themes - list available themes
pub async fn themes_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    match theme_summaries(&state.themes) {
        Ok(themes) => Json(ThemeCatalog {
            themes,
            default: state.config.default_theme.clone(),
        })
        .into_response(),
        Err(e) => error_response(&e),
    }
}
