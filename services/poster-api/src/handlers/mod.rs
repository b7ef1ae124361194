//! HTTP request handlers.

mod common;
mod metrics;
mod poster;
mod themes;

pub use common::{error_response, poster_filename};
pub use metrics::{api_metrics_handler, health_handler, metrics_handler};
pub use poster::{poster_handler, PosterLocation, PosterParams, PosterRequest};
pub use themes::{theme_summaries, themes_handler, ThemeSummary};
