//! Error types for the poster pipeline and service.

use thiserror::Error;

/// Result type alias using PosterError.
pub type PosterResult<T> = Result<T, PosterError>;

/// Primary error type for poster operations.
#[derive(Debug, Error)]
pub enum PosterError {
    // === Request Errors ===
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // === Rendering Errors ===
    #[error("Invalid input geometry: {0}")]
    InvalidGeometry(String),

    #[error("Malformed theme '{name}': {message}")]
    ThemeFormat { name: String, message: String },

    #[error("Rendering failed: {0}")]
    RenderError(String),

    #[error("Image encoding failed: {0}")]
    Encoding(String),

    // === Upstream Errors ===
    #[error("Could not find coordinates for {0}")]
    GeocodeNotFound(String),

    #[error("Geocoding failed: {0}")]
    GeocodeError(String),

    #[error("Failed to fetch map features: {0}")]
    FeatureFetch(String),

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl PosterError {
    /// Short machine-readable code for API error bodies and logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            PosterError::MissingParameter(_) => "MissingParameterValue",
            PosterError::InvalidParameter { .. } => "InvalidParameterValue",
            PosterError::InvalidGeometry(_) => "InvalidGeometry",
            PosterError::ThemeFormat { .. } => "ThemeFormat",
            PosterError::RenderError(_) => "RenderFailed",
            PosterError::Encoding(_) => "EncodingFailed",
            PosterError::GeocodeNotFound(_) => "LocationNotFound",
            PosterError::GeocodeError(_) | PosterError::FeatureFetch(_) => "UpstreamUnavailable",
            PosterError::InternalError(_) => "NoApplicableCode",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            PosterError::MissingParameter(_)
            | PosterError::InvalidParameter { .. }
            | PosterError::InvalidGeometry(_) => 400,

            PosterError::GeocodeNotFound(_) => 404,

            PosterError::GeocodeError(_) | PosterError::FeatureFetch(_) => 502,

            _ => 500,
        }
    }
}

impl From<std::io::Error> for PosterError {
    fn from(err: std::io::Error) -> Self {
        PosterError::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for PosterError {
    fn from(err: serde_json::Error) -> Self {
        PosterError::InternalError(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PosterError::MissingParameter("city".into()).http_status_code(), 400);
        assert_eq!(PosterError::InvalidGeometry("flat".into()).http_status_code(), 400);
        assert_eq!(PosterError::GeocodeNotFound("Nowhere".into()).http_status_code(), 404);
        assert_eq!(PosterError::FeatureFetch("timeout".into()).http_status_code(), 502);
        assert_eq!(PosterError::Encoding("zlib".into()).http_status_code(), 500);
        let theme = PosterError::ThemeFormat {
            name: "noir".into(),
            message: "missing field `bg`".into(),
        };
        assert_eq!(theme.http_status_code(), 500);
        assert_eq!(theme.error_code(), "ThemeFormat");
    }
}
