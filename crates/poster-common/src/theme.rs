//! Poster themes: named color palettes stored as one JSON file per theme.
//!
//! A theme file looks like:
//!
//! ```json
//! {
//!   "name": "Noir",
//!   "description": "White streets on black",
//!   "bg": "#000000",
//!   "text": "#FFFFFF",
//!   "gradient_color": "#000000",
//!   "water": "#0A0A0A",
//!   "parks": "#111111",
//!   "road_motorway": "#FFFFFF",
//!   "road_primary": "#E0E0E0",
//!   "road_secondary": "#C0C0C0",
//!   "road_tertiary": "#A0A0A0",
//!   "road_residential": "#808080",
//!   "road_default": "#A0A0A0"
//! }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PosterError, PosterResult};

/// Theme used when a request does not name one.
pub const DEFAULT_THEME_NAME: &str = "feature_based";

/// An opaque RGB color, stored in theme files as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("invalid hex color '{}'", s));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| format!("invalid hex color '{}'", s))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// A named color palette controlling all poster styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub bg: Color,
    pub text: Color,
    pub gradient_color: Color,
    pub water: Color,
    pub parks: Color,
    pub road_motorway: Color,
    pub road_primary: Color,
    pub road_secondary: Color,
    pub road_tertiary: Color,
    pub road_residential: Color,
    pub road_default: Color,
}

impl Theme {
    /// The built-in grayscale palette used when a named theme is absent.
    pub fn fallback() -> Self {
        Self {
            name: "Feature-Based Shading".to_string(),
            description: None,
            bg: Color::rgb(0xFF, 0xFF, 0xFF),
            text: Color::rgb(0x00, 0x00, 0x00),
            gradient_color: Color::rgb(0xFF, 0xFF, 0xFF),
            water: Color::rgb(0xC0, 0xC0, 0xC0),
            parks: Color::rgb(0xF0, 0xF0, 0xF0),
            road_motorway: Color::rgb(0x0A, 0x0A, 0x0A),
            road_primary: Color::rgb(0x1A, 0x1A, 0x1A),
            road_secondary: Color::rgb(0x2A, 0x2A, 0x2A),
            road_tertiary: Color::rgb(0x3A, 0x3A, 0x3A),
            road_residential: Color::rgb(0x4A, 0x4A, 0x4A),
            road_default: Color::rgb(0x3A, 0x3A, 0x3A),
        }
    }

    /// Parse a stored theme definition. Any missing or invalid color is a
    /// [`PosterError::ThemeFormat`] tagged with `name`.
    pub fn from_json(name: &str, json: &str) -> PosterResult<Self> {
        serde_json::from_str(json).map_err(|e| PosterError::ThemeFormat {
            name: name.to_string(),
            message: e.to_string(),
        })
    }
}

/// A read-only store of named theme definitions.
pub trait ThemeSource: Send + Sync {
    /// Load a theme by name. `Ok(None)` means no theme has that name.
    fn load(&self, name: &str) -> PosterResult<Option<Theme>>;
}

/// Resolve a theme by name, falling back to [`Theme::fallback`] on a miss.
///
/// Malformed stored definitions are errors and are never replaced by the
/// fallback.
pub fn resolve_theme(source: &dyn ThemeSource, name: &str) -> PosterResult<Theme> {
    match source.load(name)? {
        Some(theme) => {
            debug!(theme = %name, "Resolved theme");
            Ok(theme)
        }
        None => {
            info!(theme = %name, "Theme not found, using built-in default");
            Ok(Theme::fallback())
        }
    }
}

/// Themes stored as `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct ThemeDirectory {
    dir: PathBuf,
}

impl ThemeDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Sorted names of all `*.json` files in the directory.
    ///
    /// A missing directory yields an empty list.
    pub fn available_themes(&self) -> PosterResult<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

fn is_valid_theme_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl ThemeSource for ThemeDirectory {
    fn load(&self, name: &str) -> PosterResult<Option<Theme>> {
        if !is_valid_theme_name(name) {
            return Err(PosterError::InvalidParameter {
                param: "theme".to_string(),
                message: format!("'{}' is not a valid theme name", name),
            });
        }
        let path = self.dir.join(format!("{}.json", name));
        if !path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        Theme::from_json(name, &content).map(Some)
    }
}
