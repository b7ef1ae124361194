//! Path utilities for locating fonts and staging theme directories.

use std::fs;
use std::path::{Path, PathBuf};

/// Returns the workspace root directory.
///
/// This is determined by walking up from the current crate's manifest directory
/// until we find the workspace Cargo.toml.
pub fn workspace_root() -> PathBuf {
    // Start from the test-utils crate manifest dir
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Returns the workspace-level `themes/` directory.
pub fn themes_dir() -> PathBuf {
    workspace_root().join("themes")
}

/// Searches for a regular-weight TrueType font.
///
/// This function checks the following locations in order:
/// 1. `$FONTS_DIR/Roboto-Regular.ttf` (if set)
/// 2. `fonts/Roboto-Regular.ttf` in the workspace
/// 3. Common DejaVu and Liberation install locations
///
/// # Returns
///
/// `Some(PathBuf)` if a font is found, `None` otherwise.
pub fn find_font() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(dir) = std::env::var("FONTS_DIR") {
        candidates.push(PathBuf::from(dir).join("Roboto-Regular.ttf"));
    }

    candidates.push(workspace_root().join("fonts/Roboto-Regular.ttf"));
    candidates.extend(
        [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        ]
        .iter()
        .map(PathBuf::from),
    );

    candidates.into_iter().find(|path| path.is_file())
}

/// Creates a temporary directory for test output.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

/// Creates a temporary theme directory containing `{name}.json` for each
/// `(name, json)` pair.
pub fn temp_themes_dir(themes: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::Builder::new()
        .prefix("themes_")
        .tempdir()
        .expect("Failed to create temporary themes directory");
    for (name, json) in themes {
        write_theme(dir.path(), name, json);
    }
    dir
}

/// Writes one theme file into `dir`.
pub fn write_theme(dir: &Path, name: &str, json: &str) {
    fs::write(dir.join(format!("{}.json", name)), json).expect("Failed to write theme file");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_is_valid() {
        let root = workspace_root();
        // Should contain Cargo.toml at workspace level
        assert!(
            root.join("Cargo.toml").exists(),
            "Workspace root should contain Cargo.toml: {:?}",
            root
        );
    }

    #[test]
    fn test_temp_themes_dir_writes_files() {
        let dir = temp_themes_dir(&[("a", "{}"), ("b", "{}")]);
        assert!(dir.path().join("a.json").is_file());
        assert!(dir.path().join("b.json").is_file());
    }
}
