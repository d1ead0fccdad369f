//! # Settings Loader
//!
//! Centralized settings loading for the savings calculator. Settings live in a
//! `settings.json` file and carry the number format used for reports, per-model
//! overrides of the built-in form defaults, and the API server address.
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! // Load settings from a specific path
//! let settings = settings_loader::load_settings("config/settings.json")?;
//!
//! // Load optional settings (returns None if no path is given)
//! let path = Some(PathBuf::from("settings.json"));
//! let settings = settings_loader::load_optional_settings(path.as_ref())?;
//!
//! // Settings from the path, then ./settings.json, then built-in defaults
//! let settings = settings_loader::load_settings_or_default(path.as_ref());
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use models::Settings;

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Loads settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    tracing::debug!(path = %path.display(), version = settings.settings_version, "loaded settings");
    Ok(settings)
}

/// Loads settings from the default location (settings.json in the current directory)
pub fn load_default_settings() -> Result<Settings> {
    load_settings(DEFAULT_SETTINGS_FILE)
}

/// Loads settings from an optional path, returning None if no path is provided
pub fn load_optional_settings(path: Option<&PathBuf>) -> Result<Option<Settings>> {
    match path {
        Some(settings_path) => Ok(Some(load_settings(settings_path)?)),
        None => Ok(None),
    }
}

/// Tries the provided path first, then the default location.
/// Returns None only if no settings file is found anywhere.
pub fn load_settings_with_fallback(path: Option<&PathBuf>) -> Result<Option<Settings>> {
    if let Some(settings_path) = path {
        match load_settings(settings_path) {
            Ok(settings) => return Ok(Some(settings)),
            Err(err) => {
                tracing::warn!("{:#}; trying {}", err, DEFAULT_SETTINGS_FILE);
            }
        }
    }

    if !default_settings_exist() {
        return Ok(None);
    }
    load_default_settings().map(Some)
}

/// Same as [`load_settings_with_fallback`] but never fails: a broken or missing
/// file yields the built-in settings.
pub fn load_settings_or_default(path: Option<&PathBuf>) -> Settings {
    match load_settings_with_fallback(path) {
        Ok(Some(settings)) => settings,
        Ok(None) => Settings::default(),
        Err(err) => {
            tracing::warn!("{:#}; using built-in settings", err);
            Settings::default()
        }
    }
}

/// Checks if a settings file exists at the given path
pub fn settings_file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists() && path.as_ref().is_file()
}

/// Checks if the default settings file (settings.json) exists
pub fn default_settings_exist() -> bool {
    settings_file_exists(DEFAULT_SETTINGS_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("settings_loader_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_settings_reads_file() {
        let path = temp_file(
            "valid.json",
            r#"{"settings_version": 3, "server": {"host": "0.0.0.0", "port": 8080}}"#,
        );
        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.settings_version, 3);
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.base_currency, "EUR");
    }

    #[test]
    fn test_load_settings_reports_path_on_bad_json() {
        let path = temp_file("broken.json", "{ not json");
        let err = load_settings(&path).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Parsing settings JSON"));
        assert!(message.contains("broken.json"));
    }

    #[test]
    fn test_load_optional_settings_without_path() {
        assert!(load_optional_settings(None).unwrap().is_none());
    }

    #[test]
    fn test_load_optional_settings_missing_file_is_error() {
        let missing = env::temp_dir().join("settings_loader_does_not_exist.json");
        assert!(load_optional_settings(Some(&missing)).is_err());
    }

    #[test]
    fn test_settings_or_default_falls_back_to_builtin() {
        let path = temp_file("also_broken.json", "[]");
        let settings = load_settings_or_default(Some(&path));
        // settings.json is not expected in the crate directory during tests
        if !default_settings_exist() {
            assert_eq!(settings, Settings::default());
        }
    }
}
