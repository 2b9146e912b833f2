//! Persisted user settings (lives in the OS config directory).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::layout::ViewUnit;

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub view_unit: ViewUnit,
    /// Farm file opened on start-up.
    pub last_dataset: Option<PathBuf>,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            view_unit: ViewUnit::Day,
            last_dataset: None,
            log_filter: "farm_gantt=info,warn".into(),
        }
    }
}

impl AppSettings {
    /// Config directory for this app, if the platform has one.
    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "farm-gantt", "FarmGantt").map(|d| d.config_dir().to_path_buf())
    }

    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join(SETTINGS_FILE))
    }

    /// Missing or unreadable settings fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path) {
            Ok(settings) => settings,
            Err(DataError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                // Logging may not be up yet.
                eprintln!("Warning: ignoring settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self, DataError> {
        let json = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), DataError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| DataError::io(dir, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| DataError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, r#"{ "view_unit": "month" }"#).unwrap();

        let settings = AppSettings::load_or_default(Some(&path));
        assert_eq!(settings.view_unit, ViewUnit::Month);
        assert_eq!(settings.log_filter, AppSettings::default().log_filter);
        assert_eq!(settings.last_dataset, None);
    }

    #[test]
    fn missing_or_broken_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nested").join(SETTINGS_FILE);
        assert_eq!(AppSettings::load_or_default(Some(&missing)), AppSettings::default());

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{").unwrap();
        assert_eq!(AppSettings::load_or_default(Some(&broken)), AppSettings::default());
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join(SETTINGS_FILE);
        let settings = AppSettings {
            view_unit: ViewUnit::Week,
            last_dataset: Some(PathBuf::from("/tmp/farm.json")),
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(AppSettings::load(&path).unwrap(), settings);
    }
}
