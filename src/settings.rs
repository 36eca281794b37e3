//! Runtime settings
//!
//! Read from `neoncade.json` next to the executable, or from the file named by
//! `NEONCADE_CONFIG`. Every field is optional in the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub const CONFIG_ENV: &str = "NEONCADE_CONFIG";
const CONFIG_FILE: &str = "neoncade.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Frame period in milliseconds (16 is roughly 60 FPS)
    pub tick_ms: u64,
    /// Frames a key stays held after a press on terminals without release events
    pub key_hold_ticks: u64,
    /// High score table
    pub scores_file: PathBuf,
    /// Platformer level code used by import/export
    pub level_file: PathBuf,
    /// Log output; the terminal itself is owned by the UI
    pub log_file: PathBuf,
    /// `env_logger` filter, overridden by `RUST_LOG`
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            key_hold_ticks: 12,
            scores_file: data_path("neoncade.scores.json"),
            level_file: data_path("neoncade.level.txt"),
            log_file: data_path("neoncade.log"),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults if the file is missing or bad.
    ///
    /// Returns the problem alongside the defaults so the caller can log it once
    /// logging is up (logging itself is configured from these settings).
    pub fn load() -> (Self, Option<String>) {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| data_path(CONFIG_FILE));
        if !path.exists() {
            return (Self::default(), None);
        }
        match Self::read(&path) {
            Ok(settings) => (settings, None),
            Err(e) => (
                Self::default(),
                Some(format!("ignoring {}: {}", path.display(), e)),
            ),
        }
    }

    pub fn read(path: &Path) -> Result<Self, StoreError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Files live next to the executable, like the score table always has.
pub fn data_path(file: &str) -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            return dir.join(file);
        }
    }
    PathBuf::from(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: Settings = serde_json::from_str(r#"{ "tick_ms": 33 }"#).unwrap();
        assert_eq!(parsed.tick_ms, 33);
        assert_eq!(parsed.key_hold_ticks, Settings::default().key_hold_ticks);
        assert_eq!(parsed.log_level, "info");
    }

    #[test]
    fn test_read_reports_malformed_json() {
        let path = std::env::temp_dir().join(format!("neoncade-settings-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let err = Settings::read(&path).unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
        let _ = fs::remove_file(&path);
    }
}
