use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use crate::models::ClipboardMode;

pub const PREFS_DIR_ENV: &str = "FILEDECK_PREFS_DIR";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// Where the preference namespaces live. Defaults next to this file.
    pub prefs_dir: Option<PathBuf>,
    pub clipboard_mode: ClipboardMode,
    pub log_level: String,

    // Window
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            prefs_dir: None,
            clipboard_mode: ClipboardMode::Permissive,
            log_level: "info".to_string(),
            window_width: 640.0,
            window_height: 480.0,
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    pub fn load_from(path: &PathBuf) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), "invalid settings, using defaults: {}", e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn resolved_prefs_dir(&self) -> PathBuf {
        self.resolve_prefs_dir(std::env::var_os(PREFS_DIR_ENV))
    }

    /// `env` first when non-empty, then the configured directory, then the
    /// platform config directory.
    pub fn resolve_prefs_dir(&self, env: Option<OsString>) -> PathBuf {
        if let Some(dir) = env.filter(|v| !v.is_empty()) {
            return PathBuf::from(dir);
        }
        if let Some(dir) = &self.prefs_dir {
            return dir.clone();
        }
        Self::config_dir().join("prefs")
    }

    fn config_dir() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("filedeck")
        } else {
            PathBuf::from(".").join("filedeck")
        }
    }

    pub fn get_config_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }
}
