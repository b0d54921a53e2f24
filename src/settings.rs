//! Optional TOML settings file. Every field has a default, so a missing or
//! partial file is fine.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::store::default_score_path;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Where best times and waves are kept.
    pub store_path: PathBuf,
    /// Log file; the terminal itself is busy drawing the game.
    pub log_path: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    pub log_filter: String,
    /// Start with the background music muted.
    pub muted: bool,
    /// Target frame time.
    pub frame_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: default_score_path(),
            log_path: PathBuf::from("asteroid_dodger.log"),
            log_filter: "info".into(),
            muted: false,
            frame_ms: 33,
        }
    }
}

impl Settings {
    pub fn from_toml(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| format!("parse TOML: {e}"))
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
        Self::from_toml(&text)
    }

    /// Defaults plus a warning when the file is unreadable or invalid.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(path) {
            Ok(settings) => (settings, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }
}
