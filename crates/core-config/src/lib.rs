//! Configuration loading and parsing.
//!
//! Parses `scribe.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [chord]
//! timeout_ms = 2000      # window for the second key of the chord
//!
//! [highlight]
//! debounce_ms = 200      # quiet period before the highlight pass runs
//!
//! [platform]
//! primary_modifier = "auto"   # "auto" | "command" | "control"
//! ```
//!
//! Every field is optional. Unknown fields are ignored so the file can grow without
//! warnings; a file that fails to parse falls back to defaults with a `warn!`.

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const DEFAULT_CHORD_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_HIGHLIGHT_DEBOUNCE_MS: u64 = 200;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ChordConfig {
    #[serde(default = "ChordConfig::default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ChordConfig {
    fn default() -> Self {
        Self {
            timeout_ms: Self::default_timeout_ms(),
        }
    }
}

impl ChordConfig {
    const fn default_timeout_ms() -> u64 {
        DEFAULT_CHORD_TIMEOUT_MS
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HighlightConfig {
    #[serde(default = "HighlightConfig::default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            debounce_ms: Self::default_debounce_ms(),
        }
    }
}

impl HighlightConfig {
    const fn default_debounce_ms() -> u64 {
        DEFAULT_HIGHLIGHT_DEBOUNCE_MS
    }
}

/// Which key acts as the primary shortcut modifier.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModifierPreference {
    /// Ask the host platform on every keydown.
    #[default]
    Auto,
    Command,
    Control,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    #[serde(default)]
    pub primary_modifier: ModifierPreference,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub chord: ChordConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub platform: PlatformConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Best-effort config path: working directory first, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("scribe.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("scribe").join("scribe.toml");
    }
    PathBuf::from("scribe.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_absent_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Parse from an in-memory string (same fallback policy as [`load_from`]).
    pub fn from_toml_str(content: &str) -> Self {
        match toml::from_str::<ConfigFile>(content) {
            Ok(file) => Config {
                raw: Some(content.to_string()),
                file,
            },
            Err(e) => {
                warn!(target: "config", error = %e, "config_parse_failed_using_defaults");
                Config::default()
            }
        }
    }

    /// Chord window; zero is clamped to 1ms.
    pub fn chord_timeout(&self) -> Duration {
        Duration::from_millis(clamp_ms("chord.timeout_ms", self.file.chord.timeout_ms))
    }

    /// Highlight debounce delay; zero is clamped to 1ms.
    pub fn highlight_delay(&self) -> Duration {
        Duration::from_millis(clamp_ms(
            "highlight.debounce_ms",
            self.file.highlight.debounce_ms,
        ))
    }

    pub fn primary_modifier(&self) -> ModifierPreference {
        self.file.platform.primary_modifier
    }
}

fn clamp_ms(field: &'static str, raw: u64) -> u64 {
    if raw == 0 {
        info!(target: "config", field, raw, clamped = 1u64, "timer_delay_clamped");
        1
    } else {
        raw
    }
}
