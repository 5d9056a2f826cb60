use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/crescendo/config.toml` or `~/.config/crescendo/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CRESCENDO__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub playback: PlaybackSettings,
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Scheme + host (+ optional path prefix) serving `/api/search` and `/api/track/<id>`.
    pub base_url: String,
    /// Per-request timeout for catalog calls (milliseconds).
    pub timeout_ms: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Volume at startup, in percent (0-100).
    pub initial_volume: u8,
    /// Whether output starts muted.
    pub muted: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            initial_volume: 50,
            muted: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
    /// Interval between position notifications while playing (milliseconds).
    pub tick_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            quit_fade_out_ms: 300,
            tick_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Cover reference shown for tracks the catalog returns without one.
    pub default_cover: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ search, pick, listen ~ ".to_string(),
            default_cover: "/static/default-cover.png".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Percentage points added/removed by `+` / `-`.
    pub volume_step: u8,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { volume_step: 5 }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default filter directive, e.g. `info` or `crescendo=debug`.
    /// `RUST_LOG` wins when set.
    pub level: Option<String>,
    /// Log file path. Defaults to `$XDG_STATE_HOME/crescendo/crescendo.log`.
    pub file: Option<String>,
}
