use std::env;
use std::path::{Path, PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads a config file, then environment variables
/// (prefix `CRESCENDO__`) on top, and falls back to struct defaults. A file
/// named explicitly must exist; the XDG default may be absent.
impl Settings {
    /// Load settings from the resolved config file and the environment.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        Self::load_file(resolve_config_file())
    }

    /// Load settings from the file at `path`, which must exist, and the
    /// environment.
    pub fn load_from(path: &Path) -> Result<Self, ::config::ConfigError> {
        Self::load_file(Some(ConfigFile {
            path: path.to_path_buf(),
            required: true,
        }))
    }

    fn load_file(file: Option<ConfigFile>) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();

        if let Some(file) = &file {
            builder = builder.add_source(::config::File::from(file.path.as_path()).required(file.required));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("CRESCENDO")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.catalog.base_url.trim().is_empty() {
            return Err("catalog.base_url must not be empty".to_string());
        }
        if self.catalog.timeout_ms == 0 {
            return Err("catalog.timeout_ms must be >= 1".to_string());
        }
        if self.playback.initial_volume > 100 {
            return Err("playback.initial_volume must be within 0..=100".to_string());
        }
        if self.controls.volume_step == 0 {
            return Err("controls.volume_step must be >= 1".to_string());
        }
        if self.audio.tick_ms == 0 {
            return Err("audio.tick_ms must be >= 1".to_string());
        }
        Ok(())
    }

    /// Render the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Config file to read, and whether it has to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub required: bool,
}

/// Resolve the config file from `CRESCENDO_CONFIG_PATH` (required) or the
/// XDG default (optional).
pub fn resolve_config_file() -> Option<ConfigFile> {
    if let Some(p) = env::var_os("CRESCENDO_CONFIG_PATH") {
        return Some(ConfigFile {
            path: PathBuf::from(p),
            required: true,
        });
    }
    default_config_path().map(|path| ConfigFile { path, required: false })
}

/// Compute the default config path under `$XDG_CONFIG_HOME/crescendo/config.toml`
/// or `~/.config/crescendo/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("crescendo").join("config.toml"))
}

/// Compute the default log file path under `$XDG_STATE_HOME/crescendo/`
/// or `~/.local/state/crescendo/`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("crescendo").join("crescendo.log"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
