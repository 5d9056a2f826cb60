use std::path::PathBuf;

use crate::config;

/// Load settings, falling back to defaults when the config cannot be read or
/// does not validate. The second value describes the problem so it can be
/// logged once logging is up.
pub fn load_settings(config_path: Option<PathBuf>) -> (config::Settings, Option<String>) {
    let loaded = match config_path {
        Some(path) => config::Settings::load_from(&path),
        None => config::Settings::load(),
    };

    match loaded {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                (
                    config::Settings::default(),
                    Some(format!("invalid config, using defaults: {msg}")),
                )
            } else {
                (s, None)
            }
        }
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => (
            config::Settings::default(),
            Some(format!("failed to load config, using defaults: {e}")),
        ),
    }
}
