use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `MOODWAVE__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("MOODWAVE")
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
        if self.audio.tick_ms == 0 {
            return Err("audio.tick_ms must be >= 1".to_string());
        }
        if self.controls.scrub_seconds == 0 {
            return Err("controls.scrub_seconds must be >= 1".to_string());
        }
        let url = self.api.base_url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(format!(
                "api.base_url must start with http:// or https:// (got {url:?})"
            ));
        }
        Ok(())
    }

    /// The log file to write to, honoring `logging.file` when set.
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.logging
            .file
            .clone()
            .or_else(|| default_state_dir().map(|d| d.join("moodwave.log")))
    }
}

/// Resolve the config path from `MOODWAVE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("MOODWAVE_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/moodwave/config.toml`
/// or `~/.config/moodwave/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("moodwave").join("config.toml"))
}

/// `$XDG_STATE_HOME/moodwave` or `~/.local/state/moodwave`.
pub fn default_state_dir() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home.map(|d| d.join("moodwave"))
}
