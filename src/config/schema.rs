use std::path::PathBuf;

use serde::Deserialize;

use crate::catalog::Mood;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/moodwave/config.toml` or `~/.config/moodwave/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `MOODWAVE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub browse: BrowseSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the track service, without a trailing slash.
    pub base_url: String,
    /// User identifier sent with every favorites request.
    pub user_id: String,
    /// Whole-request timeout (seconds).
    pub timeout_secs: u64,
    /// Connect timeout (seconds).
    pub connect_timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api".to_string(),
            user_id: "demo_user".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// How often the audio thread reports elapsed time while playing (milliseconds).
    pub tick_ms: u64,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
    /// Whole-download limit for audio files (seconds). 0 means no limit;
    /// only the api connect timeout applies.
    pub download_timeout_secs: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            tick_ms: 200,
            quit_fade_out_ms: 500,
            download_timeout_secs: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Which track fields to show in the status "Song:" line, and in what order.
    ///
    /// Example: ["artist", "title"]
    pub now_playing_track_fields: Vec<TrackDisplayField>,

    /// Separator used to join `now_playing_track_fields`.
    pub now_playing_track_separator: String,

    /// Which time fields to show for the status line, and in what order.
    ///
    /// Example: ["elapsed", "total", "remaining"]
    pub now_playing_time_fields: Vec<TimeField>,

    /// Separator used to join `now_playing_time_fields`.
    pub now_playing_time_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ music for every mood ~ ".to_string(),
            now_playing_track_fields: vec![TrackDisplayField::Display],
            now_playing_track_separator: " - ".to_string(),
            now_playing_time_fields: vec![TimeField::Elapsed, TimeField::Total],
            now_playing_time_separator: " / ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowseSettings {
    /// Mood selected when the mood view first opens.
    pub default_mood: Mood,
    /// View shown at startup.
    pub start_view: StartView,
}

impl Default for BrowseSettings {
    fn default() -> Self {
        Self {
            default_mood: Mood::Joy,
            start_view: StartView::Mood,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StartView {
    Mood,
    #[serde(alias = "time_of_day", alias = "collection", alias = "time")]
    TimeOfDay,
    #[serde(alias = "favourites")]
    Favorites,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Log file path; defaults to `<state dir>/moodwave/moodwave.log`.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeField {
    Elapsed,
    Total,
    Remaining,
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackDisplayField {
    /// `Artist - Title`.
    Display,
    #[serde(alias = "name")]
    Title,
    Artist,
}
