use super::load::{default_config_path, default_state_dir, resolve_config_path};
use super::schema::*;
use crate::catalog::Mood;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_moodwave_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("MOODWAVE_CONFIG_PATH", "/tmp/moodwave-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/moodwave-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("moodwave")
            .join("config.toml")
    );
}

#[test]
fn default_state_dir_falls_back_to_home_local_state() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_STATE_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_state_dir().unwrap(),
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".local")
            .join("state")
            .join("moodwave")
    );
}

#[test]
fn log_file_override_wins_over_state_dir() {
    let mut s = Settings::default();
    s.logging.file = Some("/tmp/custom.log".into());
    assert_eq!(
        s.log_file_path().unwrap(),
        std::path::PathBuf::from("/tmp/custom.log")
    );
}

#[test]
fn settings_load_from_config_file_and_parse_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[api]
base_url = "https://music.example.com/api"
user_id = "listener"
timeout_secs = 5

[audio]
tick_ms = 100
quit_fade_out_ms = 0
download_timeout_secs = 900

[controls]
scrub_seconds = 9

[browse]
default_mood = "energy"
start_view = "collection"

[ui]
header_text = "hello"
now_playing_track_fields = ["artist", "name"]
now_playing_track_separator = " • "
now_playing_time_fields = ["elapsed", "remaining"]

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("MOODWAVE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("MOODWAVE__AUDIO__TICK_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.api.base_url, "https://music.example.com/api");
    assert_eq!(s.api.user_id, "listener");
    assert_eq!(s.api.timeout_secs, 5);
    assert_eq!(s.api.connect_timeout_secs, 10);
    assert_eq!(s.audio.tick_ms, 100);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert_eq!(s.audio.download_timeout_secs, 900);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.browse.default_mood, Mood::Energy);
    assert_eq!(s.browse.start_view, StartView::TimeOfDay);
    assert_eq!(s.ui.header_text, "hello");
    assert!(matches!(s.ui.now_playing_track_fields[0], TrackDisplayField::Artist));
    assert!(matches!(s.ui.now_playing_track_fields[1], TrackDisplayField::Title));
    assert_eq!(s.ui.now_playing_track_separator, " • ");
    assert!(matches!(s.ui.now_playing_time_fields[1], TimeField::Remaining));
    assert_eq!(s.logging.level, "debug");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
tick_ms = 250
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("MOODWAVE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("MOODWAVE__AUDIO__TICK_MS", "50");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.tick_ms, 50);
}

#[test]
fn validate_rejects_zero_tick_and_non_http_base_url() {
    let mut s = Settings::default();
    assert!(s.validate().is_ok());

    s.audio.tick_ms = 0;
    assert!(s.validate().is_err());

    s.audio.tick_ms = 200;
    s.api.base_url = "ftp://nope".to_string();
    let err = s.validate().unwrap_err();
    assert!(err.contains("api.base_url"));
}
