//! MPRIS (D-Bus media player) integration.
//!
//! Remote transport calls are forwarded to the event loop as [`ControlCmd`]s;
//! the loop mirrors the controller snapshot back through [`MprisHandle`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, mpsc::Sender};

use async_io::{Timer, block_on};
use tracing::{debug, warn};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::catalog::Track;
use crate::playback::PlaybackPhase;

const BUS_NAME: &str = "org.mpris.MediaPlayer2.moodwave";
const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const TRACK_PATH_PREFIX: &str = "/org/mpris/MediaPlayer2/moodwave/track/";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Next,
    Prev,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackPhase,
    track_id: Option<OwnedObjectPath>,
    title: Option<String>,
    artist: Vec<String>,
    art_url: Option<String>,
    url: Option<String>,
    length_micros: Option<i64>,
}

/// D-Bus object path for a track id. Characters outside `[A-Za-z0-9_]` are
/// replaced with `_`.
fn track_object_path(track_id: &str) -> Option<OwnedObjectPath> {
    let mut element: String = track_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if element.is_empty() {
        element.push('_');
    }
    ObjectPath::try_from(format!("{TRACK_PATH_PREFIX}{element}"))
        .ok()
        .map(OwnedObjectPath::from)
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_playback(&self, playback: PlaybackPhase) {
        self.lock().playback = playback;
    }

    /// Mirror the current track; `None` clears the metadata.
    pub fn set_track_metadata(&self, track: Option<&Track>, total_secs: Option<f64>) {
        let mut s = self.lock();
        match track {
            Some(t) => {
                s.track_id = track_object_path(&t.track_id);
                s.title = Some(t.name.clone());
                s.artist = if t.artist.trim().is_empty() {
                    Vec::new()
                } else {
                    vec![t.artist.clone()]
                };
                s.art_url = (!t.image_url.is_empty()).then(|| t.image_url.clone());
                s.url = Some(t.audio_url.clone());
                s.length_micros = total_secs
                    .filter(|secs| secs.is_finite() && *secs >= 0.0)
                    .map(|secs| (secs * 1_000_000.0) as i64);
            }
            None => {
                s.track_id = None;
                s.title = None;
                s.artist.clear();
                s.art_url = None;
                s.url = None;
                s.length_micros = None;
            }
        }
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "moodwave"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["http".to_string(), "https".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

impl PlayerIface {
    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn insert_value<'a>(map: &mut HashMap<String, OwnedValue>, key: &str, value: impl Into<Value<'a>>) {
    if let Ok(v) = OwnedValue::try_from(value.into()) {
        map.insert(key.to_string(), v);
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    /// There is no stopped state once a track is loaded; stop pauses.
    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        match self.lock().playback {
            PlaybackPhase::Empty => "Stopped",
            PlaybackPhase::Playing => "Playing",
            PlaybackPhase::Loading | PlaybackPhase::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let s = self.lock();
        let mut map = HashMap::new();

        if let Some(ref id) = s.track_id {
            insert_value(&mut map, "mpris:trackid", id.clone().into_inner());
        }
        insert_value(&mut map, "xesam:title", s.title.clone().unwrap_or_default());
        if !s.artist.is_empty() {
            insert_value(&mut map, "xesam:artist", s.artist.clone());
        }
        if let Some(ref art) = s.art_url {
            insert_value(&mut map, "mpris:artUrl", art.clone());
        }
        if let Some(ref url) = s.url {
            insert_value(&mut map, "xesam:url", url.clone());
        }
        if let Some(len) = s.length_micros {
            insert_value(&mut map, "mpris:length", len);
        }
        map
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!(error = %e, "MPRIS: failed to connect to session bus");
                    return;
                }
            };

            if let Err(e) = connection.request_name(BUS_NAME).await {
                warn!(error = %e, "MPRIS: failed to acquire name");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server
                .at(OBJECT_PATH, RootIface { tx: tx.clone() })
                .await
            {
                warn!(error = %e, "MPRIS: failed to register root iface");
                return;
            }

            if let Err(e) = object_server
                .at(
                    OBJECT_PATH,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!(error = %e, "MPRIS: failed to register player iface");
                return;
            }
            debug!(name = BUS_NAME, "MPRIS service registered");

            // Keep the service alive.
            loop {
                Timer::after(std::time::Duration::from_secs(3600)).await;
            }
        });
    });

    MprisHandle { state }
}

#[cfg(test)]
mod tests;
