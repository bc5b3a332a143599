use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use reqwest::Client;
use tokio::runtime::Handle;

use crate::config::AudioSettings;
use crate::error::ResourceError;
use crate::playback::{AudioResource, Generation, SubscriptionSet, TaggedEvent};

use super::thread::{ThreadParts, spawn_resource_thread};
use super::types::ResourceCmd;

/// [`AudioResource`] backed by a rodio output stream on its own thread.
pub struct RodioResource {
    tx: Sender<ResourceCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

/// Start the audio thread. Events arrive on the returned receiver.
///
/// Downloads run on `runtime` using `http`.
pub fn spawn(
    settings: &AudioSettings,
    runtime: Handle,
    http: Client,
) -> (RodioResource, Receiver<TaggedEvent>) {
    let (tx, rx) = mpsc::channel::<ResourceCmd>();
    let (events_tx, events_rx) = mpsc::channel::<TaggedEvent>();

    let join = spawn_resource_thread(ThreadParts {
        rx,
        loopback: tx.clone(),
        events: events_tx,
        runtime,
        http,
        settings: settings.clone(),
    });

    let resource = RodioResource {
        tx,
        join: Mutex::new(Some(join)),
    };
    (resource, events_rx)
}

impl RodioResource {
    fn send(&self, cmd: ResourceCmd) -> Result<(), ResourceError> {
        self.tx.send(cmd).map_err(|_| ResourceError::Disconnected)
    }

    /// Fade out, stop the thread and wait for it. Safe to call more than once.
    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(ResourceCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl AudioResource for RodioResource {
    fn attach(&mut self, generation: Generation) -> SubscriptionSet {
        let _ = self.send(ResourceCmd::Attach(generation));
        SubscriptionSet::all(generation)
    }

    fn detach(&mut self, subscriptions: SubscriptionSet) {
        let _ = self.send(ResourceCmd::Detach(subscriptions.generation()));
    }

    fn set_source(&mut self, url: &str) -> Result<(), ResourceError> {
        self.send(ResourceCmd::SetSource {
            url: url.to_string(),
        })
    }

    fn play(&mut self) -> Result<(), ResourceError> {
        self.send(ResourceCmd::Play)
    }

    fn pause(&mut self) -> Result<(), ResourceError> {
        self.send(ResourceCmd::Pause)
    }

    fn seek(&mut self, position: f64) -> Result<(), ResourceError> {
        self.send(ResourceCmd::Seek(position))
    }
}

impl Drop for RodioResource {
    fn drop(&mut self) {
        self.quit_softly(Duration::ZERO);
    }
}
