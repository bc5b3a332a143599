use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use reqwest::Client;
use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

use crate::config::AudioSettings;
use crate::playback::{ResourceEvent, TaggedEvent};

use super::sink::{create_sink_at, fade_out_sink, probe_duration};
use super::types::{AudioBytes, Outbox, ResourceCmd};

pub(super) struct ThreadParts {
    pub rx: Receiver<ResourceCmd>,
    /// Clone of the command sender, used by download tasks to report back.
    pub loopback: Sender<ResourceCmd>,
    pub events: Sender<TaggedEvent>,
    pub runtime: Handle,
    pub http: Client,
    pub settings: AudioSettings,
}

/// Media that finished downloading for the current source.
struct Loaded {
    bytes: AudioBytes,
    duration: Option<Duration>,
}

struct Engine {
    stream: Option<OutputStream>,
    outbox: Outbox,
    loopback: Sender<ResourceCmd>,
    runtime: Handle,
    http: Client,
    /// Bumped on every `SetSource`; stale downloads are ignored.
    seq: u64,
    loading: bool,
    media: Option<Loaded>,
    sink: Option<Sink>,
    /// Position the current sink started from.
    offset: Duration,
    /// Autoplay requested before the media was ready.
    wants_play: bool,
    playing: bool,
    completed: bool,
}

impl Engine {
    fn position(&self) -> Duration {
        self.offset + self.sink.as_ref().map_or(Duration::ZERO, Sink::get_pos)
    }

    fn fail(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(reason = %reason, "Audio resource failure");
        self.wants_play = false;
        self.playing = false;
        self.outbox.emit(ResourceEvent::Failed { reason });
    }

    fn stop_sink(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    fn set_source(&mut self, url: String) {
        self.stop_sink();
        self.media = None;
        self.offset = Duration::ZERO;
        self.wants_play = false;
        self.playing = false;
        self.completed = false;
        self.seq += 1;

        if self.stream.is_none() {
            self.loading = false;
            self.fail("no audio output device");
            return;
        }

        self.loading = true;
        let seq = self.seq;
        let http = self.http.clone();
        let loopback = self.loopback.clone();
        debug!(seq, url = %url, "Fetching audio");
        self.runtime.spawn(async move {
            let result = fetch(&http, &url).await;
            let _ = loopback.send(ResourceCmd::Fetched { seq, result });
        });
    }

    fn on_fetched(&mut self, seq: u64, result: Result<AudioBytes, String>) {
        if seq != self.seq {
            debug!(seq, current = self.seq, "Ignoring superseded download");
            return;
        }
        self.loading = false;

        let bytes = match result {
            Ok(b) => b,
            Err(e) => return self.fail(e),
        };
        let Some(stream) = self.stream.as_ref() else {
            return self.fail("no audio output device");
        };
        let sink = match create_sink_at(stream, &bytes, Duration::ZERO) {
            Ok(s) => s,
            Err(e) => return self.fail(e),
        };

        let duration = probe_duration(&bytes);
        info!(
            bytes = bytes.len(),
            duration_secs = duration.map(|d| d.as_secs_f64()),
            "Audio ready"
        );
        self.sink = Some(sink);
        self.media = Some(Loaded { bytes, duration });
        self.outbox.emit(ResourceEvent::MetadataReady {
            duration: duration.map_or(f64::INFINITY, |d| d.as_secs_f64()),
            elapsed: 0.0,
        });

        if self.wants_play {
            self.start();
        }
    }

    fn start(&mut self) {
        self.wants_play = false;
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        sink.play();
        self.playing = true;
        self.outbox.emit(ResourceEvent::PlayStarted);
    }

    fn play(&mut self) {
        if self.sink.is_some() {
            if self.completed {
                // Replay from the top after the track ran out.
                self.seek(0.0);
            }
            self.start();
        } else if self.loading {
            self.wants_play = true;
        } else if self.stream.is_none() {
            self.fail("no audio output device");
        } else {
            self.fail("no media loaded");
        }
    }

    fn pause(&mut self) {
        self.wants_play = false;
        if let Some(s) = self.sink.as_ref() {
            s.pause();
            self.playing = false;
            self.outbox.emit(ResourceEvent::Paused);
        }
    }

    fn seek(&mut self, position: f64) {
        let Some(media) = self.media.as_ref() else {
            return;
        };
        let Some(stream) = self.stream.as_ref() else {
            return;
        };

        let mut target = Duration::from_secs_f64(position.max(0.0));
        if let Some(total) = media.duration {
            target = target.min(total);
        }

        // Rebuild the sink and skip into the decoded stream.
        let new_sink = match create_sink_at(stream, &media.bytes, target) {
            Ok(s) => s,
            Err(e) => return self.fail(e),
        };
        self.stop_sink();
        if self.playing {
            new_sink.play();
        }
        self.sink = Some(new_sink);
        self.offset = target;
        self.completed = false;
        self.outbox.emit(ResourceEvent::TimeProgress {
            elapsed: target.as_secs_f64(),
        });
    }

    fn tick(&mut self) {
        if !self.playing {
            return;
        }
        let Some(sink) = self.sink.as_ref() else {
            return;
        };

        if sink.empty() {
            if !self.completed {
                self.completed = true;
                self.playing = false;
                debug!("Track completed");
                self.outbox.emit(ResourceEvent::Completed);
            }
            return;
        }

        self.outbox.emit(ResourceEvent::TimeProgress {
            elapsed: self.position().as_secs_f64(),
        });
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(s) = self.sink.as_ref() {
            // Fade out gently before stopping.
            if self.playing {
                fade_out_sink(s, fade_out_ms);
            }
            s.stop();
        }
        self.sink = None;
        self.playing = false;
    }
}

async fn fetch(http: &Client, url: &str) -> Result<AudioBytes, String> {
    let response = http
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| format!("failed to fetch audio: {e}"))?;
    let body = response
        .bytes()
        .await
        .map_err(|e| format!("failed to read audio body: {e}"))?;
    Ok(AudioBytes::from(&body[..]))
}

fn open_stream() -> Option<OutputStream> {
    match OutputStreamBuilder::open_default_stream() {
        Ok(mut stream) => {
            // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
            // but noisy for a TUI app.
            stream.log_on_drop(false);
            Some(stream)
        }
        Err(e) => {
            error!(error = %e, "No audio output device; playback disabled");
            None
        }
    }
}

pub(super) fn spawn_resource_thread(parts: ThreadParts) -> JoinHandle<()> {
    let ThreadParts {
        rx,
        loopback,
        events,
        runtime,
        http,
        settings,
    } = parts;

    thread::spawn(move || {
        let mut engine = Engine {
            stream: open_stream(),
            outbox: Outbox::new(events),
            loopback,
            runtime,
            http,
            seq: 0,
            loading: false,
            media: None,
            sink: None,
            offset: Duration::ZERO,
            wants_play: false,
            playing: false,
            completed: false,
        };

        let tick = Duration::from_millis(settings.tick_ms.max(1));
        let mut next_tick = Instant::now() + tick;

        loop {
            let wait = next_tick.saturating_duration_since(Instant::now());
            match rx.recv_timeout(wait) {
                Ok(cmd) => match cmd {
                    ResourceCmd::Attach(generation) => engine.outbox.attach(generation),
                    ResourceCmd::Detach(generation) => engine.outbox.detach(generation),
                    ResourceCmd::SetSource { url } => engine.set_source(url),
                    ResourceCmd::Fetched { seq, result } => engine.on_fetched(seq, result),
                    ResourceCmd::Play => engine.play(),
                    ResourceCmd::Pause => engine.pause(),
                    ResourceCmd::Seek(position) => engine.seek(position),
                    ResourceCmd::Quit { fade_out_ms } => {
                        engine.quit(fade_out_ms);
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    engine.tick();
                    next_tick = Instant::now() + tick;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!("Audio thread exiting");
    })
}
