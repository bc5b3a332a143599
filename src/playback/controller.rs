use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::Track;

use super::cursor;
use super::resource::AudioResource;
use super::types::{
    Generation, PlaybackPhase, PlaybackState, ResourceEvent, SubscriptionSet, TaggedEvent,
};

/// What happened to an event handed to [`PlaybackController::handle_event`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Applied,
    /// Tagged with a superseded generation and dropped.
    Stale,
}

/// Owns the audio resource and keeps [`PlaybackState`] consistent with user
/// transport calls and resource events.
pub struct PlaybackController<R: AudioResource> {
    resource: R,
    state: PlaybackState,
    phase: PlaybackPhase,
    generation: Generation,
    subscriptions: Option<SubscriptionSet>,
    playlist: Arc<[Track]>,
}

impl<R: AudioResource> PlaybackController<R> {
    pub fn new(resource: R) -> Self {
        Self {
            resource,
            state: PlaybackState::default(),
            phase: PlaybackPhase::Empty,
            generation: Generation::default(),
            subscriptions: None,
            playlist: Arc::from(Vec::new()),
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn playlist(&self) -> &[Track] {
        &self.playlist
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    /// Install the ordered list next/previous and auto-advance navigate.
    pub fn set_playlist(&mut self, tracks: impl Into<Arc<[Track]>>) {
        self.playlist = tracks.into();
    }

    /// Replace the current track and request autoplay.
    ///
    /// Resubscribes under a fresh generation so events still in flight from
    /// the previous source are recognised as stale. Autoplay failures are
    /// logged and leave `playing == false`.
    pub fn load(&mut self, track: Track) {
        self.resubscribe();

        info!(
            track_id = %track.track_id,
            generation = self.generation.0,
            "Loading track"
        );
        let url = track.audio_url.clone();
        self.state = PlaybackState {
            current_track: Some(track),
            playing: false,
            elapsed: 0.0,
            total: None,
        };
        self.phase = PlaybackPhase::Loading;

        if let Err(e) = self.resource.set_source(&url) {
            warn!(error = %e, url = %url, "Failed to change audio source");
            self.settle_after_failure();
            return;
        }
        if let Err(e) = self.resource.play() {
            warn!(error = %e, "Autoplay request failed");
            self.settle_after_failure();
        }
    }

    /// Pause when playing, otherwise request playback. No-op without a track.
    pub fn toggle_play_pause(&mut self) {
        if self.state.current_track.is_none() {
            debug!("Ignoring play/pause: no track loaded");
            return;
        }

        let result = if self.state.playing {
            self.resource.pause()
        } else {
            self.resource.play()
        };
        if let Err(e) = result {
            warn!(error = %e, "Play/pause request failed");
        }
    }

    /// Seek to `fraction` (0.0..=1.0) of the known duration.
    pub fn seek_fraction(&mut self, fraction: f64) {
        let Some(total) = self.known_total() else {
            debug!("Ignoring seek: duration not known yet");
            return;
        };
        if !fraction.is_finite() {
            return;
        }
        self.seek_to(fraction.clamp(0.0, 1.0) * total);
    }

    /// Seek to `seconds`, clamped to `[0, total]`.
    ///
    /// Ignored until the resource has reported a finite, non-zero duration.
    pub fn seek_to(&mut self, seconds: f64) {
        let Some(total) = self.known_total() else {
            debug!("Ignoring seek: duration not known yet");
            return;
        };
        if !seconds.is_finite() {
            return;
        }

        let target = seconds.clamp(0.0, total);
        self.state.elapsed = target;
        if let Err(e) = self.resource.seek(target) {
            warn!(error = %e, position = target, "Seek request failed");
        }
    }

    /// Scrub relative to the current position.
    pub fn seek_by(&mut self, delta_seconds: f64) {
        self.seek_to(self.state.elapsed + delta_seconds);
    }

    /// Load the track after the current one. No-op at the end of the list.
    pub fn next(&mut self) {
        if let Some(track) = self.adjacent(cursor::next) {
            self.load(track);
        }
    }

    /// Load the track before the current one. No-op at the start of the list.
    pub fn previous(&mut self) {
        if let Some(track) = self.adjacent(cursor::previous) {
            self.load(track);
        }
    }

    /// Apply one resource event, dropping it if its generation is stale.
    pub fn handle_event(&mut self, tagged: TaggedEvent) -> EventOutcome {
        if tagged.generation != self.generation || self.state.current_track.is_none() {
            debug!(
                event_generation = tagged.generation.0,
                current_generation = self.generation.0,
                kind = ?tagged.event.kind(),
                "Dropping stale resource event"
            );
            return EventOutcome::Stale;
        }

        match tagged.event {
            ResourceEvent::MetadataReady { duration, elapsed } => {
                self.state.total = (duration.is_finite() && duration >= 0.0).then_some(duration);
                self.state.elapsed = self.clamp_elapsed(elapsed);
            }
            ResourceEvent::TimeProgress { elapsed } => {
                self.state.elapsed = self.clamp_elapsed(elapsed);
            }
            ResourceEvent::PlayStarted => {
                self.state.playing = true;
                self.phase = PlaybackPhase::Playing;
            }
            ResourceEvent::Paused => {
                self.state.playing = false;
                self.phase = PlaybackPhase::Paused;
            }
            ResourceEvent::Completed => self.on_completed(),
            ResourceEvent::Failed { reason } => {
                warn!(reason = %reason, "Audio resource unavailable");
                self.settle_after_failure();
            }
        }

        EventOutcome::Applied
    }

    /// Release the resource subscriptions. Also run on drop.
    pub fn shutdown(&mut self) {
        if let Some(subs) = self.subscriptions.take() {
            self.resource.detach(subs);
        }
        self.state.playing = false;
    }

    /// A failed load or a resource failure leaves a loaded but stopped track.
    fn settle_after_failure(&mut self) {
        self.state.playing = false;
        if matches!(self.phase, PlaybackPhase::Loading | PlaybackPhase::Playing) {
            self.phase = PlaybackPhase::Paused;
        }
    }

    fn on_completed(&mut self) {
        self.state.playing = false;

        if let Some(track) = self.adjacent(cursor::next) {
            self.load(track);
            return;
        }

        debug!("End of playlist reached");
        if let Some(total) = self.state.total {
            self.state.elapsed = total;
        }
        self.phase = PlaybackPhase::Paused;
    }

    fn resubscribe(&mut self) {
        if let Some(old) = self.subscriptions.take() {
            self.resource.detach(old);
        }
        self.generation = self.generation.next();
        self.subscriptions = Some(self.resource.attach(self.generation));
    }

    fn adjacent(&self, step: for<'a> fn(&'a [Track], &Track) -> Option<&'a Track>) -> Option<Track> {
        let current = self.state.current_track.as_ref()?;
        step(&self.playlist, current).cloned()
    }

    fn known_total(&self) -> Option<f64> {
        self.state.current_track.as_ref()?;
        self.state.total.filter(|t| t.is_finite() && *t > 0.0)
    }

    fn clamp_elapsed(&self, elapsed: f64) -> f64 {
        let elapsed = if elapsed.is_finite() { elapsed.max(0.0) } else { 0.0 };
        match self.state.total {
            Some(total) => elapsed.min(total),
            None => elapsed,
        }
    }
}

impl<R: AudioResource> Drop for PlaybackController<R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
