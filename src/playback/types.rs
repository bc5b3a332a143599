//! Playback snapshot, resource events and generation tagging.

use crate::catalog::Track;

/// Monotonic tag distinguishing successive `load` cycles.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Coarse controller state, derived from `PlaybackState` plus pending requests.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackPhase {
    #[default]
    Empty,
    Loading,
    Playing,
    Paused,
}

/// Snapshot the UI renders. Only the controller writes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackState {
    pub current_track: Option<Track>,
    pub playing: bool,
    /// Seconds since the start of the track.
    pub elapsed: f64,
    /// Track length in seconds, `None` until the resource reports it.
    pub total: Option<f64>,
}

impl PlaybackState {
    /// Elapsed as a fraction of `total`, for progress bars.
    pub fn progress(&self) -> Option<f64> {
        match self.total {
            Some(total) if total.is_finite() && total > 0.0 => {
                Some((self.elapsed / total).clamp(0.0, 1.0))
            }
            _ => None,
        }
    }
}

/// The kinds of events a resource can publish.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    MetadataReady,
    TimeProgress,
    PlayStarted,
    Paused,
    Completed,
    Failed,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        EventKind::MetadataReady,
        EventKind::TimeProgress,
        EventKind::PlayStarted,
        EventKind::Paused,
        EventKind::Completed,
        EventKind::Failed,
    ];
}

/// Events published by an audio resource.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceEvent {
    /// Duration became known; `elapsed` is the position at that moment.
    MetadataReady { duration: f64, elapsed: f64 },
    TimeProgress { elapsed: f64 },
    PlayStarted,
    Paused,
    /// The track played through to its end.
    Completed,
    /// Autoplay refused, media failed to fetch or decode, or no output device.
    Failed { reason: String },
}

impl ResourceEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ResourceEvent::MetadataReady { .. } => EventKind::MetadataReady,
            ResourceEvent::TimeProgress { .. } => EventKind::TimeProgress,
            ResourceEvent::PlayStarted => EventKind::PlayStarted,
            ResourceEvent::Paused => EventKind::Paused,
            ResourceEvent::Completed => EventKind::Completed,
            ResourceEvent::Failed { .. } => EventKind::Failed,
        }
    }
}

/// A resource event stamped with the generation of the subscription it was
/// delivered through.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedEvent {
    pub generation: Generation,
    pub event: ResourceEvent,
}

/// Handle for one `attach` call. Must be given back to `detach`.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a subscription set must be detached"]
pub struct SubscriptionSet {
    generation: Generation,
    kinds: Vec<EventKind>,
}

impl SubscriptionSet {
    /// Subscribe to every event kind under `generation`.
    pub fn all(generation: Generation) -> Self {
        Self {
            generation,
            kinds: EventKind::ALL.to_vec(),
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn kinds(&self) -> &[EventKind] {
        &self.kinds
    }

    pub fn covers(&self, kind: EventKind) -> bool {
        self.kinds.contains(&kind)
    }
}
