//! Commands and small handles shared by the audio resource and its thread.

use std::sync::Arc;
use std::sync::mpsc::Sender;

use tracing::trace;

use crate::playback::{Generation, ResourceEvent, TaggedEvent};

/// Downloaded audio kept in memory for decoding and re-seeking.
pub type AudioBytes = Arc<[u8]>;

#[derive(Debug)]
pub enum ResourceCmd {
    /// Start tagging events with this generation.
    Attach(Generation),
    /// Stop emitting events for this generation.
    Detach(Generation),
    /// Stop the current sink and fetch new media.
    SetSource { url: String },
    Play,
    Pause,
    /// Jump to an absolute position in seconds.
    Seek(f64),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
    /// A download finished; `seq` identifies which `SetSource` it belongs to.
    Fetched {
        seq: u64,
        result: Result<AudioBytes, String>,
    },
}

/// Tags outgoing events with the attached generation.
///
/// Nothing is sent while no subscription is attached.
pub(crate) struct Outbox {
    attached: Option<Generation>,
    tx: Sender<TaggedEvent>,
}

impl Outbox {
    pub(crate) fn new(tx: Sender<TaggedEvent>) -> Self {
        Self { attached: None, tx }
    }

    pub(crate) fn attach(&mut self, generation: Generation) {
        self.attached = Some(generation);
    }

    /// Only clears the attachment if `generation` is still the attached one.
    pub(crate) fn detach(&mut self, generation: Generation) {
        if self.attached == Some(generation) {
            self.attached = None;
        }
    }

    #[cfg(test)]
    pub(crate) fn attached(&self) -> Option<Generation> {
        self.attached
    }

    pub(crate) fn emit(&self, event: ResourceEvent) {
        let Some(generation) = self.attached else {
            trace!(kind = ?event.kind(), "No subscription attached; dropping event");
            return;
        };
        // The receiver going away means the UI is shutting down.
        let _ = self.tx.send(TaggedEvent { generation, event });
    }
}
