//! Helpers for turning downloaded bytes into `rodio` sinks.
//!
//! Media lives in memory, so seeking rebuilds the sink from the same bytes
//! and skips into the decoded stream.

use std::io::Cursor;
use std::time::Duration;

use lofty::prelude::AudioFile;
use lofty::probe::Probe;
use rodio::{Decoder, OutputStream, Sink, Source};

use super::types::AudioBytes;

type MemoryDecoder = Decoder<Cursor<AudioBytes>>;

fn decoder(bytes: &AudioBytes) -> Result<MemoryDecoder, String> {
    Decoder::new(Cursor::new(bytes.clone())).map_err(|e| format!("failed to decode audio: {e}"))
}

/// Best-effort track length: container properties first, then the decoder.
pub(crate) fn probe_duration(bytes: &AudioBytes) -> Option<Duration> {
    let from_tags = Probe::new(Cursor::new(bytes.clone()))
        .guess_file_type()
        .ok()
        .and_then(|p| p.read().ok())
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero());

    from_tags.or_else(|| decoder(bytes).ok()?.total_duration())
}

/// Create a paused `Sink` for `bytes` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    bytes: &AudioBytes,
    start_at: Duration,
) -> Result<Sink, String> {
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decoder(bytes)?.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}

/// Step count and per-step sleep for a fade of `fade_out_ms`.
pub(crate) fn fade_plan(fade_out_ms: u64) -> (u64, Duration) {
    const STEPS: u64 = 20;
    if fade_out_ms == 0 {
        return (0, Duration::ZERO);
    }
    (STEPS, Duration::from_millis((fade_out_ms / STEPS).max(1)))
}

pub(super) fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    let (steps, step) = fade_plan(fade_out_ms);
    let start = sink.volume();
    for i in 1..=steps {
        let t = i as f32 / steps as f32;
        sink.set_volume(start * (1.0 - t));
        std::thread::sleep(step);
    }
    sink.set_volume(0.0);
}
