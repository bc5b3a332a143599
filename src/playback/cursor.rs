//! Playlist cursor: adjacent-track lookup within an externally supplied list.
//!
//! Tracks are matched by `track_id`. There is no wraparound: the ends of the
//! list yield `None`, as does a current track that is not in the list.

use crate::catalog::Track;

fn position(sequence: &[Track], current: &Track) -> Option<usize> {
    sequence.iter().position(|t| t.same_track(current))
}

/// The track after `current`, if any.
pub fn next<'a>(sequence: &'a [Track], current: &Track) -> Option<&'a Track> {
    let pos = position(sequence, current)?;
    sequence.get(pos + 1)
}

/// The track before `current`, if any.
pub fn previous<'a>(sequence: &'a [Track], current: &Track) -> Option<&'a Track> {
    let pos = position(sequence, current)?;
    pos.checked_sub(1).and_then(|p| sequence.get(p))
}
