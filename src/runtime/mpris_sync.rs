use crate::mpris::MprisHandle;
use crate::playback::{AudioResource, PlaybackController};

pub fn update_mpris<R: AudioResource>(mpris: &MprisHandle, controller: &PlaybackController<R>) {
    let state = controller.state();
    mpris.set_track_metadata(state.current_track.as_ref(), state.total);
    mpris.set_playback(controller.phase());
}
