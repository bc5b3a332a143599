use super::*;
use std::sync::mpsc;

fn make_track() -> Track {
    Track {
        track_id: "abc-42".to_string(),
        name: "Test Title".to_string(),
        artist: "Test Artist".to_string(),
        audio_url: "http://audio.test/42.mp3".to_string(),
        image_url: "http://img.test/42.jpg".to_string(),
    }
}

fn iface() -> (PlayerIface, Arc<Mutex<SharedState>>, mpsc::Receiver<ControlCmd>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };
    (iface, state, rx)
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };

    handle.set_track_metadata(Some(&make_track()), Some(1.5));
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist, vec!["Test Artist".to_string()]);
        assert_eq!(s.art_url.as_deref(), Some("http://img.test/42.jpg"));
        assert_eq!(s.url.as_deref(), Some("http://audio.test/42.mp3"));
        assert_eq!(s.length_micros, Some(1_500_000));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/moodwave/track/abc_42")
        );
    }

    handle.set_track_metadata(None, None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.art_url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn unknown_length_is_omitted() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };
    handle.set_track_metadata(Some(&make_track()), Some(f64::INFINITY));
    assert_eq!(state.lock().unwrap().length_micros, None);
}

#[test]
fn track_path_is_a_valid_object_path_for_odd_ids() {
    for id in ["", "42", "ü/ß", "a b"] {
        assert!(track_object_path(id).is_some(), "id {id:?}");
    }
}

#[test]
fn playback_status_maps_phase_to_mpris_strings() {
    let (iface, state, _rx) = iface();

    for (phase, expected) in [
        (PlaybackPhase::Empty, "Stopped"),
        (PlaybackPhase::Loading, "Paused"),
        (PlaybackPhase::Playing, "Playing"),
        (PlaybackPhase::Paused, "Paused"),
    ] {
        state.lock().unwrap().playback = phase;
        assert_eq!(iface.playback_status(), expected);
    }
}

#[test]
fn stop_is_forwarded_as_pause() {
    let (iface, _state, rx) = iface();
    iface.stop();
    iface.play_pause();
    assert_eq!(rx.try_recv().unwrap(), ControlCmd::Pause);
    assert_eq!(rx.try_recv().unwrap(), ControlCmd::PlayPause);
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (iface, state, _rx) = iface();
    let handle = MprisHandle { state };
    handle.set_track_metadata(Some(&make_track()), Some(42.0));

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:url",
        "mpris:artUrl",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}
