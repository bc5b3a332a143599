use super::*;
use crate::config::TrackDisplayField;

fn track(artist: &str, name: &str) -> Track {
    Track {
        track_id: "1".into(),
        name: name.into(),
        artist: artist.into(),
        audio_url: "http://audio.test/1.mp3".into(),
        image_url: String::new(),
    }
}

#[test]
fn track_deserializes_service_field_names_and_numeric_ids() {
    let json = r#"{
        "id": 12,
        "user_id": "demo_user",
        "track_id": 1532771,
        "name_track": "Sunrise",
        "artist_name": "Aurora",
        "audio_url": "http://audio.test/1532771.mp3",
        "album_image": "http://img.test/1532771.jpg"
    }"#;

    let t: Track = serde_json::from_str(json).unwrap();
    assert_eq!(t.track_id, "1532771");
    assert_eq!(t.name, "Sunrise");
    assert_eq!(t.artist, "Aurora");
    assert_eq!(t.image_url, "http://img.test/1532771.jpg");
}

#[test]
fn track_serializes_back_to_service_field_names() {
    let v = serde_json::to_value(track("Aurora", "Sunrise")).unwrap();
    assert_eq!(v["name_track"], "Sunrise");
    assert_eq!(v["artist_name"], "Aurora");
    assert_eq!(v["album_image"], "");
    assert_eq!(v["track_id"], "1");
}

#[test]
fn display_prefers_artist_dash_name() {
    assert_eq!(track("Aurora", "Sunrise").display(), "Aurora - Sunrise");
    assert_eq!(track("   ", "Sunrise").display(), "Sunrise");
}

#[test]
fn display_from_fields_skips_blank_parts() {
    let t = track("Aurora", "Sunrise");
    assert_eq!(
        display_from_fields(&t, &[TrackDisplayField::Title, TrackDisplayField::Artist], " / "),
        "Sunrise / Aurora"
    );

    let anonymous = track("", "Sunrise");
    assert_eq!(
        display_from_fields(&anonymous, &[TrackDisplayField::Artist], " - "),
        "Sunrise"
    );
}

#[test]
fn mood_keys_and_cycle_cover_the_fixed_set() {
    let keys: Vec<&str> = Mood::ALL.iter().map(|m| m.as_str()).collect();
    assert_eq!(keys, vec!["joy", "calm", "energy", "sadness", "focus"]);

    let mut m = Mood::Joy;
    for _ in 0..Mood::ALL.len() {
        m = m.cycle();
    }
    assert_eq!(m, Mood::Joy);
}

#[test]
fn time_of_day_response_parses() {
    let json = r#"{"tracks": [], "time_of_day": "evening"}"#;
    let r: TimeOfDayTracks = serde_json::from_str(json).unwrap();
    assert_eq!(r.time_of_day, TimeOfDay::Evening);
    assert!(r.tracks.is_empty());
}
