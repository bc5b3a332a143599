use super::*;
use ratatui::{Terminal, backend::TestBackend};

use crate::catalog::Mood;

fn t(id: &str) -> Track {
    Track {
        track_id: id.into(),
        name: format!("Song {id}"),
        artist: "Artist".into(),
        audio_url: format!("http://audio.test/{id}.mp3"),
        image_url: String::new(),
    }
}

fn screen_text(terminal: &Terminal<TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}

#[test]
fn controls_text_includes_scrub_seconds() {
    let text = controls_text(7);
    assert!(text.contains("[H/L] scrub -/+7s"));
    assert!(text.contains("[tab] switch view"));
    assert!(text.contains("[f] favorite"));
}

#[test]
fn format_mmss_pads_minutes_and_seconds() {
    assert_eq!(format_mmss(Duration::from_secs(0)), "00:00");
    assert_eq!(format_mmss(Duration::from_secs(90)), "01:30");
    assert_eq!(format_mmss(Duration::from_secs(3599)), "59:59");
}

#[test]
fn secs_handles_bad_values() {
    assert_eq!(secs(-3.0), Duration::ZERO);
    assert_eq!(secs(f64::NAN), Duration::ZERO);
    assert_eq!(secs(f64::INFINITY), Duration::ZERO);
    assert_eq!(secs(2.5), Duration::from_millis(2500));
}

#[test]
fn time_text_skips_unknown_total() {
    let ui = UiSettings {
        now_playing_time_fields: vec![TimeField::Elapsed, TimeField::Total, TimeField::Remaining],
        now_playing_time_separator: " / ".into(),
        ..UiSettings::default()
    };
    assert_eq!(
        now_playing_time_text(Duration::from_secs(5), None, &ui).as_deref(),
        Some("00:05")
    );
    assert_eq!(
        now_playing_time_text(Duration::from_secs(5), Some(Duration::from_secs(65)), &ui)
            .as_deref(),
        Some("00:05 / 01:05 / -01:00")
    );
}

#[test]
fn time_text_empty_fields_is_none() {
    let ui = UiSettings {
        now_playing_time_fields: vec![],
        ..UiSettings::default()
    };
    assert_eq!(now_playing_time_text(Duration::ZERO, None, &ui), None);
}

#[test]
fn progress_fraction_maps_inner_columns() {
    // 12 wide box -> 10 inner columns at x = 1..=10
    let area = Rect::new(0, 5, 12, 3);
    let first = progress_fraction(area, 1, 6).unwrap();
    let last = progress_fraction(area, 10, 6).unwrap();
    assert!((first - 0.05).abs() < 1e-9);
    assert!((last - 0.95).abs() < 1e-9);
}

#[test]
fn progress_fraction_is_symmetric_around_the_middle() {
    // 10 inner columns: the two centre cells sit either side of 50%.
    let area = Rect::new(0, 5, 12, 3);
    let left = progress_fraction(area, 5, 6).unwrap();
    let right = progress_fraction(area, 6, 6).unwrap();
    assert!((left - 0.45).abs() < 1e-9);
    assert!((right - 0.55).abs() < 1e-9);
    assert!(((left + right) / 2.0 - 0.5).abs() < 1e-9);

    // 11 inner columns: the centre cell is exactly half way.
    let odd = Rect::new(0, 5, 13, 3);
    assert_eq!(progress_fraction(odd, 6, 6), Some(0.5));
}

#[test]
fn progress_fraction_ignores_border_and_outside_clicks() {
    let area = Rect::new(0, 5, 12, 3);
    assert_eq!(progress_fraction(area, 0, 6), None);
    assert_eq!(progress_fraction(area, 11, 6), None);
    assert_eq!(progress_fraction(area, 5, 5), None);
    assert_eq!(progress_fraction(area, 5, 20), None);
    assert_eq!(progress_fraction(Rect::new(0, 0, 2, 3), 1, 1), None);
}

#[test]
fn layout_places_progress_between_status_and_list() {
    let areas = layout(Rect::new(0, 0, 80, 30));
    assert_eq!(areas.header.height, 3);
    assert!(areas.progress.y > areas.status.y);
    assert!(areas.list.y > areas.progress.y);
    assert_eq!(areas.footer.y + areas.footer.height, 30);
}

#[test]
fn centered_rect_stays_inside_parent() {
    let parent = Rect::new(0, 0, 40, 10);
    let r = centered_rect_sized(72, 9, parent);
    assert!(r.width <= 38);
    assert!(r.height <= 8);
    assert!(r.x >= parent.x && r.right() <= parent.right());
}

#[test]
fn draw_renders_list_hearts_and_notice() {
    let mut app = App::new(View::Favorites, Mood::Calm);
    let g = app.begin_load();
    app.apply_tracks(g, vec![t("1"), t("2")]);
    app.set_notice("could not update favorites");

    let playback = PlaybackState {
        current_track: Some(t("2")),
        playing: true,
        elapsed: 30.0,
        total: Some(120.0),
    };
    let ui = UiSettings::default();
    let controls = ControlsSettings::default();
    let is_favorite = |id: &str| id == "1";
    let ctx = DrawContext {
        playback: &playback,
        phase: PlaybackPhase::Playing,
        is_favorite: &is_favorite,
        ui: &ui,
        controls: &controls,
    };

    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|f| draw(f, &app, &ctx)).unwrap();
    let text = screen_text(&terminal);

    assert!(text.contains("♥ Artist - Song 1"));
    assert!(text.contains("▶ Artist - Song 2"));
    assert!(text.contains("could not update favorites"));
    assert!(text.contains("Playing"));
    assert!(text.contains("25%"));
}

#[test]
fn metadata_text_without_selection() {
    assert_eq!(metadata_text(None, &|_| false), "No track selected");
    let text = metadata_text(Some(&t("9")), &|_| true);
    assert!(text.contains("Id: 9"));
    assert!(text.contains("Favorite: yes"));
    assert!(text.contains("Image: -"));
}
