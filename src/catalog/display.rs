use crate::config::TrackDisplayField;

use super::model::Track;

/// Build a display string for `track` according to `fields`, joined by `sep`.
///
/// Blank fields are skipped; when nothing was produced the track name is used.
pub fn display_from_fields(track: &Track, fields: &[TrackDisplayField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        match f {
            TrackDisplayField::Display => {
                let display = track.display();
                if !display.trim().is_empty() {
                    parts.push(display);
                }
            }
            TrackDisplayField::Title => {
                if !track.name.trim().is_empty() {
                    parts.push(track.name.trim().to_string());
                }
            }
            TrackDisplayField::Artist => {
                if !track.artist.trim().is_empty() {
                    parts.push(track.artist.trim().to_string());
                }
            }
        }
    }

    if parts.is_empty() {
        track.name.clone()
    } else {
        parts.join(sep)
    }
}
