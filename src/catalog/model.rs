use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A playable track as returned by the service.
///
/// Field names on the wire follow the service (`name_track`, `artist_name`,
/// `album_image`); `track_id` may arrive as a string or a number and is
/// normalised to a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    #[serde(deserialize_with = "string_or_number")]
    pub track_id: String,
    #[serde(rename = "name_track")]
    pub name: String,
    #[serde(rename = "artist_name")]
    pub artist: String,
    pub audio_url: String,
    #[serde(rename = "album_image", default)]
    pub image_url: String,
}

impl Track {
    /// `Artist - Name`, or just the name when the artist is blank.
    pub fn display(&self) -> String {
        let artist = self.artist.trim();
        if artist.is_empty() {
            self.name.clone()
        } else {
            format!("{} - {}", artist, self.name.trim())
        }
    }

    pub fn same_track(&self, other: &Track) -> bool {
        self.track_id == other.track_id
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Uint(n) => n.to_string(),
    })
}

/// The fixed set of moods the service can browse by.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[serde(alias = "happy")]
    Joy,
    #[serde(alias = "relax", alias = "chill")]
    Calm,
    #[serde(alias = "energetic")]
    Energy,
    #[serde(alias = "sad")]
    Sadness,
    #[serde(alias = "concentration")]
    Focus,
}

impl Default for Mood {
    fn default() -> Self {
        Self::Joy
    }
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Joy,
        Mood::Calm,
        Mood::Energy,
        Mood::Sadness,
        Mood::Focus,
    ];

    /// The key sent to the service.
    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Joy => "joy",
            Mood::Calm => "calm",
            Mood::Energy => "energy",
            Mood::Sadness => "sadness",
            Mood::Focus => "focus",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mood::Joy => "Joy",
            Mood::Calm => "Calm",
            Mood::Energy => "Energy",
            Mood::Sadness => "Sadness",
            Mood::Focus => "Focus",
        }
    }

    /// Next mood in display order, wrapping around.
    pub fn cycle(self) -> Self {
        let pos = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Period of the day reported by the service for its time-based collection.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn label(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
            TimeOfDay::Night => "Night",
        }
    }
}

/// Response of the time-of-day collection endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeOfDayTracks {
    pub tracks: Vec<Track>,
    pub time_of_day: TimeOfDay,
}
