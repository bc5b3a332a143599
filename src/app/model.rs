//! Application model types: `App` and `View`.
//!
//! The `App` struct holds the displayed track list, the selection, the
//! active view and the one-line notice used by the UI and runtime. Playback
//! state lives in the controller, not here.

use crate::catalog::{Mood, TimeOfDay, TimeOfDayTracks, Track};
use crate::config::StartView;

/// Which list the main pane shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum View {
    Mood,
    TimeOfDay,
    Search,
    Favorites,
}

impl View {
    pub const ALL: [View; 4] = [View::Mood, View::TimeOfDay, View::Search, View::Favorites];

    pub fn label(self) -> &'static str {
        match self {
            View::Mood => "Mood",
            View::TimeOfDay => "Time of day",
            View::Search => "Search",
            View::Favorites => "Favorites",
        }
    }

    /// Next view in tab order, wrapping around.
    pub fn cycle(self) -> Self {
        let pos = Self::ALL.iter().position(|&v| v == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&v| v == self).unwrap_or(0)
    }
}

impl From<StartView> for View {
    fn from(v: StartView) -> Self {
        match v {
            StartView::Mood => View::Mood,
            StartView::TimeOfDay => View::TimeOfDay,
            StartView::Favorites => View::Favorites,
        }
    }
}

/// The main application model.
pub struct App {
    pub view: View,
    pub mood: Mood,
    pub tracks: Vec<Track>,
    pub selected: usize,
    /// A list fetch for the current view is in flight.
    pub loading: bool,
    /// One-line message shown under the list (errors, confirmations).
    pub notice: Option<String>,
    /// Period reported by the service for the time-of-day view.
    pub time_of_day: Option<TimeOfDay>,

    pub search_mode: bool,
    pub search_query: String,
    /// Query whose results the Search view currently shows.
    pub last_search: Option<String>,

    pub metadata_window: bool,

    list_generation: u64,
}

impl App {
    pub fn new(view: View, mood: Mood) -> Self {
        Self {
            view,
            mood,
            tracks: Vec::new(),
            selected: 0,
            loading: false,
            notice: None,
            time_of_day: None,
            search_mode: false,
            search_query: String::new(),
            last_search: None,
            metadata_window: false,
            list_generation: 0,
        }
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    /// Start a list fetch for the current view. Responses tagged with an
    /// older generation are discarded.
    pub fn begin_load(&mut self) -> u64 {
        self.list_generation += 1;
        self.loading = true;
        self.notice = None;
        self.list_generation
    }

    /// Install a fetched list. Returns false if `generation` is stale.
    pub fn apply_tracks(&mut self, generation: u64, tracks: Vec<Track>) -> bool {
        if generation != self.list_generation {
            return false;
        }
        self.tracks = tracks;
        self.selected = 0;
        self.loading = false;
        true
    }

    pub fn apply_time_of_day(&mut self, generation: u64, result: TimeOfDayTracks) -> bool {
        if !self.apply_tracks(generation, result.tracks) {
            return false;
        }
        self.time_of_day = Some(result.time_of_day);
        true
    }

    /// Record a failed fetch. Returns false if `generation` is stale.
    pub fn fail_load(&mut self, generation: u64, notice: impl Into<String>) -> bool {
        if generation != self.list_generation {
            return false;
        }
        self.loading = false;
        self.notice = Some(notice.into());
        true
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Switch to the next view; the list is emptied until it is fetched.
    pub fn cycle_view(&mut self) {
        self.set_view(self.view.cycle());
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
        self.tracks.clear();
        self.selected = 0;
        self.metadata_window = false;
        // Anything still in flight belonged to the previous view.
        self.list_generation += 1;
        self.loading = false;
    }

    pub fn cycle_mood(&mut self) {
        self.mood = self.mood.cycle();
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.tracks.get(self.selected)
    }

    /// Move selection to the next track, wrapping to the first.
    pub fn next(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.tracks.len();
    }

    /// Move selection to the previous track, wrapping to the last.
    pub fn prev(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        self.selected = match self.selected {
            0 => self.tracks.len() - 1,
            n => n - 1,
        };
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.tracks.len().saturating_sub(1);
    }

    /// Select the track with `track_id` if it is in the displayed list.
    pub fn select_track(&mut self, track_id: &str) -> bool {
        match self.tracks.iter().position(|t| t.track_id == track_id) {
            Some(i) => {
                self.selected = i;
                true
            }
            None => false,
        }
    }

    pub fn enter_search_mode(&mut self) {
        self.search_mode = true;
        self.search_query.clear();
    }

    pub fn exit_search_mode(&mut self) {
        self.search_mode = false;
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_query.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.search_query.pop();
    }

    /// Leave search mode and return the trimmed query, if any.
    pub fn submit_search(&mut self) -> Option<String> {
        self.search_mode = false;
        let query = self.search_query.trim();
        if query.is_empty() {
            return None;
        }
        let query = query.to_string();
        self.last_search = Some(query.clone());
        Some(query)
    }

    /// Reflect a confirmed favorite in the Favorites view (newest first).
    pub fn apply_favorite_added(&mut self, track: Track) {
        if self.view != View::Favorites || self.tracks.iter().any(|t| t.same_track(&track)) {
            return;
        }
        let had_tracks = !self.tracks.is_empty();
        self.tracks.insert(0, track);
        if had_tracks {
            // Keep the same row selected.
            self.selected += 1;
        }
    }

    /// Drop a removed favorite from the Favorites view.
    pub fn apply_favorite_removed(&mut self, track_id: &str) {
        if self.view != View::Favorites {
            return;
        }
        let Some(pos) = self.tracks.iter().position(|t| t.track_id == track_id) else {
            return;
        };
        self.tracks.remove(pos);
        if pos < self.selected || self.selected >= self.tracks.len() {
            self.selected = self.selected.saturating_sub(1);
        }
    }
}
