//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Padding, Paragraph, Tabs, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{App, View};
use crate::catalog::{Track, display_from_fields};
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::playback::{PlaybackPhase, PlaybackState};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("tab".to_string(), "switch view".to_string());
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("gg/G".to_string(), "top/bottom".to_string());
    map.insert("enter".to_string(), "play selected song".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "prev/next song".to_string());
    // H/L is filled dynamically from config.
    map.insert("m".to_string(), "mood".to_string());
    map.insert("/".to_string(), "search".to_string());
    map.insert("f".to_string(), "favorite".to_string());
    map.insert("r".to_string(), "reload".to_string());
    map.insert("K".to_string(), "metadata".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "tab", "j/k", "h/l", "H/L", "enter", "space/p", "gg/G", "m", "/", "f", "r", "K", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Seconds as a `Duration`; negative and non-finite values become zero.
fn secs(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_secs_f64(value)
    } else {
        Duration::ZERO
    }
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the now-playing time text (elapsed/total/remaining) per `UiSettings`.
fn now_playing_time_text(
    elapsed: Duration,
    total: Option<Duration>,
    ui: &UiSettings,
) -> Option<String> {
    if ui.now_playing_time_fields.is_empty() {
        return None;
    }

    let mut parts: Vec<String> = Vec::new();
    for f in &ui.now_playing_time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_mmss(elapsed)),
            TimeField::Total => {
                if let Some(t) = total {
                    parts.push(format_mmss(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = total {
                    let rem = t.saturating_sub(elapsed);
                    parts.push(format!("-{}", format_mmss(rem)));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.now_playing_time_separator))
    }
}

fn phase_label(phase: PlaybackPhase) -> &'static str {
    match phase {
        PlaybackPhase::Empty => "Stopped",
        PlaybackPhase::Loading => "Loading",
        PlaybackPhase::Playing => "Playing",
        PlaybackPhase::Paused => "Paused",
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Screen regions, shared by drawing and mouse hit-testing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Areas {
    pub header: Rect,
    pub status: Rect,
    pub progress: Rect,
    pub list: Rect,
    pub notice: Rect,
    pub footer: Rect,
}

pub fn layout(area: Rect) -> Areas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(4),
        ])
        .split(area);
    Areas {
        header: chunks[0],
        status: chunks[1],
        progress: chunks[2],
        list: chunks[3],
        notice: chunks[4],
        footer: chunks[5],
    }
}

/// Map a click inside the bordered progress box to a 0.0..=1.0 fraction.
pub fn progress_fraction(progress: Rect, column: u16, row: u16) -> Option<f64> {
    let inner = Block::default().borders(Borders::ALL).inner(progress);
    if inner.width == 0
        || row < inner.y
        || row >= inner.y + inner.height
        || column < inner.x
        || column >= inner.x + inner.width
    {
        return None;
    }
    // Measure to the centre of the clicked cell.
    let offset = f64::from(column - inner.x) + 0.5;
    Some((offset / f64::from(inner.width)).clamp(0.0, 1.0))
}

fn view_title(app: &App) -> String {
    match app.view {
        View::Mood => format!(" mood: {} ", app.mood.label()),
        View::TimeOfDay => match app.time_of_day {
            Some(tod) => format!(" for the {} ", tod.label().to_lowercase()),
            None => " time of day ".to_string(),
        },
        View::Search => match app.last_search.as_deref() {
            Some(q) => format!(" results for \"{q}\" "),
            None => " search ".to_string(),
        },
        View::Favorites => " favorites ".to_string(),
    }
}

fn metadata_text(track: Option<&Track>, is_favorite: &dyn Fn(&str) -> bool) -> String {
    let Some(track) = track else {
        return "No track selected".to_string();
    };
    let image = if track.image_url.is_empty() {
        "-"
    } else {
        track.image_url.as_str()
    };
    format!(
        "Title: {}\nArtist: {}\nId: {}\nFavorite: {}\nAudio: {}\nImage: {}",
        track.name,
        if track.artist.is_empty() { "-" } else { track.artist.as_str() },
        track.track_id,
        if is_favorite(&track.track_id) { "yes" } else { "no" },
        track.audio_url,
        image,
    )
}

fn left_pad() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Everything `draw` needs besides the app model.
pub struct DrawContext<'a> {
    pub playback: &'a PlaybackState,
    pub phase: PlaybackPhase,
    pub is_favorite: &'a dyn Fn(&str) -> bool,
    pub ui: &'a UiSettings,
    pub controls: &'a ControlsSettings,
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, ctx: &DrawContext<'_>) {
    let areas = layout(frame.area());
    let ui_settings = ctx.ui;

    // Header: view tabs
    let tabs = Tabs::new(View::ALL.iter().map(|v| v.label()))
        .select(app.view.index())
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" moodwave · {} ", ui_settings.header_text))
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(tabs, areas.header);

    // Status box
    let status = {
        let mut parts: Vec<String> = Vec::new();
        match ctx.playback.current_track.as_ref() {
            Some(track) => {
                let song = display_from_fields(
                    track,
                    &ui_settings.now_playing_track_fields,
                    &ui_settings.now_playing_track_separator,
                );
                let time = now_playing_time_text(
                    secs(ctx.playback.elapsed),
                    ctx.playback.total.map(secs),
                    ui_settings,
                );
                if let Some(time) = time {
                    parts.push(format!("Song: {} [{}]", song, time));
                } else {
                    parts.push(format!("Song: {}", song));
                }
                if (ctx.is_favorite)(&track.track_id) {
                    parts.push("♥".to_string());
                }
            }
            None => parts.push("Nothing playing".to_string()),
        }
        parts.push(phase_label(ctx.phase).to_string());
        parts.push(format!("Mood: {}", app.mood.label()));
        if app.search_mode {
            parts.push(format!("SEARCH: {}_", app.search_query));
        }
        parts.join(" • ")
    };
    let status_par = Paragraph::new(status)
        .block(Block::bordered().padding(left_pad()).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, areas.status);

    // Progress bar (click to seek)
    let ratio = ctx.playback.progress().unwrap_or(0.0);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" progress "))
        .gauge_style(Style::default().add_modifier(Modifier::BOLD))
        .ratio(ratio)
        .label(format!("{:.0}%", ratio * 100.0));
    frame.render_widget(gauge, areas.progress);

    // Main list
    {
        let current_id = ctx
            .playback
            .current_track
            .as_ref()
            .map(|t| t.track_id.as_str());

        // Center the selected item when possible by creating a visible window.
        let total = app.tracks.len();
        let list_height = areas.list.height.saturating_sub(2) as usize;
        let sel_pos = app.selected.min(total.saturating_sub(1));
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = sel_pos.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let visible_items: Vec<ListItem> = app.tracks[start..end]
            .iter()
            .map(|t| {
                let heart = if (ctx.is_favorite)(&t.track_id) { "♥ " } else { "  " };
                let marker = if current_id == Some(t.track_id.as_str()) {
                    "▶ "
                } else {
                    ""
                };
                ListItem::new(Line::from(format!("{heart}{marker}{}", t.display())))
            })
            .collect();

        let title = if app.loading {
            format!("{}(loading…) ", view_title(app))
        } else {
            view_title(app)
        };
        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, areas.list, &mut state);
    }

    // Overlay metadata popup (keeps list visible under it)
    if app.metadata_window {
        // Keep the popup inside the list area so it doesn't cover header/status/footer.
        let popup_area = centered_rect_sized(72, 9, areas.list);
        frame.render_widget(Clear, popup_area);

        let meta = metadata_text(app.selected_track(), ctx.is_favorite);
        let meta_paragraph = Paragraph::new(meta)
            .block(
                Block::default()
                    .padding(left_pad())
                    .borders(Borders::ALL)
                    .title(" metadata (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(meta_paragraph, popup_area);
    }

    if let Some(notice) = app.notice.as_deref() {
        frame.render_widget(Paragraph::new(format!(" {notice}")).italic(), areas.notice);
    }

    let footer = Paragraph::new(controls_text(ctx.controls.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_pad()),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, areas.footer);
}

#[cfg(test)]
mod tests;
