use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::{App, View};
use crate::audio::RodioResource;
use crate::config;
use crate::error::FavoritesError;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::playback::{PlaybackController, PlaybackPhase, TaggedEvent};
use crate::runtime::mpris_sync::update_mpris;
use crate::runtime::startup::reload_view;
use crate::runtime::tasks::{TaskResult, Tasks};
use crate::ui;

type Controller = PlaybackController<RodioResource>;

/// Channels drained once per loop iteration.
pub struct Channels {
    pub control_tx: Sender<ControlCmd>,
    pub control_rx: Receiver<ControlCmd>,
    pub events_rx: Receiver<TaggedEvent>,
    pub task_rx: Receiver<TaskResult>,
}

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Last-known track id, phase and total as emitted to MPRIS.
    last_track_id: Option<String>,
    last_phase: PlaybackPhase,
    last_total: Option<f64>,
    /// Terminal area of the last draw, for mouse hit-testing.
    last_area: Rect,
}

/// Main terminal event loop: handles input, UI drawing, resource events,
/// task results and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut Controller,
    tasks: &Tasks,
    mpris: &MprisHandle,
    channels: &Channels,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(result) = channels.task_rx.try_recv() {
            handle_task_result(result, app);
        }

        while let Ok(tagged) = channels.events_rx.try_recv() {
            controller.handle_event(tagged);
        }

        sync_now_playing(app, controller, mpris, state);

        let playback = controller.state().clone();
        let is_favorite = |id: &str| tasks.favorites().is_favorite(id);
        let ctx = ui::DrawContext {
            playback: &playback,
            phase: controller.phase(),
            is_favorite: &is_favorite,
            ui: &settings.ui,
            controls: &settings.controls,
        };
        let completed = terminal.draw(|f| ui::draw(f, app, &ctx))?;
        state.last_area = completed.area;

        while let Ok(cmd) = channels.control_rx.try_recv() {
            if handle_control_cmd(cmd, settings, app, controller) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_key_event(
                        key,
                        settings,
                        app,
                        controller,
                        tasks,
                        &channels.control_tx,
                        state,
                    ) {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, controller, state),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Keep MPRIS in sync and let the list cursor follow auto-advance.
fn sync_now_playing(
    app: &mut App,
    controller: &Controller,
    mpris: &MprisHandle,
    state: &mut EventLoopState,
) {
    let snapshot = controller.state();
    let track_id = snapshot.current_track.as_ref().map(|t| t.track_id.clone());
    let phase = controller.phase();

    if track_id == state.last_track_id
        && phase == state.last_phase
        && snapshot.total == state.last_total
    {
        return;
    }

    if track_id != state.last_track_id {
        if let Some(ref id) = track_id {
            app.select_track(id);
        }
    }
    update_mpris(mpris, controller);
    state.last_track_id = track_id;
    state.last_phase = phase;
    state.last_total = snapshot.total;
}

fn favorites_notice(err: &FavoritesError) -> &'static str {
    match err {
        FavoritesError::Conflict { .. } => "already in favorites",
        FavoritesError::NotFound { .. } => "not in favorites",
        FavoritesError::Network(_) => "could not update favorites",
    }
}

pub(super) fn handle_task_result(result: TaskResult, app: &mut App) {
    match result {
        TaskResult::Tracks { generation, result } => match result {
            Ok(tracks) => {
                app.apply_tracks(generation, tracks);
            }
            Err(e) => {
                warn!(error = %e, "Failed to load tracks");
                app.fail_load(generation, "could not load tracks");
            }
        },
        TaskResult::Search { generation, result } => match result {
            Ok(tracks) => {
                let empty = tracks.is_empty();
                if app.apply_tracks(generation, tracks) && empty {
                    app.set_notice("no tracks found");
                }
            }
            Err(e) => {
                warn!(error = %e, "Search failed");
                app.fail_load(generation, "search failed");
            }
        },
        TaskResult::TimeOfDay { generation, result } => match result {
            Ok(r) => {
                app.apply_time_of_day(generation, r);
            }
            Err(e) => {
                warn!(error = %e, "Failed to load time-of-day tracks");
                app.fail_load(generation, "could not load tracks");
            }
        },
        TaskResult::FavoritesRefreshed { generation, result } => match (generation, result) {
            (Some(g), Ok(tracks)) => {
                app.apply_tracks(g, tracks);
            }
            (Some(g), Err(e)) => {
                warn!(error = %e, "Failed to load favorites");
                app.fail_load(g, "could not load favorites");
            }
            (None, Ok(_)) => {}
            (None, Err(e)) => {
                warn!(error = %e, "Background favorites refresh failed");
                app.set_notice("could not load favorites");
            }
        },
        TaskResult::FavoriteAdded(result) => match result {
            Ok(track) => {
                app.set_notice(format!("added \"{}\" to favorites", track.name));
                app.apply_favorite_added(track);
            }
            Err(e) => app.set_notice(favorites_notice(&e)),
        },
        TaskResult::FavoriteRemoved { track_id, result } => match result {
            Ok(()) => {
                app.set_notice("removed from favorites");
                app.apply_favorite_removed(&track_id);
            }
            Err(e) => app.set_notice(favorites_notice(&e)),
        },
    }
}

/// Load the selected track, installing the displayed list as the playlist.
fn play_selected(app: &App, controller: &mut Controller) {
    let Some(track) = app.selected_track().cloned() else {
        return;
    };
    controller.set_playlist(app.tracks.clone());
    controller.load(track);
}

fn quit(settings: &config::Settings, controller: &mut Controller) {
    info!("Shutting down");
    controller.shutdown();
    controller
        .resource()
        .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
}

fn handle_control_cmd(
    cmd: ControlCmd,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut Controller,
) -> bool {
    let has_track = controller.state().current_track.is_some();
    match cmd {
        ControlCmd::Quit => {
            quit(settings, controller);
            return true;
        }
        ControlCmd::Play => {
            if !has_track {
                play_selected(app, controller);
            } else if !controller.state().playing {
                controller.toggle_play_pause();
            }
        }
        ControlCmd::Pause => {
            if controller.state().playing {
                controller.toggle_play_pause();
            }
        }
        ControlCmd::PlayPause => {
            if has_track {
                controller.toggle_play_pause();
            } else {
                play_selected(app, controller);
            }
        }
        ControlCmd::Next => controller.next(),
        ControlCmd::Prev => controller.previous(),
    }
    false
}

fn handle_mouse_event(mouse: MouseEvent, controller: &mut Controller, state: &EventLoopState) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    let areas = ui::layout(state.last_area);
    if let Some(fraction) = ui::progress_fraction(areas.progress, mouse.column, mouse.row) {
        controller.seek_fraction(fraction);
    }
}

fn handle_search_key(key: KeyEvent, app: &mut App, tasks: &Tasks) {
    match key.code {
        KeyCode::Esc => app.exit_search_mode(),
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Enter => {
            if let Some(query) = app.submit_search() {
                if app.view != View::Search {
                    app.set_view(View::Search);
                }
                let generation = app.begin_load();
                tasks.search(generation, query);
            }
        }
        KeyCode::Char(c) => {
            if !c.is_control() {
                app.push_search_char(c);
            }
        }
        _ => {}
    }
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut Controller,
    tasks: &Tasks,
    control_tx: &Sender<ControlCmd>,
    state: &mut EventLoopState,
) -> bool {
    if app.search_mode {
        state.pending_gg = false;
        handle_search_key(key, app, tasks);
        return false;
    }

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => {
            quit(settings, controller);
            return true;
        }
        KeyCode::Tab => {
            app.cycle_view();
            reload_view(app, tasks);
        }
        KeyCode::Char('m') => {
            app.cycle_mood();
            if app.view == View::Mood {
                reload_view(app, tasks);
            }
        }
        KeyCode::Char('r') => reload_view(app, tasks),
        KeyCode::Char('/') => app.enter_search_mode(),
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => {
            let is_playing_selected = controller.state().playing
                && match (app.selected_track(), controller.state().current_track.as_ref()) {
                    (Some(sel), Some(cur)) => sel.same_track(cur),
                    _ => false,
                };
            if !is_playing_selected {
                play_selected(app, controller);
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('L') => controller.seek_by(settings.controls.scrub_seconds as f64),
        KeyCode::Char('H') => controller.seek_by(-(settings.controls.scrub_seconds as f64)),
        KeyCode::Char('f') => {
            if let Some(track) = app.selected_track().cloned() {
                if tasks.favorites().is_favorite(&track.track_id) {
                    tasks.remove_favorite(track.track_id);
                } else {
                    tasks.add_favorite(track);
                }
            }
        }
        KeyCode::Char('K') => app.toggle_metadata_window(),
        KeyCode::Esc => {
            app.metadata_window = false;
            app.clear_notice();
        }
        _ => {}
    }

    false
}
