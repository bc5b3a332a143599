use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::api::{HttpApi, download_client};
use crate::app::App;
use crate::audio;
use crate::favorites::FavoritesStore;
use crate::mpris::{ControlCmd, spawn_mpris};
use crate::playback::PlaybackController;

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;
mod startup;
mod tasks;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_warning) = settings::load_settings();
    logging::configure_logging(&settings.logging, settings.log_file_path().as_deref());
    if let Some(msg) = settings_warning {
        warn!("{msg}");
    }
    info!(base_url = %settings.api.base_url, user_id = %settings.api.user_id, "moodwave starting");

    // Network work runs here; the UI thread never enters the runtime.
    let runtime = tokio::runtime::Runtime::new()?;

    let api = Arc::new(HttpApi::new(&settings.api)?);
    let favorites = Arc::new(FavoritesStore::new(
        api.as_ref().clone(),
        settings.api.user_id.clone(),
    ));
    let (task_tx, task_rx) = mpsc::channel();
    let tasks = tasks::Tasks::new(runtime.handle().clone(), api.clone(), favorites, task_tx);

    let downloads = download_client(&settings.api, settings.audio.download_timeout_secs)?;
    let (resource, events_rx) = audio::spawn(&settings.audio, runtime.handle().clone(), downloads);
    let mut controller = PlaybackController::new(resource);

    let mut app = App::new(settings.browse.start_view.into(), settings.browse.default_mood);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = spawn_mpris(control_tx.clone());
    mpris_sync::update_mpris(&mpris, &controller);

    startup::start(&mut app, &tasks);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let channels = event_loop::Channels {
        control_tx,
        control_rx,
        events_rx,
        task_rx,
    };
    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut controller,
        &tasks,
        &mpris,
        &channels,
        &mut state,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    tasks.favorites().clear();
    drop(controller);
    runtime.shutdown_timeout(Duration::from_millis(500));
    info!("moodwave stopped");

    run_result
}
