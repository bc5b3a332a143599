mod api;
mod app;
mod audio;
mod catalog;
mod config;
mod error;
mod favorites;
mod mpris;
mod playback;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
