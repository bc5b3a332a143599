use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Route `tracing` output to `path`, since stdout belongs to the TUI.
///
/// `RUST_LOG` wins over `logging.level`. If the file cannot be opened,
/// logging stays off and a notice goes to stderr before the terminal is
/// taken over.
pub fn configure_logging(settings: &LoggingSettings, path: Option<&Path>) {
    let Some(path) = path else {
        eprintln!("moodwave: no log file location; logging disabled");
        return;
    };

    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("moodwave: cannot open log file {}: {e}; logging disabled", path.display());
            return;
        }
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_line_number(true)
        .try_init();
}
