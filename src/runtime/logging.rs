use std::fs;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{self, LogSettings};

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber writing to the log file. The terminal
/// belongs to the TUI, so nothing is logged to stdout/stderr.
///
/// Returns the appender guard, which must live until shutdown so buffered
/// lines are flushed. `None` means logging stays disabled.
pub fn init(settings: &LogSettings) -> Option<WorkerGuard> {
    let path = settings
        .file
        .as_deref()
        .map(PathBuf::from)
        .or_else(config::default_log_path)?;
    let dir = path.parent()?.to_path_buf();
    let file_name = path.file_name()?.to_os_string();

    if let Err(e) = fs::create_dir_all(&dir) {
        eprintln!("crescendo: cannot create log directory {}: {e}", dir.display());
        return None;
    }

    let file_appender = tracing_appender::rolling::never(&dir, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.as_deref().unwrap_or(DEFAULT_FILTER)));

    let installed = tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init();

    match installed {
        Ok(()) => Some(guard),
        Err(e) => {
            eprintln!("crescendo: logging disabled: {e}");
            None
        }
    }
}
