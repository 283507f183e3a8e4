//! File logging for promptsense.
//!
//! The TUI owns the terminal, so log lines go to a daily-rolling file instead.
//! Level is controlled by `PROMPTSENSE_LOG`:
//!
//! ```bash
//! PROMPTSENSE_LOG=debug promptsense
//! PROMPTSENSE_LOG=promptsense_core=trace promptsense
//! ```

use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "promptsense=info,promptsense_core=info,warn";

/// Installs the global subscriber writing to `log_dir/promptsense.log.<date>`.
///
/// # Errors
///
/// Returns `Err` if the log directory cannot be created.
pub fn init(log_dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "promptsense.log");

    let env_filter = EnvFilter::try_from_env("PROMPTSENSE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string())),
        )
        .init();

    tracing::info!(
        log_dir = %log_dir.display(),
        version = env!("CARGO_PKG_VERSION"),
        "promptsense starting"
    );
    Ok(())
}
