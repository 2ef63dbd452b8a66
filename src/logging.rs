//! Tracing setup.
//!
//! The TUI owns the terminal, so it logs to daily files under the data
//! directory. CLI subcommands log to stderr. Both filter with `BOOKSHELF_LOG`,
//! falling back to `RUST_LOG`, then `info`.

use color_eyre::Result;
use std::path::{Path, PathBuf};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_ENV: &str = "BOOKSHELF_LOG";
const DEFAULT_DIRECTIVE: &str = "info";
const MAX_LOG_FILES: usize = 7;

fn filter_directive(own: Option<String>, rust_log: Option<String>) -> String {
  own
    .or(rust_log)
    .filter(|directive| !directive.trim().is_empty())
    .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string())
}

fn env_filter() -> EnvFilter {
  let directive = filter_directive(std::env::var(LOG_ENV).ok(), std::env::var("RUST_LOG").ok());
  EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// `<data_dir>/bookshelf/logs`, or `./logs` when there is no data dir
pub fn default_logs_dir() -> PathBuf {
  dirs::data_dir()
    .map(|dir| dir.join("bookshelf"))
    .unwrap_or_else(|| PathBuf::from("."))
    .join("logs")
}

/// Initialize file based logging.
///
/// Files are named `bookshelf.<date>.log`, rotated daily, and at most
/// [`MAX_LOG_FILES`] are kept. Keep the returned guard alive until exit or
/// buffered lines are lost.
pub fn init_file_logging(logs_dir: &Path) -> Result<non_blocking::WorkerGuard> {
  std::fs::create_dir_all(logs_dir)?;

  let file_appender = rolling::Builder::new()
    .rotation(rolling::Rotation::DAILY)
    .max_log_files(MAX_LOG_FILES)
    .filename_prefix("bookshelf")
    .filename_suffix("log")
    .build(logs_dir)?;
  let (writer, guard) = non_blocking(file_appender);

  let file_layer = fmt::layer()
    .with_ansi(false)
    .with_line_number(true)
    .with_writer(writer)
    .with_filter(env_filter());

  tracing_subscriber::registry().with(file_layer).try_init()?;
  Ok(guard)
}

/// Initialize logging to stderr
pub fn init_terminal_logging() -> Result<()> {
  let terminal_layer = fmt::layer()
    .with_writer(std::io::stderr)
    .with_filter(env_filter());
  tracing_subscriber::registry().with(terminal_layer).try_init()?;
  Ok(())
}
