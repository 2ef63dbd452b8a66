mod app;
mod cli;
mod commands;
mod config;
mod event;
mod library;
mod logging;
mod query;
mod store;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bookshelf")]
#[command(about = "A personal library manager for the terminal")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./bookshelf.yaml, then $XDG_CONFIG_HOME/bookshelf/config.yaml)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// Where the books are stored
  #[arg(short, long, global = true, value_enum)]
  backend: Option<config::Backend>,

  /// Collection (or SQLite table) holding the books
  #[arg(long, global = true)]
  collection: Option<String>,

  #[command(subcommand)]
  command: Option<cli::Command>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let command = args.command.unwrap_or(cli::Command::Tui);

  // The TUI owns the terminal, so its logs go to a file
  let _log_guard = match command {
    cli::Command::Tui => Some(logging::init_file_logging(&logging::default_logs_dir())?),
    _ => {
      logging::init_terminal_logging()?;
      None
    }
  };

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Command line overrides
  if let Some(backend) = args.backend {
    config.backend = backend;
  }
  if let Some(collection) = args.collection {
    config.collection = collection;
  }

  // The store client is built once and shared from here on
  let store = store::open(&config)?;

  match command {
    cli::Command::Tui => {
      let mut app = app::App::new(config, store);
      app.run().await?;
    }
    command => cli::run(command, store).await?,
  }

  Ok(())
}
