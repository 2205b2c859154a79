mod app;
mod cli;
mod commands;
mod config;
mod db;
mod error;
mod event;
mod i18n;
mod loading;
mod logging;
mod network;
mod page;
mod prefs;
mod session;
mod shell;
mod ui;
mod worker;

use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "futbol-total")]
#[command(about = "Futbol Total client with an offline cache worker")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/futbol-total/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Override the app origin
  #[arg(short, long)]
  origin: Option<String>,

  #[command(subcommand)]
  command: Option<Action>,
}

#[derive(Subcommand, Debug)]
enum Action {
  /// Run the terminal app (default)
  App,
  /// Pre-cache the app shell and activate the worker
  Install,
  /// Delete stale cache versions
  Activate,
  /// Fetch a URL through the worker
  Fetch { url: String },
  /// Run one background sync
  Sync,
  /// Show the notification for a push message
  Push { body: Option<String> },
  /// Click a notification, optionally on one of its actions (explore, close)
  Click { id: u64, action: Option<String> },
  /// Set the language preference (es or en)
  Lang { code: String },
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;

  // Override origin if specified on command line
  let config = if let Some(origin) = args.origin {
    config::Config { origin, ..config }
  } else {
    config
  };
  config.origin_url()?;

  let db_path = config.database_path()?;
  let log_dir = db_path
    .parent()
    .ok_or_else(|| eyre!("Invalid database path {}", db_path.display()))?;
  let _guard = logging::init(log_dir)?;

  match args.command.unwrap_or(Action::App) {
    Action::App => {
      let events = event::EventHandler::new(app::TICK_RATE);
      let mut app = app::App::new(config, db_path, events.sender())?;
      app.run(events).await?;
    }
    Action::Install => cli::install(&config, &db_path).await?,
    Action::Activate => cli::activate(&config, &db_path).await?,
    Action::Fetch { url } => cli::fetch(&config, &db_path, &url).await?,
    Action::Sync => cli::sync(&config, &db_path).await?,
    Action::Push { body } => cli::push(&config, &db_path, body).await?,
    Action::Click { id, action } => cli::click(&config, &db_path, id, action).await?,
    Action::Lang { code } => cli::set_language(&db_path, &code)?,
  }

  Ok(())
}
