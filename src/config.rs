use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_COLLECTION: &str = "library";
pub const DEFAULT_FIRESTORE_ENDPOINT: &str = "https://firestore.googleapis.com/v1/";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Custom title for the header (defaults to "Personal Library")
  pub title: Option<String>,
  pub backend: Backend,
  /// Name of the document collection holding the books
  pub collection: String,
  pub firestore: FirestoreConfig,
  pub sqlite: SqliteConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      title: None,
      backend: Backend::default(),
      collection: DEFAULT_COLLECTION.to_string(),
      firestore: FirestoreConfig::default(),
      sqlite: SqliteConfig::default(),
    }
  }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  /// Cloud Firestore over its REST API
  #[default]
  Firestore,
  /// Local SQLite file
  Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FirestoreConfig {
  /// Path to the service account key file
  pub credentials: Option<PathBuf>,
  /// Firestore database id
  pub database: String,
  /// Project id; defaults to the one in the service account key
  pub project_id: Option<String>,
  /// REST endpoint
  pub endpoint: String,
  /// `host:port` of a local Firestore emulator. When set, requests go there
  /// with the emulator's owner token and no credentials are needed.
  pub emulator_host: Option<String>,
  pub timeout_secs: u64,
}

impl Default for FirestoreConfig {
  fn default() -> Self {
    Self {
      credentials: None,
      database: "(default)".to_string(),
      project_id: None,
      endpoint: DEFAULT_FIRESTORE_ENDPOINT.to_string(),
      emulator_host: None,
      timeout_secs: 30,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
  /// Database file (default: $XDG_DATA_HOME/bookshelf/library.db)
  pub path: Option<PathBuf>,
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./bookshelf.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/bookshelf/config.yaml
  ///
  /// Without any config file the defaults are used.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("bookshelf.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("bookshelf").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  /// Header title
  pub fn display_title(&self) -> &str {
    self.title.as_deref().unwrap_or("Personal Library")
  }

  /// Emulator address from the config, else FIRESTORE_EMULATOR_HOST
  pub fn emulator_host(&self) -> Option<String> {
    self
      .firestore
      .emulator_host
      .clone()
      .or_else(|| std::env::var("FIRESTORE_EMULATOR_HOST").ok())
      .filter(|host| !host.trim().is_empty())
  }

  /// Locate the service account key.
  ///
  /// The config file wins, then BOOKSHELF_CREDENTIALS, then
  /// GOOGLE_APPLICATION_CREDENTIALS.
  pub fn credentials_path(&self) -> Result<PathBuf> {
    if let Some(path) = &self.firestore.credentials {
      return Ok(path.clone());
    }

    std::env::var("BOOKSHELF_CREDENTIALS")
      .or_else(|_| std::env::var("GOOGLE_APPLICATION_CREDENTIALS"))
      .map(PathBuf::from)
      .map_err(|_| {
        eyre!(
          "Firestore credentials not found. Set firestore.credentials in the config, \
           or the BOOKSHELF_CREDENTIALS / GOOGLE_APPLICATION_CREDENTIALS environment variable."
        )
      })
  }
}
