use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub store: StoreConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  #[serde(default)]
  pub log: LogConfig,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  /// PostgREST / Supabase over HTTPS
  #[default]
  Rest,
  /// Local SQLite file
  Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
  #[serde(default)]
  pub backend: Backend,
  /// Project root URL, required for the rest backend
  pub url: Option<String>,
  /// Database file for the sqlite backend (defaults under the data dir)
  pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
  /// Seconds before a cached collection is refetched. Absent means never.
  pub ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
  /// EnvFilter directive, e.g. `jobhunt=debug`
  pub filter: Option<String>,
}

impl Config {
  /// Load configuration from `explicit_path`, or from the first file in
  /// [`Config::search_paths`] that exists.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    if let Some(path) = explicit_path {
      return Self::load_from_path(path);
    }

    let candidates = Self::search_paths();
    match candidates.iter().find(|p| p.is_file()) {
      Some(path) => Self::load_from_path(path),
      None => {
        let looked_in: Vec<_> = candidates.iter().map(|p| p.display().to_string()).collect();
        Err(eyre!(
          "No configuration file found (looked in {}).\n\
           Copy config.example.yaml to one of those paths.",
          looked_in.join(", ")
        ))
      }
    }
  }

  /// `./jobhunt.yaml`, then `$XDG_CONFIG_HOME/jobhunt/config.yaml`.
  pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("jobhunt.yaml")];
    if let Some(config_dir) = dirs::config_dir() {
      paths.push(config_dir.join("jobhunt").join("config.yaml"));
    }
    paths
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
      std::io::ErrorKind::NotFound => eyre!("Config file not found: {}", path.display()),
      _ => eyre!("Failed to read config file {}: {}", path.display(), e),
    })?;

    Self::parse(&contents).map_err(|e| eyre!("Invalid config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;
    config.validate()?;
    Ok(config)
  }

  fn validate(&self) -> Result<()> {
    if self.store.backend == Backend::Rest && self.store.url.is_none() {
      return Err(eyre!("store.url is required for the rest backend"));
    }
    Ok(())
  }

  /// Get the store API key from environment variables.
  ///
  /// Checks JOBHUNT_STORE_KEY first, then SUPABASE_ANON_KEY as fallback.
  pub fn get_store_key() -> Result<String> {
    std::env::var("JOBHUNT_STORE_KEY")
      .or_else(|_| std::env::var("SUPABASE_ANON_KEY"))
      .map_err(|_| {
        eyre!("Store API key not found. Set JOBHUNT_STORE_KEY or SUPABASE_ANON_KEY environment variable.")
      })
  }

  /// Base directory for the local database and log files.
  pub fn data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("jobhunt"))
  }

  /// Where the sqlite backend keeps its file.
  pub fn sqlite_path(&self) -> Result<PathBuf> {
    match &self.store.path {
      Some(path) => Ok(path.clone()),
      None => Ok(Self::data_dir()?.join("jobhunt.db")),
    }
  }

  pub fn cache_ttl(&self) -> Option<chrono::Duration> {
    self
      .cache
      .ttl_secs
      .and_then(|secs| i64::try_from(secs).ok())
      .map(chrono::Duration::seconds)
  }
}
