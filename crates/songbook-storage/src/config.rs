use songbook_config::{CONFIG_BACKEND, ConfigBackend, ConfigError, PATHS, TomlConfigBackend};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
  pub db_path: PathBuf,
  /// Applied with `PRAGMA journal_mode` on every pooled connection.
  pub journal_mode: Option<String>,
  #[serde(default = "default_pool_size")]
  pub pool_size: u32,
  #[serde(default = "default_busy_timeout_ms")]
  pub busy_timeout_ms: u32,
}

fn default_pool_size() -> u32 {
  8
}

fn default_busy_timeout_ms() -> u32 {
  5_000
}

impl Default for StorageConfig {
  fn default() -> Self {
    let db_path = PATHS.data_dir.join("songbook.db");
    StorageConfig::at(db_path)
  }
}

impl StorageConfig {
  /// Defaults for a database at `db_path`, without touching the global paths.
  pub fn at(db_path: impl Into<PathBuf>) -> Self {
    StorageConfig {
      db_path: db_path.into(),
      journal_mode: Some("WAL".to_string()),
      pool_size: default_pool_size(),
      busy_timeout_ms: default_busy_timeout_ms(),
    }
  }

  /// Loads `[storage]` from songbook.toml and writes the effective values back.
  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(&CONFIG_BACKEND)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    self.save_to(&*CONFIG_BACKEND)
  }

  /// Same as [`StorageConfig::load`] against an injected backend.
  pub fn load_from(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    let cfg = backend.load_section_with_default("storage")?;
    backend.save_section("storage", &cfg)?;
    Ok(cfg)
  }

  pub fn save_to<B: ConfigBackend>(&self, backend: &B) -> Result<(), ConfigError> {
    backend.save_section("storage", self)
  }
}
