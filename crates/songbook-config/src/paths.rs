use directories::ProjectDirs;
use std::path::PathBuf;
use thiserror::Error;

/// Overrides the platform directories; everything lands under this base.
pub const BASE_DIR_ENV: &str = "SONGBOOK_BASE_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("toml encode error: {0}")]
  Encode(#[from] toml::ser::Error),
  #[error("toml document error: {0}")]
  Document(#[from] toml_edit::TomlError),
  #[error("missing section [{section}] in {path:?}")]
  MissingSection { section: String, path: PathBuf },
  #[error("decode section [{section}]: {source}")]
  Decode { section: String, source: toml::de::Error },
  #[error("directories error: could not determine home directory")]
  Directories,
}

#[derive(Debug, Clone)]
pub struct SongbookPaths {
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
}

impl SongbookPaths {
  pub fn new() -> Result<Self, ConfigError> {
    if let Ok(env_base) = std::env::var(BASE_DIR_ENV) {
      return Self::rooted_at(env_base);
    }

    let proj_dirs = ProjectDirs::from("com", "songbook", "songbook").ok_or(ConfigError::Directories)?;
    Self::with_dirs(proj_dirs.config_dir().to_path_buf(), proj_dirs.data_dir().to_path_buf())
  }

  /// Paths rooted at an explicit directory, ignoring the environment.
  pub fn rooted_at(base: impl Into<PathBuf>) -> Result<Self, ConfigError> {
    let base: PathBuf = base.into();
    Self::with_dirs(base.join("config"), base.join("data"))
  }

  fn with_dirs(config_dir: PathBuf, data_dir: PathBuf) -> Result<Self, ConfigError> {
    std::fs::create_dir_all(&config_dir)?;
    std::fs::create_dir_all(&data_dir)?;

    Ok(Self { config_dir, data_dir })
  }

  pub fn detect() -> Result<Self, ConfigError> {
    Self::new()
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join("songbook.toml")
  }
}
