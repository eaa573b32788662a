use crate::atomic::atomic_write_str;
use crate::paths::{ConfigError, SongbookPaths};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use tracing::debug;

// toml_edit for writing, so comments in the user's file survive
use toml_edit::{DocumentMut, Item};

fn decode_section<T: DeserializeOwned>(section: &str, table: &toml::Value) -> Result<T, ConfigError> {
  table.clone().try_into().map_err(|source| ConfigError::Decode { section: section.to_owned(), source })
}

pub trait ConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError>;
  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;
}

pub struct TomlConfigBackend {
  paths: SongbookPaths,
}

impl TomlConfigBackend {
  pub fn new(paths: SongbookPaths) -> Self {
    Self { paths }
  }

  pub fn paths(&self) -> &SongbookPaths {
    &self.paths
  }

  /// Like [`ConfigBackend::load_section`], but a missing file or section yields `T::default()`.
  pub fn load_section_with_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default,
  {
    use std::io::ErrorKind;

    let path = self.paths.config_file();
    let content = match std::fs::read_to_string(&path) {
      Ok(c) => c,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        debug!(?path, section, "no config file, using defaults");
        return Ok(T::default());
      }
      Err(e) => return Err(e.into()),
    };

    let toml_val: toml::Value = toml::from_str(&content)?;

    let Some(table) = toml_val.get(section) else {
      debug!(?path, section, "section missing, using defaults");
      return Ok(T::default());
    };

    decode_section(section, table)
  }
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
    let path = self.paths.config_file();
    let content = fs::read_to_string(&path)?;
    let toml_val: toml::Value = toml::from_str(&content)?;

    let table = toml_val
      .get(section)
      .ok_or_else(|| ConfigError::MissingSection { section: section.to_owned(), path: path.clone() })?;

    decode_section(section, table)
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    use std::io::ErrorKind;

    let path = self.paths.config_file();

    // 1) Current file as a DocumentMut, or an empty document.
    let mut doc: DocumentMut = match fs::read_to_string(&path) {
      Ok(content) => content.parse::<DocumentMut>()?,
      Err(e) if e.kind() == ErrorKind::NotFound => DocumentMut::new(),
      Err(e) => return Err(e.into()),
    };

    // 2) Section body through plain serde/toml: "key = value\n..." without a header.
    let section_str = toml::to_string(value)?;

    // 3) Reparse that body as an Item (a table).
    let section_item: Item = section_str.parse::<DocumentMut>()?.into_item();

    // 4) Replace the section in place; the rest of the document is untouched.
    doc[section] = section_item;

    atomic_write_str(&path, &doc.to_string())?;
    debug!(?path, section, "config section saved");

    Ok(())
  }
}
