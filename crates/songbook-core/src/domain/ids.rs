use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Length of every id produced by [`SongId::generate`].
pub const SONG_ID_LEN: usize = 32;

/// Opaque identifier of a song.
///
/// Ids are generated once on insert and never change afterwards. Ids coming
/// from the outside (a request path, a row) are wrapped as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(String);

impl SongId {
  /// Generates a fresh id: a UUID v4 in its 32 char hex form.
  pub fn generate() -> Self {
    SongId(Uuid::new_v4().simple().to_string())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl From<String> for SongId {
  fn from(s: String) -> Self {
    SongId(s)
  }
}

impl From<&str> for SongId {
  fn from(s: &str) -> Self {
    SongId(s.to_owned())
  }
}

impl fmt::Display for SongId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Identifier of a user. Users live outside this crate, so the id is only
/// carried around and compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl From<String> for UserId {
  fn from(s: String) -> Self {
    UserId(s)
  }
}

impl From<&str> for UserId {
  fn from(s: &str) -> Self {
    UserId(s.to_owned())
  }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
