use crate::domain::{NewSong, SongDetail, SongId, SongPatch, SongSummary, UserId, UserSummary};
use crate::errors::CoreError;

/// Outcome of a write, derived from the affected-row count.
///
/// `Unmatched` means the targeted row does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMatch {
  Matched(usize),
  Unmatched,
}

impl RowMatch {
  pub fn from_affected(rows: usize) -> Self {
    if rows == 0 { RowMatch::Unmatched } else { RowMatch::Matched(rows) }
  }

  /// `Unmatched` becomes [`CoreError::NotFound`] for the given song.
  pub fn or_song_not_found(self, id: &SongId) -> Result<usize, CoreError> {
    match self {
      RowMatch::Matched(rows) => Ok(rows),
      RowMatch::Unmatched => Err(CoreError::song_not_found(id)),
    }
  }
}

/// Persistence gateway for songs.
///
/// Implementations are expected to be cheap to share between requests
/// (typically a handle over a connection pool). Every method is blocking; async
/// callers that cannot afford a stalled worker run them on a blocking task.
pub trait SongRepository: Send + Sync {
  /// Inserts a song with a freshly generated id and `created_at == updated_at == now`.
  ///
  /// Fails with [`CoreError::PersistenceInvariant`] if the insert yields no id.
  fn add_song(&self, song: &NewSong) -> Result<SongId, CoreError>;

  /// Songs owned by `user` plus songs `user` collaborates on, without duplicates.
  fn list_songs(&self, user: &UserId) -> Result<Vec<SongSummary>, CoreError>;

  /// Full song joined with its owner's username.
  fn find_song(&self, id: &SongId) -> Result<SongDetail, CoreError>;

  /// Owner of the song. [`CoreError::NotFound`] if the song does not exist.
  fn song_owner(&self, id: &SongId) -> Result<UserId, CoreError>;

  /// Replaces title, body and tags and bumps `updated_at`.
  fn edit_song(&self, id: &SongId, patch: &SongPatch) -> Result<(), CoreError>;

  fn delete_song(&self, id: &SongId) -> Result<(), CoreError>;

  /// Case-sensitive substring search over usernames. Empty when nothing matches.
  fn find_users_by_username(&self, fragment: &str) -> Result<Vec<UserSummary>, CoreError>;
}
