use tracing::{info, instrument};

use crate::domain::{NewSong, SongDetail, SongId, SongPatch, SongSummary, UserId, UserSummary};
use crate::errors::CoreError;
use crate::ports::{CollaborationVerifier, SongRepository};
use crate::services::access_resolver::{AccessGrant, AccessResolver};

/// Entry point for callers: the store operations plus actor-scoped variants
/// that run the access check first.
pub struct SongService<R, V>
where
  R: SongRepository,
  V: CollaborationVerifier,
{
  access: AccessResolver<R, V>,
}

impl<R, V> SongService<R, V>
where
  R: SongRepository,
  V: CollaborationVerifier,
{
  pub fn new(songs: R, collaborations: V) -> Self {
    Self { access: AccessResolver::new(songs, collaborations) }
  }

  pub fn access(&self) -> &AccessResolver<R, V> {
    &self.access
  }

  fn songs(&self) -> &R {
    self.access.songs()
  }

  // -------- COMMAND (write) --------

  #[instrument(skip(self, song), fields(owner = %song.owner))]
  pub fn add_song(&self, song: &NewSong) -> Result<SongId, CoreError> {
    let id = self.songs().add_song(song)?;
    info!(%id, "song added");
    Ok(id)
  }

  #[instrument(skip(self, patch))]
  pub fn edit_song(&self, id: &SongId, patch: &SongPatch) -> Result<(), CoreError> {
    self.songs().edit_song(id, patch)
  }

  #[instrument(skip(self))]
  pub fn delete_song(&self, id: &SongId) -> Result<(), CoreError> {
    self.songs().delete_song(id)?;
    info!(%id, "song deleted");
    Ok(())
  }

  // -------- QUERY (read) --------

  pub fn list_songs(&self, user: &UserId) -> Result<Vec<SongSummary>, CoreError> {
    self.songs().list_songs(user)
  }

  pub fn get_song(&self, id: &SongId) -> Result<SongDetail, CoreError> {
    self.songs().find_song(id)
  }

  pub fn find_users_by_username(&self, fragment: &str) -> Result<Vec<UserSummary>, CoreError> {
    self.songs().find_users_by_username(fragment)
  }

  // -------- ACCESS --------

  pub fn verify_song_owner(&self, id: &SongId, user: &UserId) -> Result<(), CoreError> {
    self.access.verify_song_owner(id, user)
  }

  pub async fn verify_song_access(&self, id: &SongId, user: &UserId) -> Result<AccessGrant, CoreError> {
    self.access.verify_song_access(id, user).await
  }

  /// Reads a song on behalf of `actor`, who must own it or collaborate on it.
  pub async fn get_song_as(&self, actor: &UserId, id: &SongId) -> Result<SongDetail, CoreError> {
    self.access.verify_song_access(id, actor).await?;
    self.get_song(id)
  }

  /// Edits a song on behalf of `actor`, who must own it or collaborate on it.
  pub async fn edit_song_as(&self, actor: &UserId, id: &SongId, patch: &SongPatch) -> Result<(), CoreError> {
    let grant = self.access.verify_song_access(id, actor).await?;
    self.edit_song(id, patch)?;
    info!(%id, %actor, ?grant, "song edited");
    Ok(())
  }

  /// Deletes a song on behalf of `actor`. Collaborators may not delete.
  pub fn delete_song_as(&self, actor: &UserId, id: &SongId) -> Result<(), CoreError> {
    self.access.verify_song_owner(id, actor)?;
    self.delete_song(id)
  }
}
