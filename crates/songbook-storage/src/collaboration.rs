use async_trait::async_trait;
use diesel::prelude::*;
use diesel::dsl::exists;
use tracing::debug;

use songbook_core::domain::{SongId, UserId};
use songbook_core::ports::{CollaborationError, CollaborationVerifier};

use crate::SqliteSongStore;
use crate::pool::SqlitePool;

/// Answers collaborator checks from the `collaborations` table.
///
/// Read only: grants are written by whoever owns that table.
#[derive(Clone)]
pub struct SqliteCollaborationVerifier {
  pool: SqlitePool,
}

impl SqliteCollaborationVerifier {
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }

  /// Shares the store's pool.
  pub fn for_store(store: &SqliteSongStore) -> Self {
    Self::new(store.pool().clone())
  }
}

fn grant_exists(pool: &SqlitePool, song: &str, user: &str) -> Result<bool, String> {
  use crate::schema::collaborations;

  let mut conn = pool.get().map_err(|e| e.to_string())?;

  diesel::select(exists(
    collaborations::table.filter(collaborations::song_id.eq(song)).filter(collaborations::user_id.eq(user)),
  ))
  .get_result::<bool>(&mut *conn)
  .map_err(|e| e.to_string())
}

#[async_trait]
impl CollaborationVerifier for SqliteCollaborationVerifier {
  async fn verify_collaborator(&self, song_id: &SongId, user_id: &UserId) -> Result<(), CollaborationError> {
    let pool = self.pool.clone();
    let (song, user) = (song_id.clone(), user_id.clone());

    // diesel is blocking; keep it off the async workers.
    let found = tokio::task::spawn_blocking(move || grant_exists(&pool, song.as_str(), user.as_str()))
      .await
      .map_err(|e| CollaborationError::Unavailable(e.to_string()))?
      .map_err(CollaborationError::Unavailable)?;

    debug!(%song_id, %user_id, found, "collaborator lookup");

    if found {
      Ok(())
    } else {
      Err(CollaborationError::NotCollaborator { song_id: song_id.clone(), user_id: user_id.clone() })
    }
  }
}
