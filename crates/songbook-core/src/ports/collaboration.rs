use crate::domain::{SongId, UserId};

#[derive(Debug, thiserror::Error)]
pub enum CollaborationError {
  #[error("user {user_id} is not a collaborator of song {song_id}")]
  NotCollaborator { song_id: SongId, user_id: UserId },

  #[error("collaboration service unavailable: {0}")]
  Unavailable(String),
}

/// Port over the collaboration service.
///
/// The core only asks one question: does this grant exist? Any `Err` is read
/// as "no", whatever its kind.
#[async_trait::async_trait]
pub trait CollaborationVerifier: Send + Sync {
  async fn verify_collaborator(&self, song_id: &SongId, user_id: &UserId) -> Result<(), CollaborationError>;
}
