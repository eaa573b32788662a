use tracing::{debug, instrument};

use crate::domain::{SongId, UserId};
use crate::errors::CoreError;
use crate::ports::{CollaborationError, CollaborationVerifier, SongRepository};

/// Authority under which access was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessGrant {
  Owner,
  Collaborator,
}

/// Why access was refused once both authorities said no.
#[derive(Debug)]
pub struct Denial {
  /// The `Authorization` error of the ownership check. This is what callers see.
  pub ownership: CoreError,
  /// What the collaboration verifier answered. Kept for diagnostics only.
  pub collaboration: CollaborationError,
}

impl Denial {
  pub fn into_error(self) -> CoreError {
    self.ownership
  }
}

/// Result of resolving access for a (song, user) pair.
#[derive(Debug)]
pub enum AccessDecision {
  Owner,
  Collaborator,
  Denied(Denial),
}

impl AccessDecision {
  pub fn is_granted(&self) -> bool {
    !matches!(self, AccessDecision::Denied(_))
  }
}

/// Decides whether a user may act on a song.
///
/// Ownership is checked first. A missing song short-circuits with
/// `NotFound`; a wrong owner falls back once to the collaboration verifier.
/// If that also fails the ownership error is the one surfaced, whatever the
/// verifier reported.
pub struct AccessResolver<R, V>
where
  R: SongRepository,
  V: CollaborationVerifier,
{
  songs: R,
  collaborations: V,
}

impl<R, V> AccessResolver<R, V>
where
  R: SongRepository,
  V: CollaborationVerifier,
{
  pub fn new(songs: R, collaborations: V) -> Self {
    Self { songs, collaborations }
  }

  pub fn songs(&self) -> &R {
    &self.songs
  }

  /// `NotFound` if the song is missing, `Authorization` if `user_id` is not its owner.
  #[instrument(skip(self), level = "debug")]
  pub fn verify_song_owner(&self, song_id: &SongId, user_id: &UserId) -> Result<(), CoreError> {
    let owner = self.songs.song_owner(song_id)?;

    if &owner != user_id {
      return Err(CoreError::Authorization(format!("user {user_id} may not access song {song_id}")));
    }

    Ok(())
  }

  /// The ownership read goes through the synchronous [`SongRepository`] on the
  /// calling task and may block it for up to the store's busy timeout; only the
  /// collaborator check is awaited.
  #[instrument(skip(self), level = "debug")]
  pub async fn resolve_access(&self, song_id: &SongId, user_id: &UserId) -> Result<AccessDecision, CoreError> {
    // Only an authorization failure is eligible for the fallback.
    let ownership = match self.verify_song_owner(song_id, user_id) {
      Ok(()) => return Ok(AccessDecision::Owner),
      Err(err) if err.is_authorization() => err,
      Err(err) => return Err(err),
    };

    match self.collaborations.verify_collaborator(song_id, user_id).await {
      Ok(()) => Ok(AccessDecision::Collaborator),
      Err(collaboration) => Ok(AccessDecision::Denied(Denial { ownership, collaboration })),
    }
  }

  /// Succeeds iff `user_id` owns the song or is a verified collaborator on it.
  /// Blocks on the ownership read like [`AccessResolver::resolve_access`].
  pub async fn verify_song_access(&self, song_id: &SongId, user_id: &UserId) -> Result<AccessGrant, CoreError> {
    match self.resolve_access(song_id, user_id).await? {
      AccessDecision::Owner => Ok(AccessGrant::Owner),
      AccessDecision::Collaborator => Ok(AccessGrant::Collaborator),
      AccessDecision::Denied(denial) => {
        // The verifier's reason is dropped here, including a NotFound coming
        // from a misconfigured collaboration service.
        debug!(%song_id, %user_id, reason = %denial.collaboration, "collaboration check failed");
        Err(denial.into_error())
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::{FakeCollaborations, FakeSongRepository};

  fn fixture() -> (FakeSongRepository, SongId) {
    let repo = FakeSongRepository::default();
    repo.add_user("owner", "owner", "Song Owner");
    repo.add_user("friend", "friend", "Friendly Collaborator");
    repo.add_user("stranger", "stranger", "Complete Stranger");
    let id = repo.insert("Blue in Green", "owner");
    (repo, id)
  }

  #[tokio::test]
  async fn owner_is_granted_without_asking_the_verifier() {
    let (repo, id) = fixture();
    let resolver = AccessResolver::new(repo, FakeCollaborations::unavailable("must not be called"));

    let grant = resolver.verify_song_access(&id, &UserId::from("owner")).await.unwrap();
    assert_eq!(grant, AccessGrant::Owner);
  }

  #[tokio::test]
  async fn stranger_gets_authorization_error() {
    let (repo, id) = fixture();
    let resolver = AccessResolver::new(repo, FakeCollaborations::default());

    let err = resolver.verify_song_access(&id, &UserId::from("stranger")).await.unwrap_err();
    assert!(err.is_authorization(), "unexpected error: {err}");
  }

  #[tokio::test]
  async fn collaborator_is_granted() {
    let (repo, id) = fixture();
    let verifier = FakeCollaborations::default().with_grant(id.clone(), UserId::from("friend"));
    let resolver = AccessResolver::new(repo, verifier);

    let grant = resolver.verify_song_access(&id, &UserId::from("friend")).await.unwrap();
    assert_eq!(grant, AccessGrant::Collaborator);
  }

  #[tokio::test]
  async fn missing_song_is_not_found_even_with_a_grant() {
    let (repo, _) = fixture();
    let ghost = SongId::from("no-such-song");
    let verifier = FakeCollaborations::default().with_grant(ghost.clone(), UserId::from("friend"));
    let resolver = AccessResolver::new(repo, verifier);

    let err = resolver.verify_song_access(&ghost, &UserId::from("friend")).await.unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err}");
  }

  #[tokio::test]
  async fn verifier_failure_surfaces_the_ownership_error() {
    let (repo, id) = fixture();
    let resolver = AccessResolver::new(repo, FakeCollaborations::unavailable("connection refused"));

    let err = resolver.verify_song_access(&id, &UserId::from("friend")).await.unwrap_err();
    match err {
      CoreError::Authorization(msg) => assert!(msg.contains(id.as_str())),
      other => panic!("expected authorization error, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn denial_keeps_both_reasons() {
    let (repo, id) = fixture();
    let resolver = AccessResolver::new(repo, FakeCollaborations::default());

    let decision = resolver.resolve_access(&id, &UserId::from("stranger")).await.unwrap();
    let denial = match decision {
      AccessDecision::Denied(denial) => denial,
      other => panic!("expected a denial, got {other:?}"),
    };
    assert!(denial.ownership.is_authorization());
    assert!(matches!(denial.collaboration, CollaborationError::NotCollaborator { .. }));
  }

  #[test]
  fn verify_song_owner_distinguishes_missing_and_foreign_songs() {
    let (repo, id) = fixture();
    let resolver = AccessResolver::new(repo, FakeCollaborations::default());

    assert!(resolver.verify_song_owner(&id, &UserId::from("owner")).is_ok());
    assert!(resolver.verify_song_owner(&id, &UserId::from("friend")).unwrap_err().is_authorization());
    assert!(resolver.verify_song_owner(&SongId::from("nope"), &UserId::from("owner")).unwrap_err().is_not_found());
  }

  #[tokio::test]
  async fn store_failures_are_not_retried_through_the_verifier() {
    let (repo, id) = fixture();
    repo.break_store("disk I/O error");
    let verifier = FakeCollaborations::default().with_grant(id.clone(), UserId::from("friend"));
    let resolver = AccessResolver::new(repo, verifier);

    let err = resolver.verify_song_access(&id, &UserId::from("friend")).await.unwrap_err();
    assert!(matches!(err, CoreError::Repository(_)));
  }
}
