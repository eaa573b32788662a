//! In-memory doubles for the ports, shared by the service tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::{NewSong, Song, SongDetail, SongId, SongPatch, SongSummary, UserId, UserSummary};
use crate::errors::CoreError;
use crate::ports::{CollaborationError, CollaborationVerifier, RowMatch, SongRepository};

#[derive(Default)]
struct State {
  songs: HashMap<SongId, Song>,
  users: Vec<UserSummary>,
  grants: HashSet<(SongId, UserId)>,
  ticks: i64,
  broken: Option<String>,
}

/// Mirrors the SQL store closely enough for service-level tests. Every call
/// advances a fake clock by one second.
#[derive(Default)]
pub struct FakeSongRepository {
  state: Mutex<State>,
}

impl FakeSongRepository {
  pub fn add_user(&self, id: &str, username: &str, fullname: &str) {
    self.state.lock().unwrap().users.push(UserSummary {
      id: UserId::from(id),
      username: username.to_owned(),
      fullname: fullname.to_owned(),
    });
  }

  pub fn grant(&self, song_id: &SongId, user_id: &str) {
    self.state.lock().unwrap().grants.insert((song_id.clone(), UserId::from(user_id)));
  }

  pub fn insert(&self, title: &str, owner: &str) -> SongId {
    let new_song = NewSong {
      title: title.to_owned(),
      body: format!("notes about {title}"),
      tags: vec!["jazz".to_owned()],
      performer: None,
      owner: UserId::from(owner),
    };
    self.add_song(&new_song).unwrap()
  }

  /// Every subsequent call fails with a repository error.
  pub fn break_store(&self, reason: &str) {
    self.state.lock().unwrap().broken = Some(reason.to_owned());
  }

  fn with_state<T>(&self, f: impl FnOnce(&mut State, DateTime<Utc>) -> Result<T, CoreError>) -> Result<T, CoreError> {
    let mut state = self.state.lock().unwrap();
    if let Some(reason) = &state.broken {
      return Err(CoreError::Repository(reason.clone()));
    }
    state.ticks += 1;
    let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(state.ticks);
    f(&mut state, now)
  }
}

impl SongRepository for FakeSongRepository {
  fn add_song(&self, song: &NewSong) -> Result<SongId, CoreError> {
    self.with_state(|state, now| {
      let id = SongId::generate();
      state.songs.insert(
        id.clone(),
        Song {
          id: id.clone(),
          title: song.title.clone(),
          body: song.body.clone(),
          tags: song.tags.clone(),
          performer: song.performer.clone(),
          created_at: now,
          updated_at: now,
          owner: song.owner.clone(),
        },
      );
      Ok(id)
    })
  }

  fn list_songs(&self, user: &UserId) -> Result<Vec<SongSummary>, CoreError> {
    self.with_state(|state, _| {
      let mut out: Vec<SongSummary> = state
        .songs
        .values()
        .filter(|s| &s.owner == user || state.grants.contains(&(s.id.clone(), user.clone())))
        .map(|s| SongSummary { id: s.id.clone(), title: s.title.clone(), performer: s.performer.clone() })
        .collect();
      out.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
      Ok(out)
    })
  }

  fn find_song(&self, id: &SongId) -> Result<SongDetail, CoreError> {
    self.with_state(|state, _| {
      let song = state.songs.get(id).cloned().ok_or_else(|| CoreError::song_not_found(id))?;
      let username = state.users.iter().find(|u| u.id == song.owner).map(|u| u.username.clone());
      Ok(SongDetail { song, username })
    })
  }

  fn song_owner(&self, id: &SongId) -> Result<UserId, CoreError> {
    self.with_state(|state, _| {
      state.songs.get(id).map(|s| s.owner.clone()).ok_or_else(|| CoreError::song_not_found(id))
    })
  }

  fn edit_song(&self, id: &SongId, patch: &SongPatch) -> Result<(), CoreError> {
    self.with_state(|state, now| {
      let matched = match state.songs.get_mut(id) {
        Some(song) => {
          song.title = patch.title.clone();
          song.body = patch.body.clone();
          song.tags = patch.tags.clone();
          song.updated_at = now;
          1
        }
        None => 0,
      };
      RowMatch::from_affected(matched).or_song_not_found(id).map(|_| ())
    })
  }

  fn delete_song(&self, id: &SongId) -> Result<(), CoreError> {
    self.with_state(|state, _| {
      let removed = usize::from(state.songs.remove(id).is_some());
      state.grants.retain(|(song_id, _)| song_id != id);
      RowMatch::from_affected(removed).or_song_not_found(id).map(|_| ())
    })
  }

  fn find_users_by_username(&self, fragment: &str) -> Result<Vec<UserSummary>, CoreError> {
    self.with_state(|state, _| Ok(state.users.iter().filter(|u| u.username.contains(fragment)).cloned().collect()))
  }
}

/// Verifier answering from a fixed grant set, or failing every call.
#[derive(Default)]
pub struct FakeCollaborations {
  grants: HashSet<(SongId, UserId)>,
  unavailable: Option<String>,
}

impl FakeCollaborations {
  pub fn with_grant(mut self, song_id: SongId, user_id: UserId) -> Self {
    self.grants.insert((song_id, user_id));
    self
  }

  pub fn unavailable(reason: &str) -> Self {
    Self { grants: HashSet::new(), unavailable: Some(reason.to_owned()) }
  }
}

#[async_trait::async_trait]
impl CollaborationVerifier for FakeCollaborations {
  async fn verify_collaborator(&self, song_id: &SongId, user_id: &UserId) -> Result<(), CollaborationError> {
    if let Some(reason) = &self.unavailable {
      return Err(CollaborationError::Unavailable(reason.clone()));
    }
    if self.grants.contains(&(song_id.clone(), user_id.clone())) {
      Ok(())
    } else {
      Err(CollaborationError::NotCollaborator { song_id: song_id.clone(), user_id: user_id.clone() })
    }
  }
}
