use crate::domain::ids::{SongId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A song (a.k.a. note) as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
  pub id: SongId,
  pub title: String,
  pub body: String,
  /// Free-form labels, in the order they were given.
  pub tags: Vec<String>,
  /// Optional credit shown in listings. Set on creation only.
  pub performer: Option<String>,
  pub created_at: DateTime<Utc>,
  /// Never earlier than `created_at`.
  pub updated_at: DateTime<Utc>,
  /// Fixed at creation.
  pub owner: UserId,
}

/// A song together with its owner's username.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongDetail {
  #[serde(flatten)]
  pub song: Song,
  /// `None` when the owner row could not be joined.
  pub username: Option<String>,
}

/// Projection used by listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongSummary {
  pub id: SongId,
  pub title: String,
  pub performer: Option<String>,
}

/// Input of `add_song`. Id and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSong {
  pub title: String,
  pub body: String,
  pub tags: Vec<String>,
  #[serde(default)]
  pub performer: Option<String>,
  pub owner: UserId,
}

/// The editable part of a song. Applying it also bumps `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongPatch {
  pub title: String,
  pub body: String,
  pub tags: Vec<String>,
}
