pub mod collaboration;
pub mod config;
pub mod models;
pub mod pool;
pub mod schema;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Text;
use tracing::{debug, instrument};

use songbook_core::domain::{NewSong, Song, SongDetail, SongId, SongPatch, SongSummary, UserId, UserSummary};
use songbook_core::errors::CoreError;
use songbook_core::ports::{Clock, RowMatch, SongRepository, SystemClock};

use crate::models::{NewSongRow, SongRow, UserRow};

pub use crate::collaboration::SqliteCollaborationVerifier;
pub use crate::config::StorageConfig;
pub use crate::pool::{SqlitePool, SqlitePooledConnection, open_pool};

/// SQLite implementation of [`SongRepository`].
///
/// Cloning is cheap: clones share the connection pool and the clock.
#[derive(Clone)]
pub struct SqliteSongStore {
  pool: SqlitePool,
  clock: Arc<dyn Clock>,
}

impl SqliteSongStore {
  /// Opens the database from the `[storage]` section of the config file.
  pub fn new_from_config() -> Result<Self, CoreError> {
    let cfg = StorageConfig::load().map_err(|e| CoreError::Repository(e.to_string()))?;
    Self::open(&cfg)
  }

  pub fn open(cfg: &StorageConfig) -> Result<Self, CoreError> {
    Ok(Self::from_pool(open_pool(cfg)?))
  }

  pub fn from_pool(pool: SqlitePool) -> Self {
    Self { pool, clock: Arc::new(SystemClock) }
  }

  pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
    self.clock = clock;
    self
  }

  pub fn pool(&self) -> &SqlitePool {
    &self.pool
  }

  fn conn(&self) -> Result<SqlitePooledConnection, CoreError> {
    self.pool.get().map_err(|e| CoreError::Repository(e.to_string()))
  }

  fn now(&self) -> String {
    format_timestamp(self.clock.now())
  }
}

fn repo_err(e: DieselError) -> CoreError {
  CoreError::Repository(e.to_string())
}

/// RFC 3339, UTC, millisecond precision: `2024-05-01T10:00:00.000Z`.
fn format_timestamp(ts: DateTime<Utc>) -> String {
  ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, CoreError> {
  DateTime::parse_from_rfc3339(raw)
    .map(|ts| ts.with_timezone(&Utc))
    .map_err(|e| CoreError::Repository(format!("invalid timestamp {raw:?}: {e}")))
}

fn encode_tags(tags: &[String]) -> Result<String, CoreError> {
  serde_json::to_string(tags).map_err(|e| CoreError::Repository(format!("encode tags: {e}")))
}

fn decode_tags(raw: &str) -> Result<Vec<String>, CoreError> {
  serde_json::from_str(raw).map_err(|e| CoreError::Repository(format!("invalid tags {raw:?}: {e}")))
}

fn row_to_song(row: SongRow) -> Result<Song, CoreError> {
  Ok(Song {
    id: SongId::from(row.id),
    title: row.title,
    body: row.body,
    tags: decode_tags(&row.tags)?,
    performer: row.performer,
    created_at: parse_timestamp(&row.created_at)?,
    updated_at: parse_timestamp(&row.updated_at)?,
    owner: UserId::from(row.owner),
  })
}

fn row_to_user(row: UserRow) -> UserSummary {
  UserSummary { id: UserId::from(row.id), username: row.username, fullname: row.fullname }
}

impl SongRepository for SqliteSongStore {
  #[instrument(skip(self, song), fields(owner = %song.owner), err)]
  fn add_song(&self, song: &NewSong) -> Result<SongId, CoreError> {
    use crate::schema::songs;

    let id = SongId::generate();
    let now = self.now();
    let new_row = NewSongRow {
      id: id.as_str(),
      title: &song.title,
      body: &song.body,
      tags: encode_tags(&song.tags)?,
      performer: song.performer.as_deref(),
      created_at: now.clone(),
      updated_at: now,
      owner: song.owner.as_str(),
    };
    let mut conn = self.conn()?;

    let inserted = diesel::insert_into(songs::table)
      .values(&new_row)
      .returning(songs::id)
      .get_result::<String>(&mut *conn)
      .optional()
      .map_err(|e| match e {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
          CoreError::NotFound { entity: "user", id: song.owner.to_string() }
        }
        other => repo_err(other),
      })?;

    match inserted {
      Some(inserted) if !inserted.is_empty() => {
        debug!(id = %inserted, "song row inserted");
        Ok(SongId::from(inserted))
      }
      _ => Err(CoreError::PersistenceInvariant(format!("insert of song {id} returned no id"))),
    }
  }

  #[instrument(skip(self), err)]
  fn list_songs(&self, user: &UserId) -> Result<Vec<SongSummary>, CoreError> {
    use crate::schema::{collaborations, songs};

    let mut conn = self.conn()?;

    // IN (subselect) keeps each song once, however many grants match.
    let granted =
      collaborations::table.filter(collaborations::user_id.eq(user.as_str())).select(collaborations::song_id);

    let rows = songs::table
      .filter(songs::owner.eq(user.as_str()).or(songs::id.eq_any(granted)))
      .select((songs::id, songs::title, songs::performer))
      .order((songs::title.asc(), songs::id.asc()))
      .load::<(String, String, Option<String>)>(&mut *conn)
      .map_err(repo_err)?;

    Ok(
      rows
        .into_iter()
        .map(|(id, title, performer)| SongSummary { id: SongId::from(id), title, performer })
        .collect(),
    )
  }

  #[instrument(skip(self), err)]
  fn find_song(&self, song_id: &SongId) -> Result<SongDetail, CoreError> {
    use crate::schema::{songs, users};

    let mut conn = self.conn()?;

    let (row, username) = songs::table
      .left_join(users::table)
      .filter(songs::id.eq(song_id.as_str()))
      .select((songs::all_columns, users::username.nullable()))
      .first::<(SongRow, Option<String>)>(&mut *conn)
      .optional()
      .map_err(repo_err)?
      .ok_or_else(|| CoreError::song_not_found(song_id))?;

    Ok(SongDetail { song: row_to_song(row)?, username })
  }

  #[instrument(skip(self), err)]
  fn song_owner(&self, song_id: &SongId) -> Result<UserId, CoreError> {
    use crate::schema::songs;

    let mut conn = self.conn()?;

    songs::table
      .find(song_id.as_str())
      .select(songs::owner)
      .first::<String>(&mut *conn)
      .optional()
      .map_err(repo_err)?
      .map(UserId::from)
      .ok_or_else(|| CoreError::song_not_found(song_id))
  }

  #[instrument(skip(self, patch), err)]
  fn edit_song(&self, song_id: &SongId, patch: &SongPatch) -> Result<(), CoreError> {
    use crate::schema::songs;

    let tags = encode_tags(&patch.tags)?;
    let now = self.now();
    let mut conn = self.conn()?;

    let affected = diesel::update(songs::table.find(song_id.as_str()))
      .set((
        songs::title.eq(patch.title.as_str()),
        songs::body.eq(patch.body.as_str()),
        songs::tags.eq(tags),
        songs::updated_at.eq(now),
      ))
      .execute(&mut *conn)
      .map_err(repo_err)?;

    RowMatch::from_affected(affected).or_song_not_found(song_id)?;
    Ok(())
  }

  #[instrument(skip(self), err)]
  fn delete_song(&self, song_id: &SongId) -> Result<(), CoreError> {
    use crate::schema::songs;

    let mut conn = self.conn()?;

    let affected = diesel::delete(songs::table.find(song_id.as_str())).execute(&mut *conn).map_err(repo_err)?;

    RowMatch::from_affected(affected).or_song_not_found(song_id)?;
    Ok(())
  }

  #[instrument(skip(self), err)]
  fn find_users_by_username(&self, fragment: &str) -> Result<Vec<UserSummary>, CoreError> {
    let mut conn = self.conn()?;

    // instr() is case-sensitive, unlike LIKE on SQLite.
    let rows = diesel::sql_query("SELECT id, username, fullname FROM users WHERE instr(username, ?) > 0 ORDER BY username")
      .bind::<Text, _>(fragment)
      .load::<UserRow>(&mut *conn)
      .map_err(repo_err)?;

    Ok(rows.into_iter().map(row_to_user).collect())
  }
}
