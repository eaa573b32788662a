use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};
use diesel::prelude::*;
use tempfile::TempDir;

use songbook_core::domain::SongId;
use songbook_core::ports::Clock;

use crate::SqliteSongStore;
use crate::config::StorageConfig;

/// Clock that moves one second forward on every reading.
#[derive(Debug, Default)]
pub struct SteppingClock {
  ticks: AtomicI64,
}

impl Clock for SteppingClock {
  fn now(&self) -> DateTime<Utc> {
    let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
    Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap() + Duration::seconds(tick)
  }
}

/// A store over a throwaway database file. The directory lives as long as this value.
pub struct TempStore {
  pub store: SqliteSongStore,
  _dir: TempDir,
}

impl TempStore {
  pub fn new() -> Self {
    let dir = TempDir::new().unwrap();
    let mut cfg = StorageConfig::at(dir.path().join("songbook.db"));
    cfg.pool_size = 2;
    let store = SqliteSongStore::open(&cfg).unwrap().with_clock(Arc::new(SteppingClock::default()));
    Self { store, _dir: dir }
  }
}

pub fn seed_user(store: &SqliteSongStore, id: &str, username: &str, fullname: &str) {
  use crate::schema::users;

  let mut conn = store.pool().get().unwrap();
  diesel::insert_into(users::table)
    .values((users::id.eq(id), users::username.eq(username), users::fullname.eq(fullname)))
    .execute(&mut *conn)
    .unwrap();
}

pub fn seed_grant(store: &SqliteSongStore, song_id: &SongId, user_id: &str) {
  use crate::schema::collaborations;

  let mut conn = store.pool().get().unwrap();
  diesel::insert_into(collaborations::table)
    .values((
      collaborations::id.eq(format!("collab-{song_id}-{user_id}")),
      collaborations::song_id.eq(song_id.as_str()),
      collaborations::user_id.eq(user_id),
    ))
    .execute(&mut *conn)
    .unwrap();
}
