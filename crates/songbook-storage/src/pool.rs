use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use songbook_core::errors::CoreError;

use crate::config::StorageConfig;

pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;
pub type SqlitePooledConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Per-connection pragmas, applied each time the pool hands a connection out.
#[derive(Debug)]
struct ConnectionOptions {
  journal_mode: Option<String>,
  busy_timeout_ms: u32,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
  fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
    let mut pragmas = format!("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};", self.busy_timeout_ms);
    if let Some(mode) = &self.journal_mode {
      pragmas.push_str(&format!(" PRAGMA journal_mode = {mode};"));
    }
    conn.batch_execute(&pragmas).map_err(diesel::r2d2::Error::QueryError)
  }
}

/// Builds the pool described by `cfg` and brings the schema up to date.
pub fn open_pool(cfg: &StorageConfig) -> Result<SqlitePool, CoreError> {
  if let Some(mode) = &cfg.journal_mode {
    if mode.is_empty() || !mode.chars().all(|c| c.is_ascii_alphabetic()) {
      return Err(CoreError::Repository(format!("invalid journal_mode {mode:?}")));
    }
  }

  if let Some(parent) = cfg.db_path.parent() {
    std::fs::create_dir_all(parent).map_err(|e| CoreError::Repository(e.to_string()))?;
  }

  let manager = ConnectionManager::<SqliteConnection>::new(cfg.db_path.to_string_lossy());
  let options = ConnectionOptions { journal_mode: cfg.journal_mode.clone(), busy_timeout_ms: cfg.busy_timeout_ms };

  let pool = Pool::builder()
    .max_size(cfg.pool_size.max(1))
    .connection_customizer(Box::new(options))
    .build(manager)
    .map_err(|e| CoreError::Repository(e.to_string()))?;

  run_migrations(&pool)?;
  info!(db_path = ?cfg.db_path, pool_size = cfg.pool_size, "song database ready");

  Ok(pool)
}

pub fn run_migrations(pool: &SqlitePool) -> Result<(), CoreError> {
  let mut pooled = pool.get().map_err(|e| CoreError::Repository(e.to_string()))?;
  let conn: &mut SqliteConnection = &mut pooled;

  let applied =
    conn.run_pending_migrations(MIGRATIONS).map_err(|e| CoreError::Repository(format!("migrations: {e}")))?;
  debug!(applied = applied.len(), "migrations applied");

  Ok(())
}
