// crates/songbook-core/src/errors.rs
use thiserror::Error;

/// Error taxonomy of the songbook core.
///
/// Upper layers (HTTP, CLI, ...) map these kinds to status codes or user
/// messages; nothing in the core retries on any of them.
#[derive(Debug, Error)]
pub enum CoreError {
  /// The referenced entity does not exist. Always propagated as-is.
  #[error("{entity} not found: {id}")]
  NotFound { entity: &'static str, id: String },

  /// The entity exists but the caller has no rights on it.
  #[error("not authorized: {0}")]
  Authorization(String),

  /// A write that had to produce an id or touch a row did not.
  #[error("persistence invariant violated: {0}")]
  PersistenceInvariant(String),

  #[error("repository error: {0}")]
  Repository(String),
}

impl CoreError {
  pub fn song_not_found(id: impl ToString) -> Self {
    CoreError::NotFound { entity: "song", id: id.to_string() }
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, CoreError::NotFound { .. })
  }

  pub fn is_authorization(&self) -> bool {
    matches!(self, CoreError::Authorization(_))
  }
}
