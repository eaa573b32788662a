mod atomic;
mod backend;
mod paths;

pub use atomic::atomic_write_str;
pub use backend::{ConfigBackend, TomlConfigBackend};
pub use paths::{BASE_DIR_ENV, ConfigError, SongbookPaths};

use once_cell::sync::Lazy;

// Paths singleton (platform dirs or SONGBOOK_BASE_DIR)
pub static PATHS: Lazy<SongbookPaths> = Lazy::new(|| SongbookPaths::detect().expect("failed to init SongbookPaths"));

// Config backend singleton
pub static CONFIG_BACKEND: Lazy<TomlConfigBackend> = Lazy::new(|| TomlConfigBackend::new(PATHS.clone()));
