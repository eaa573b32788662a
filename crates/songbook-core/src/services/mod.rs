pub mod access_resolver;
pub mod song_service;

pub use access_resolver::{AccessDecision, AccessGrant, AccessResolver, Denial};
pub use song_service::SongService;
