pub mod clock;
pub mod collaboration;
pub mod song_repository;

pub use clock::{Clock, SystemClock};
pub use collaboration::{CollaborationError, CollaborationVerifier};
pub use song_repository::{RowMatch, SongRepository};
