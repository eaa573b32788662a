pub mod ids;
pub mod song;
pub mod user;

pub use ids::{SONG_ID_LEN, SongId, UserId};
pub use song::{NewSong, Song, SongDetail, SongPatch, SongSummary};
pub use user::UserSummary;
