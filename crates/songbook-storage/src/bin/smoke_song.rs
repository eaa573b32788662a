use diesel::prelude::*;
use songbook_core::domain::{NewSong, SongPatch, UserId};
use songbook_core::services::SongService;
use songbook_storage::schema::users;
use songbook_storage::{SqliteCollaborationVerifier, SqliteSongStore};

#[tokio::main(flavor = "current_thread")]
async fn main() {
  {
    use tracing_subscriber::prelude::*;

    tracing_subscriber::registry()
      .with(tracing_subscriber::fmt::layer())
      .with(tracing_subscriber::EnvFilter::from_default_env())
      .init()
  }

  // Uses the [storage] section of songbook.toml (SONGBOOK_BASE_DIR to relocate it)
  let store = SqliteSongStore::new_from_config().expect("failed to open song database");

  // Users belong to another service; make sure the demo one exists.
  {
    let mut conn = store.pool().get().expect("failed to get connection");
    diesel::insert_or_ignore_into(users::table)
      .values((users::id.eq("smoke-user"), users::username.eq("smoke"), users::fullname.eq("Smoke Test")))
      .execute(&mut *conn)
      .expect("failed to seed user");
  }

  let verifier = SqliteCollaborationVerifier::for_store(&store);
  let service = SongService::new(store, verifier);
  let owner = UserId::from("smoke-user");

  let id = service
    .add_song(&NewSong {
      title: "Test Song".to_string(),
      body: "first draft".to_string(),
      tags: vec!["smoke".to_string()],
      performer: Some("Nobody".to_string()),
      owner: owner.clone(),
    })
    .expect("failed to add song");
  println!("Saved song with id = {id}");

  let patch = SongPatch { title: "Test Song (edited)".to_string(), body: "second draft".to_string(), tags: vec![] };
  service.edit_song_as(&owner, &id, &patch).await.expect("failed to edit song");

  let loaded = service.get_song_as(&owner, &id).await.expect("failed to load song");
  println!("Loaded from DB: {loaded:?}");

  let listed = service.list_songs(&owner).expect("failed to list songs");
  println!("Songs visible to {owner}: {}", listed.len());

  service.delete_song_as(&owner, &id).expect("failed to delete song");
  println!("Deleted {id}");
}
