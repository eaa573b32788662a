use crate::schema::songs;
use crate::schema::users;

use diesel::prelude::*;

#[derive(Debug, Queryable)]
#[diesel(table_name = songs)]
pub struct SongRow {
  pub id: String,
  pub title: String,
  pub body: String,
  /// JSON array of strings.
  pub tags: String,
  pub performer: Option<String>,
  pub created_at: String,
  pub updated_at: String,
  pub owner: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = songs)]
pub struct NewSongRow<'a> {
  pub id: &'a str,
  pub title: &'a str,
  pub body: &'a str,
  pub tags: String,
  pub performer: Option<&'a str>,
  pub created_at: String,
  pub updated_at: String,
  pub owner: &'a str,
}

#[derive(Debug, Queryable, QueryableByName)]
#[diesel(table_name = users)]
pub struct UserRow {
  pub id: String,
  pub username: String,
  pub fullname: String,
}
