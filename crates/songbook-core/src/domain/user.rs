use crate::domain::ids::UserId;
use serde::{Deserialize, Serialize};

/// The only user fields this crate ever reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
  pub id: UserId,
  pub username: String,
  pub fullname: String,
}
