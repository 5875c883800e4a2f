use crate::prelude::*;

use super::models::User;

#[derive(Debug, Clone, PartialEq, Eq, TEvent, Serialize, Deserialize)]
pub struct UserRegisteredEvent {
	pub user_id: i64,
	pub email: String,
	pub username: String,
}

impl From<&User> for UserRegisteredEvent {
	fn from(user: &User) -> Self {
		Self {
			user_id: user.id,
			email: user.email.clone(),
			username: user.username.clone(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, TEvent, Serialize, Deserialize)]
pub struct UserVotedEvent {
	pub voted_for_user_email: String,
	pub voted_for_user_username: String,
	pub voting_user_email: String,
	pub voting_user_username: String,
	pub liked: bool,
	pub disliked: bool,
}
