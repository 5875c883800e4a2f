use crate::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-postgres", derive(sqlx::FromRow))]
pub struct User {
	pub id: i64,
	pub email: String,
	/// Always the hashed form.
	pub password: String,
	pub username: String,
}

impl User {
	pub fn new(email: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
		Self {
			id: 0,
			email: email.into(),
			password: password.into(),
			username: username.into(),
		}
	}
}

impl TModel for User {
	const TABLE: &'static str = "users";

	fn id(&self) -> i64 {
		self.id
	}
	fn set_id(&mut self, id: i64) {
		self.id = id
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-postgres", derive(sqlx::FromRow))]
pub struct UserStatistics {
	pub id: i64,
	pub user_id: i64,
	pub likes: i64,
	pub dislikes: i64,
}

impl UserStatistics {
	pub fn new(user_id: i64) -> Self {
		Self {
			id: 0,
			user_id,
			likes: 0,
			dislikes: 0,
		}
	}
}

impl TModel for UserStatistics {
	const TABLE: &'static str = "users_statistics";

	fn id(&self) -> i64 {
		self.id
	}
	fn set_id(&mut self, id: i64) {
		self.id = id
	}
}

/// `voting_user_id` voted for `voted_for_user_id`. One vote per pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-postgres", derive(sqlx::FromRow))]
pub struct UserVote {
	pub id: i64,
	pub voting_user_id: i64,
	pub voted_for_user_id: i64,
}

impl UserVote {
	pub fn new(voting_user_id: i64, voted_for_user_id: i64) -> Self {
		Self {
			id: 0,
			voting_user_id,
			voted_for_user_id,
		}
	}
}

impl TModel for UserVote {
	const TABLE: &'static str = "users_votes";

	fn id(&self) -> i64 {
		self.id
	}
	fn set_id(&mut self, id: i64) {
		self.id = id
	}
}
