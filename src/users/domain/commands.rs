use crate::prelude::*;

#[derive(Debug, Clone, TCommand, Serialize, Deserialize)]
pub struct RegisterUserCommand {
	pub username: String,
	pub password: String,
	pub email: String,
}

/// `username` holds either the e-mail or the username of the account.
#[derive(Debug, Clone, TCommand, Serialize, Deserialize)]
pub struct VerifyUserCredentialsCommand {
	pub username: String,
	pub password: String,
}

#[derive(Debug, Clone, TCommand, Serialize, Deserialize)]
pub struct VoteForUserCommand {
	pub voted_for_user_id: i64,
	pub voting_user_id: i64,
	pub liked: bool,
	pub disliked: bool,
}
