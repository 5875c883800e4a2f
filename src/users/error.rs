use crate::prelude::*;
use thiserror::Error;

#[derive(Debug, Error, ApplicationError)]
pub enum UsersError {
	#[error("User with provided credentials already exists")]
	UserAlreadyExists,
	#[error("User with provided credentials not found")]
	UserNotFound,
	#[error("Statistics of the user not found")]
	UserStatisticsNotFound,
	#[error("User has already voted for this user")]
	UserAlreadyVoted,
	#[error("User can not vote for himself")]
	CannotVoteForSelf,
	#[error("Provided password is invalid")]
	InvalidPassword,
	#[error("user id, email or username is required")]
	UserAttributeRequired,
	#[error("password hashing failed: {0}")]
	PasswordHashing(String),
	#[error(transparent)]
	Base(#[from] BaseError),
}

impl UsersError {
	/// HTTP status a transport layer should answer with.
	pub fn status_code(&self) -> u16 {
		match self {
			Self::UserAlreadyExists | Self::UserAlreadyVoted => 409,
			Self::UserNotFound | Self::UserStatisticsNotFound => 404,
			Self::InvalidPassword => 412,
			Self::CannotVoteForSelf | Self::UserAttributeRequired => 400,
			Self::PasswordHashing(_) | Self::Base(_) => 500,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_codes() {
		assert_eq!(UsersError::UserAlreadyExists.status_code(), 409);
		assert_eq!(UsersError::UserNotFound.status_code(), 404);
		assert_eq!(UsersError::InvalidPassword.status_code(), 412);
		assert_eq!(UsersError::CannotVoteForSelf.status_code(), 400);
		assert_eq!(UsersError::PasswordHashing("bad salt".into()).status_code(), 500);
		assert_eq!(UsersError::from(BaseError::NoCommandResult).status_code(), 500);
	}
}
