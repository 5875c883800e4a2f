use crate::prelude::*;

use super::domain::models::{User, UserStatistics};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ApplicationResponse)]
#[serde(untagged)]
pub enum UsersResponse {
	User(User),
	Statistics(UserStatistics),
}

impl UsersResponse {
	pub fn user(self) -> Option<User> {
		match self {
			Self::User(user) => Some(user),
			_ => None,
		}
	}

	pub fn statistics(self) -> Option<UserStatistics> {
		match self {
			Self::Statistics(statistics) => Some(statistics),
			_ => None,
		}
	}
}
