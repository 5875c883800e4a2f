use karma::{
	config::Config,
	prelude::*,
	users::{
		self,
		adapters::in_memory::{InMemoryUsersDatabase, InMemoryUsersUnitOfWork},
		domain::{
			commands::{RegisterUserCommand, VerifyUserCredentialsCommand, VoteForUserCommand},
			events::{UserRegisteredEvent, UserVotedEvent},
			models::{User, UserStatistics},
		},
		error::UsersError,
		handlers::command::{RegisterUserCommandHandler, VoteForUserCommandHandler},
		notification::{ChannelNotifier, Notification, SharedNotifier},
		responses::UsersResponse,
		utils::verify_password,
		UsersMessageBus,
	},
};
use std::sync::Arc;
use tokio::sync::{mpsc::UnboundedReceiver, RwLock};

struct Harness {
	db: InMemoryUsersDatabase,
	notifier: SharedNotifier,
	notifications: UnboundedReceiver<Notification>,
}

impl Harness {
	fn new() -> Self {
		let (notifier, notifications) = ChannelNotifier::new();
		Self {
			db: InMemoryUsersDatabase::new(),
			notifier: Arc::new(notifier),
			notifications,
		}
	}

	/// Fresh unit of work and bus per operation.
	fn bus(&self) -> UsersMessageBus<InMemoryUsersUnitOfWork> {
		users::messagebus(self.db.unit_of_work(), Arc::clone(&self.notifier), &Config::default()).unwrap()
	}

	async fn register(&self, username: &str) -> Result<User, UsersError> {
		let res = self
			.bus()
			.execute(RegisterUserCommand {
				username: username.into(),
				password: "secret123".into(),
				email: format!("{username}@x.com"),
			})
			.await?;
		Ok(res.user().unwrap())
	}

	async fn vote(&self, voting_user_id: i64, voted_for_user_id: i64, liked: bool) -> Result<UserStatistics, UsersError> {
		let res = self
			.bus()
			.execute(VoteForUserCommand {
				voted_for_user_id,
				voting_user_id,
				liked,
				disliked: !liked,
			})
			.await?;
		Ok(res.statistics().unwrap())
	}
}

fn atomic(uow: InMemoryUsersUnitOfWork) -> AtomicUnitOfWork<InMemoryUsersUnitOfWork> {
	Arc::new(RwLock::new(uow))
}

#[tokio::test]
async fn test_register_user_returns_user_with_hashed_password() {
	let harness = Harness::new();

	let user = harness.register("bob").await.unwrap();

	assert_ne!(user.id, 0);
	assert_eq!(user.username, "bob");
	assert_eq!(user.email, "bob@x.com");
	assert_ne!(user.password, "secret123");
	assert!(verify_password("secret123", &user.password));
	assert_eq!(harness.db.users().await, vec![user.clone()]);
	assert_eq!(harness.db.users_statistics().await[0], UserStatistics { id: 1, user_id: user.id, likes: 0, dislikes: 0 });
}

#[tokio::test]
async fn test_register_user_stages_registered_event() {
	let db = InMemoryUsersDatabase::new();
	let uow = atomic(db.unit_of_work());
	let handler = RegisterUserCommandHandler::new(Arc::clone(&uow));

	let res = handler
		.handle(RegisterUserCommand {
			username: "bob".into(),
			password: "secret123".into(),
			email: "bob@x.com".into(),
		})
		.await
		.unwrap();
	let user = res.user().unwrap();

	let events = uow.write().await.get_events();
	assert_eq!(events.len(), 1);
	assert_eq!(events[0].downcast_ref::<UserRegisteredEvent>(), Some(&UserRegisteredEvent::from(&user)));
}

#[tokio::test]
async fn test_registration_notification_is_dispatched() {
	let mut harness = Harness::new();
	let user = harness.register("bob").await.unwrap();

	let notification = harness.notifications.try_recv().unwrap();
	assert_eq!(notification, Notification::Registration(UserRegisteredEvent::from(&user)));
}

#[tokio::test]
async fn test_register_same_email_twice() {
	let harness = Harness::new();
	harness.register("bob").await.unwrap();

	let err = harness
		.bus()
		.execute(RegisterUserCommand {
			username: "robert".into(),
			password: "secret123".into(),
			email: "bob@x.com".into(),
		})
		.await
		.unwrap_err();

	assert!(matches!(err, UsersError::UserAlreadyExists));
	assert_eq!(err.status_code(), 409);
	assert_eq!(harness.db.users().await.len(), 1);
	assert_eq!(harness.db.users_statistics().await.len(), 1);
}

#[tokio::test]
async fn test_vote_like_counts_and_stages_event() {
	let harness = Harness::new();
	let db = harness.db.clone();
	let voting = harness.register("alice").await.unwrap();
	let voted_for = harness.register("bob").await.unwrap();

	let uow = atomic(db.unit_of_work());
	let handler = VoteForUserCommandHandler::new(Arc::clone(&uow));
	let command = VoteForUserCommand {
		voted_for_user_id: voted_for.id,
		voting_user_id: voting.id,
		liked: true,
		disliked: false,
	};

	let statistics = handler.handle(command.clone()).await.unwrap().statistics().unwrap();
	assert_eq!((statistics.user_id, statistics.likes, statistics.dislikes), (voted_for.id, 1, 0));

	let events = uow.write().await.get_events();
	assert_eq!(
		events[0].downcast_ref::<UserVotedEvent>(),
		Some(&UserVotedEvent {
			voted_for_user_email: "bob@x.com".into(),
			voted_for_user_username: "bob".into(),
			voting_user_email: "alice@x.com".into(),
			voting_user_username: "alice".into(),
			liked: true,
			disliked: false,
		})
	);

	let err = handler.handle(command).await.unwrap_err();
	assert!(matches!(err, UsersError::UserAlreadyVoted));
	assert_eq!(db.users_votes().await.len(), 1);
	assert_eq!(db.users_statistics().await.iter().find(|s| s.user_id == voted_for.id).unwrap().likes, 1);
}

#[tokio::test]
async fn test_vote_dislike_and_notification() {
	let mut harness = Harness::new();
	let voting = harness.register("alice").await.unwrap();
	let voted_for = harness.register("bob").await.unwrap();
	while harness.notifications.try_recv().is_ok() {}

	let statistics = harness.vote(voting.id, voted_for.id, false).await.unwrap();
	assert_eq!((statistics.likes, statistics.dislikes), (0, 1));

	let Notification::Vote(event) = harness.notifications.try_recv().unwrap() else {
		panic!("expected a vote notification");
	};
	assert_eq!(event.voted_for_user_email, "bob@x.com");
	assert!(event.disliked);
}

#[tokio::test]
async fn test_vote_for_self_is_rejected_before_any_mutation() {
	let harness = Harness::new();
	let bob = harness.register("bob").await.unwrap();

	let err = harness.vote(bob.id, bob.id, true).await.unwrap_err();

	assert!(matches!(err, UsersError::CannotVoteForSelf));
	assert!(harness.db.users_votes().await.is_empty());
	assert_eq!(harness.db.users_statistics().await[0].likes, 0);
}

#[tokio::test]
async fn test_vote_for_missing_user() {
	let harness = Harness::new();
	let bob = harness.register("bob").await.unwrap();

	let err = harness.vote(bob.id, 42, true).await.unwrap_err();
	assert!(matches!(err, UsersError::UserNotFound));
	assert!(harness.db.users_votes().await.is_empty());
}

#[tokio::test]
async fn test_verify_credentials_by_email_or_username() {
	let harness = Harness::new();
	let bob = harness.register("bob").await.unwrap();

	for login in ["bob@x.com", "bob"] {
		let res = harness
			.bus()
			.execute(VerifyUserCredentialsCommand {
				username: login.into(),
				password: "secret123".into(),
			})
			.await
			.unwrap();
		assert_eq!(res, UsersResponse::User(bob.clone()));
	}

	let err = harness
		.bus()
		.execute(VerifyUserCredentialsCommand {
			username: "bob".into(),
			password: "wrong".into(),
		})
		.await
		.unwrap_err();
	assert!(matches!(err, UsersError::InvalidPassword));

	let err = harness
		.bus()
		.execute(VerifyUserCredentialsCommand {
			username: "nobody".into(),
			password: "secret123".into(),
		})
		.await
		.unwrap_err();
	assert!(matches!(err, UsersError::UserNotFound));
}

#[tokio::test]
async fn test_racing_votes_are_stopped_by_the_unique_constraint() {
	let harness = Harness::new();
	let voting = harness.register("alice").await.unwrap();
	let voted_for = harness.register("bob").await.unwrap();

	// both units of work pass the existence check before either commits
	let mut first = harness.db.unit_of_work();
	let mut second = harness.db.unit_of_work();
	first.begin().await.unwrap();
	second.begin().await.unwrap();

	let mut first_service = users::service::UsersService::new(&mut first);
	assert!(!first_service.check_if_user_already_voted(voting.id, voted_for.id).await.unwrap());
	let mut second_service = users::service::UsersService::new(&mut second);
	assert!(!second_service.check_if_user_already_voted(voting.id, voted_for.id).await.unwrap());

	users::service::UsersService::new(&mut first).like_user(voting.id, voted_for.id).await.unwrap();
	let err = users::service::UsersService::new(&mut second).like_user(voting.id, voted_for.id).await.unwrap_err();
	assert!(matches!(err, UsersError::UserAlreadyVoted));

	second.close().await;
	assert_eq!(harness.db.users_votes().await.len(), 1);
}
