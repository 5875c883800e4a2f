use karma::prelude::*;

#[test]
fn test_derived_topic_is_the_type_name() {
	#[derive(Debug, TCommand)]
	struct SomeCommand {
		#[allow(unused)]
		id: i32,
	}

	#[derive(Debug, TEvent)]
	struct SomethingHappened;

	assert_eq!(SomeCommand { id: 1 }.topic(), "SomeCommand");
	assert_eq!(Message::command(SomeCommand { id: 1 }).topic(), "SomeCommand");
	assert_eq!(Message::event(SomethingHappened).topic(), "SomethingHappened");
}

#[test]
fn test_derive_on_generic_message() {
	#[allow(unused)]
	#[derive(Debug, TCommand)]
	struct Wrapped<T: std::fmt::Debug + Send + Sync + 'static> {
		inner: T,
	}

	let command = Wrapped { inner: 3_u8 };
	assert_eq!(command.topic(), "Wrapped");
	assert_eq!(format!("{:?}", command), "Wrapped { inner: 3 }");
}

#[test]
fn test_derived_markers() {
	#[derive(Debug, thiserror::Error, ApplicationError)]
	#[error("failed")]
	struct Failed;

	#[derive(Debug, ApplicationResponse)]
	struct Done;

	fn assert_error<E: ApplicationError>(_: &E) {}
	fn assert_response<R: ApplicationResponse>(_: &R) {}
	assert_error(&Failed);
	assert_response(&Done);
}
