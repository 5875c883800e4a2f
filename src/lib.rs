//! User registration and like/dislike reputation built on a command/event message bus.
//!
//! Every operation goes through [users::messagebus]: a fresh unit of work, a [Bootstrap](prelude::Bootstrap)
//! that injects it into the handlers, and a [MessageBus](prelude::MessageBus) that runs the command
//! and the events it raises.

extern crate self as karma;

pub mod config;
pub mod users;

pub mod prelude {
	pub use karma_core::prelude::*;
	pub use karma_core::{log_error, make_smart_pointer};
	pub use karma_macro::{ApplicationError, ApplicationResponse, TCommand, TEvent};
}
