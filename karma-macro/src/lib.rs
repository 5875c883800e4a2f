use message::{render_marker_token, render_message_token, MessageKind};
use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

#[macro_use]
extern crate quote;

mod message;
mod utils;

/// Implement `TMessage` and `TCommand`. The topic is the type name.
///
/// ## Attributes
///
/// - `#[crates(...)]` - Specify the path of the karma crate. (Default is `::karma`)
///
/// ## Example
/// ```ignore
/// #[derive(Debug, TCommand)]
/// pub struct RegisterUserCommand {
///     pub email: String,
///     pub username: String,
///     pub password: String,
/// }
/// ```
#[proc_macro_derive(TCommand, attributes(crates))]
pub fn command_derive(input: TokenStream) -> TokenStream {
	let ast = parse_macro_input!(input as DeriveInput);
	render_message_token(&ast, MessageKind::Command).unwrap_or_else(syn::Error::into_compile_error).into()
}

/// Implement `TMessage` and `TEvent`. The topic is the type name.
#[proc_macro_derive(TEvent, attributes(crates))]
pub fn event_derive(input: TokenStream) -> TokenStream {
	let ast = parse_macro_input!(input as DeriveInput);
	render_message_token(&ast, MessageKind::Event).unwrap_or_else(syn::Error::into_compile_error).into()
}

/// Define ApplicationResponse so that could be recognized by messagebus
#[proc_macro_derive(ApplicationResponse, attributes(crates))]
pub fn response_derive(input: TokenStream) -> TokenStream {
	let ast = parse_macro_input!(input as DeriveInput);
	render_marker_token(&ast, "ApplicationResponse").unwrap_or_else(syn::Error::into_compile_error).into()
}

/// Mark an error type as usable by the messagebus. It must implement `std::error::Error`,
/// typically through `thiserror`, and `From<BaseError>`.
#[proc_macro_derive(ApplicationError, attributes(crates))]
pub fn error_derive(input: TokenStream) -> TokenStream {
	let ast = parse_macro_input!(input as DeriveInput);
	render_marker_token(&ast, "ApplicationError").unwrap_or_else(syn::Error::into_compile_error).into()
}
