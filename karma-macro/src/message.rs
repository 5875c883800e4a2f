use proc_macro2::TokenStream;
use syn::DeriveInput;

use crate::utils::locate_crate_on_derive_macro;

pub(crate) enum MessageKind {
	Command,
	Event,
}

pub(crate) fn render_message_token(ast: &DeriveInput, kind: MessageKind) -> syn::Result<TokenStream> {
	let crates = locate_crate_on_derive_macro(ast)?;
	let name = &ast.ident;
	let topic = name.to_string();
	let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

	let marker = match kind {
		MessageKind::Command => quote!(#crates::prelude::TCommand),
		MessageKind::Event => quote!(#crates::prelude::TEvent),
	};

	Ok(quote!(
		impl #impl_generics #crates::prelude::TMessage for #name #ty_generics #where_clause {
			fn topic(&self) -> &'static str {
				#topic
			}
		}
		impl #impl_generics #marker for #name #ty_generics #where_clause {}
	))
}

pub(crate) fn render_marker_token(ast: &DeriveInput, marker: &str) -> syn::Result<TokenStream> {
	let crates = locate_crate_on_derive_macro(ast)?;
	let name = &ast.ident;
	let marker = syn::Ident::new(marker, proc_macro2::Span::call_site());
	let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

	Ok(quote!(
		impl #impl_generics #crates::prelude::#marker for #name #ty_generics #where_clause {}
	))
}
