use syn::{DeriveInput, Path};

/// Root path of the karma crate from the `#[crates(...)]` attribute. Defaults to `::karma`.
pub(crate) fn locate_crate_on_derive_macro(ast: &DeriveInput) -> syn::Result<Path> {
	match ast.attrs.iter().find(|attr| attr.path().is_ident("crates")) {
		Some(attr) => attr.parse_args::<Path>(),
		None => syn::parse_str("::karma"),
	}
}
