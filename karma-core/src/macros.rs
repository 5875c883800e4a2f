/// Deref a newtype to its single field.
#[macro_export]
macro_rules! make_smart_pointer {
	($name:ident $(<$($gens:ident),*>)?, $inner:ty) => {
		impl$(<$($gens),*>)? std::ops::Deref for $name$(<$($gens),*>)? {
			type Target = $inner;
			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl$(<$($gens),*>)? std::ops::DerefMut for $name$(<$($gens),*>)? {
			fn deref_mut(&mut self) -> &mut Self::Target {
				&mut self.0
			}
		}
	};
}

/// Log the error with its call site and hand it back, for use in `map_err`.
/// ## Example
/// ```ignore
/// uow.commit().await.map_err(karma_core::log_error!())?;
/// ```
#[macro_export]
macro_rules! log_error {
	() => {
		|err| {
			::tracing::error!("{:?} {}:{}", err, file!(), line!());
			err
		}
	};
}
