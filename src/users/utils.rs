use argon2::{
	password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
	Argon2,
};

use super::error::UsersError;

/// Argon2id with a random salt, stored as a PHC string (`$argon2id$v=19$...`).
pub fn hash_password(password: &str) -> Result<String, UsersError> {
	let salt = SaltString::generate(&mut OsRng);
	let hashed = Argon2::default()
		.hash_password(password.as_bytes(), &salt)
		.map_err(|err| UsersError::PasswordHashing(err.to_string()))?;
	Ok(hashed.to_string())
}

/// `false` for anything that is not a PHC string produced by [hash_password].
pub fn verify_password(plain_password: &str, hashed_password: &str) -> bool {
	let Ok(parsed) = PasswordHash::new(hashed_password) else {
		return false;
	};
	Argon2::default().verify_password(plain_password.as_bytes(), &parsed).is_ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_hash_is_salted_and_verifiable() {
		let first = hash_password("secret123").unwrap();
		let second = hash_password("secret123").unwrap();

		assert_ne!(first, "secret123");
		assert_ne!(first, second);
		assert!(first.starts_with("$argon2id$"));
		assert!(verify_password("secret123", &first));
		assert!(verify_password("secret123", &second));
		assert!(!verify_password("secret124", &first));
	}

	#[test]
	fn test_foreign_formats_never_verify() {
		assert!(!verify_password("secret123", "secret123"));
		assert!(!verify_password("secret123", "sha256$salt$digest"));
		assert!(!verify_password("secret123", ""));
	}
}
