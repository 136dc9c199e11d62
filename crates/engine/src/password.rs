//! Password hashing and verification using Argon2
//!
//! Uses the argon2id variant with the crate's default parameters.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::{EngineError, ResultEngine};

/// Hash a password using Argon2id
///
/// Returns the PHC-formatted hash string that includes the salt and parameters.
pub(crate) fn hash_password(password: &str) -> ResultEngine<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| EngineError::Password(format!("failed to hash password: {e}")))
}

/// Verify a password against a stored hash
pub(crate) fn verify_password(password: &str, hash: &str) -> ResultEngine<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| EngineError::Password(format!("invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
