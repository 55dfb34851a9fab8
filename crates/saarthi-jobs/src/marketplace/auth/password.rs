use argon2::Argon2;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::marketplace::error::MarketplaceError;

pub fn hash_password(password: &str) -> Result<String, MarketplaceError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| MarketplaceError::PasswordHash(err.to_string()))
}

/// False for a wrong password or an unparseable stored hash.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(hash) = PasswordHash::new(stored) else {
        return false;
    };
    let algs: &[&dyn PasswordVerifier] = &[&Argon2::default()];
    hash.verify_password(algs, password).is_ok()
}
