//! Password hashing and strength rules.

use crate::error::{HotelError, HotelResult};

/// Shortest accepted password.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Checks the complexity rule: at least eight characters with an
/// uppercase letter, a lowercase letter, a digit and a special character.
pub fn validate_strength(password: &str) -> HotelResult<()> {
    let long_enough = password.chars().count() >= MIN_PASSWORD_LEN;
    let upper = password.chars().any(|c| c.is_uppercase());
    let lower = password.chars().any(|c| c.is_lowercase());
    let digit = password.chars().any(|c| c.is_ascii_digit());
    let special = password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    if long_enough && upper && lower && digit && special {
        Ok(())
    } else {
        Err(HotelError::validation(
            "password",
            "must be at least 8 characters and include uppercase, lowercase, a number and a special character",
        ))
    }
}

/// Hashes `password` with bcrypt at `cost` on the blocking pool.
pub async fn hash(password: &str, cost: u32) -> HotelResult<String> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| HotelError::PasswordHash { message: e.to_string() })?
        .map_err(|e| HotelError::PasswordHash { message: e.to_string() })
}

/// Checks `password` against a stored bcrypt hash.
pub async fn verify(password: &str, stored_hash: &str) -> HotelResult<bool> {
    let password = password.to_owned();
    let stored_hash = stored_hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &stored_hash))
        .await
        .map_err(|e| HotelError::PasswordHash { message: e.to_string() })?
        .map_err(|e| HotelError::PasswordHash { message: e.to_string() })
}
