//! Local accounts: registration, login and logout over [`LocalStore`].

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::AuthError;
use crate::store::LocalStore;

pub const MIN_USERNAME_LEN: usize = 2;
pub const MIN_PASSWORD_LEN: usize = 3;

/// Lowercase hex SHA-256 of the password.
#[must_use]
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Trim and check both fields, returning the trimmed pair.
fn validate<'a>(username: &'a str, password: &'a str) -> Result<(&'a str, &'a str), AuthError> {
    let username = username.trim();
    let password = password.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(AuthError::UsernameTooShort(MIN_USERNAME_LEN));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::PasswordTooShort(MIN_PASSWORD_LEN));
    }
    Ok((username, password))
}

/// Create an account and sign it in. Returns the trimmed username.
pub fn register(
    store: &mut LocalStore,
    username: &str,
    password: &str,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let (username, password) = validate(username, password)?;
    if !store.register_user(username, hash_password(password)) {
        return Err(AuthError::UsernameTaken(username.to_owned()));
    }
    info!(user = username, "registered");
    sign_in(store, username, now);
    Ok(username.to_owned())
}

/// Check credentials and sign in. Returns the trimmed username.
pub fn login(
    store: &mut LocalStore,
    username: &str,
    password: &str,
    now: DateTime<Utc>,
) -> Result<String, AuthError> {
    let (username, password) = validate(username, password)?;
    if !store.verify_password(username, &hash_password(password)) {
        return Err(AuthError::InvalidCredentials);
    }
    sign_in(store, username, now);
    Ok(username.to_owned())
}

pub fn logout(store: &mut LocalStore) {
    if let Some(user) = store.current_user() {
        info!(user, "logged out");
    }
    store.clear_current_user();
}

fn sign_in(store: &mut LocalStore, username: &str, now: DateTime<Utc>) {
    store.add_login(username, now);
    store.set_current_user(username);
    info!(user = username, "logged in");
}
