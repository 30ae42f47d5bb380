use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::{Error, Result};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Argon2id PHC hash of a secret. Passwords and session tokens both go
/// through here; `what` only shapes the error message.
pub(crate) fn hash_secret(secret: &str, what: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| Error::Config(format!("failed to hash {what}: {e}")))?;
    Ok(hash.to_string())
}

pub(crate) fn verify_secret(secret: &str, hash: &str, what: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| Error::Config(format!("invalid {what} hash: {e}")))?;

    match Argon2::default().verify_password(secret.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(Error::Config(format!("failed to verify {what}: {e}"))),
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    hash_secret(password, "password")
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    verify_secret(password, hash, "password")
}

/// Lowercases and trims an email, rejecting obviously malformed input.
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(Error::Validation("A valid email address is required".into()));
    }
    Ok(email)
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// The part of an email before `@`, used as a default username.
#[must_use]
pub fn email_local_part(email: &str) -> Option<String> {
    email
        .split_once('@')
        .map(|(local, _)| local.to_string())
        .filter(|s| !s.is_empty())
}
