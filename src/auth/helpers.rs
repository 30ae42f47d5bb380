use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use super::SessionToken;
use crate::error::{Error, Result};
use crate::server::AppState;
use crate::store::Store;
use crate::types::{Account, Session};

const MAX_LOOKUP_ATTEMPTS: usize = 3;

#[derive(Debug)]
pub enum TokenValidationError {
    InvalidScheme,
    InvalidToken,
    TokenExpired,
    InternalError,
}

pub struct ValidatedSession {
    pub session: Session,
    pub account: Account,
}

/// Creates and stores a new session for `account_id`.
/// Returns the stored session and the raw token to hand to the client.
pub fn issue_session(
    store: &dyn Store,
    account_id: &str,
    ttl: Option<Duration>,
) -> Result<(Session, String)> {
    for _ in 0..MAX_LOOKUP_ATTEMPTS {
        let token = SessionToken::generate();
        let now = Utc::now();
        let expires_at = match ttl {
            Some(ttl) => Some(now.checked_add_signed(ttl).ok_or_else(|| {
                Error::Config(format!("session TTL of {} days overflows", ttl.num_days()))
            })?),
            None => None,
        };
        let session = Session {
            id: Uuid::new_v4().to_string(),
            token_hash: token.hash()?,
            token_lookup: token.lookup().to_string(),
            account_id: account_id.to_string(),
            created_at: now,
            expires_at,
            last_used_at: None,
        };

        match store.create_session(&session) {
            Ok(()) => return Ok((session, token.to_string())),
            Err(Error::SessionLookupCollision) => {
                tracing::warn!("Session lookup collision, regenerating");
            }
            Err(e) => return Err(e),
        }
    }

    Err(Error::SessionLookupCollision)
}

/// Validates a raw session token against the store.
pub fn validate_session(
    state: &Arc<AppState>,
    raw_token: &str,
) -> std::result::Result<ValidatedSession, TokenValidationError> {
    let token: SessionToken = raw_token
        .parse()
        .map_err(|_| TokenValidationError::InvalidToken)?;

    let session = state
        .store
        .get_session_by_lookup(token.lookup())
        .map_err(|_| TokenValidationError::InternalError)?
        .ok_or(TokenValidationError::InvalidToken)?;

    if !token
        .matches(&session.token_hash)
        .map_err(|_| TokenValidationError::InternalError)?
    {
        return Err(TokenValidationError::InvalidToken);
    }

    if let Some(expires_at) = &session.expires_at {
        if expires_at < &Utc::now() {
            return Err(TokenValidationError::TokenExpired);
        }
    }

    let account = state
        .store
        .get_account(&session.account_id)
        .map_err(|_| TokenValidationError::InternalError)?
        .ok_or(TokenValidationError::InvalidToken)?;

    if let Err(e) = state.store.update_session_last_used(&session.id) {
        tracing::warn!("Failed to update session last_used_at: {e}");
    }

    Ok(ValidatedSession { session, account })
}

/// Extracts a bearer token from the Authorization header.
/// Returns None if no auth header is present.
pub fn extract_token_from_header(
    auth_header: Option<&str>,
) -> std::result::Result<Option<String>, TokenValidationError> {
    match auth_header {
        Some(header) => header
            .strip_prefix("Bearer ")
            .map(|token| Some(token.trim().to_string()))
            .ok_or(TokenValidationError::InvalidScheme),
        None => Ok(None),
    }
}
