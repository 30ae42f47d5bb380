use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::{
    RequireUser, hash_password, issue_session, normalize_email, validate_password,
    verify_password,
};
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::{SessionResponse, SignInRequest, SignUpRequest, UserResponse};
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::types::Account;

use super::ensure_profile;

pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignUpRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let email = normalize_email(&req.email).map_err(ApiError::from)?;
    validate_password(&req.password).map_err(ApiError::from)?;

    if store
        .get_account_by_email(&email)
        .api_err("Failed to check account")?
        .is_some()
    {
        return Err(ApiError::conflict("User already registered"));
    }

    let password_hash = hash_password(&req.password).api_err("Failed to hash password")?;

    let account = Account {
        id: Uuid::new_v4().to_string(),
        email,
        password_hash,
        created_at: Utc::now(),
    };

    match store.create_account(&account) {
        Ok(()) => {}
        Err(Error::AlreadyExists) => return Err(ApiError::conflict("User already registered")),
        Err(e) => {
            tracing::error!("Failed to create account: {e}");
            return Err(ApiError::internal("Failed to create account"));
        }
    }

    tracing::info!("Registered account {} ({})", account.id, account.email);

    Ok::<_, ApiError>((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserResponse::from(&account))),
    ))
}

pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignInRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    // A malformed email can't belong to any account.
    let email = normalize_email(&req.email).map_err(|_| ApiError::from(Error::InvalidCredentials))?;

    let account = store
        .get_account_by_email(&email)
        .api_err("Failed to get account")?
        .ok_or_else(|| ApiError::from(Error::InvalidCredentials))?;

    if !verify_password(&req.password, &account.password_hash)
        .api_err("Failed to verify password")?
    {
        tracing::warn!("Failed login for {email}");
        return Err(ApiError::from(Error::InvalidCredentials));
    }

    match store.delete_expired_sessions() {
        Ok(0) => {}
        Ok(purged) => tracing::debug!("Purged {purged} expired sessions"),
        Err(e) => tracing::warn!("Failed to purge expired sessions: {e}"),
    }

    let profile = ensure_profile(store, &account, true)?;

    let (session, token) =
        issue_session(store, &account.id, state.session_ttl).api_err("Failed to create session")?;

    tracing::info!("Account {} signed in", account.id);

    Ok::<_, ApiError>(Json(ApiResponse::success(SessionResponse {
        token,
        expires_at: session.expires_at,
        user: UserResponse::from(&account),
        profile,
    })))
}

pub async fn sign_out(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    state
        .store
        .delete_session(&auth.session.id)
        .api_err("Failed to delete session")?;

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

pub async fn current_user(auth: RequireUser) -> impl IntoResponse {
    Json(ApiResponse::success(UserResponse::from(&auth.account)))
}
