use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;

use crate::auth::{RequireUser, email_local_part};
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::UpdateProfileRequest;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::validation::{normalize_full_name, normalize_username};
use crate::store::Store;
use crate::types::{Account, Profile};

/// Returns the account's profile, creating it on first use.
///
/// A new profile takes the email local part as username; `with_full_name`
/// also seeds the full name with it. An existing profile is never changed.
pub(crate) fn ensure_profile(
    store: &dyn Store,
    account: &Account,
    with_full_name: bool,
) -> Result<Profile, ApiError> {
    if let Some(profile) = store
        .get_profile(&account.id)
        .api_err("Failed to get profile")?
    {
        return Ok(profile);
    }

    let local_part = email_local_part(&account.email);
    let now = Utc::now();
    let profile = Profile {
        id: account.id.clone(),
        username: local_part.clone(),
        full_name: if with_full_name { local_part } else { None },
        email: Some(account.email.clone()),
        created_at: now,
        updated_at: now,
    };

    match store.create_profile(&profile) {
        Ok(()) => {
            tracing::info!("Created profile for account {}", account.id);
            Ok(profile)
        }
        // Another request created it first.
        Err(Error::AlreadyExists) => store
            .get_profile(&account.id)
            .api_err("Failed to get profile")?
            .ok_or_else(|| ApiError::internal("Failed to create profile")),
        Err(e) => {
            tracing::error!("Failed to create profile: {e}");
            Err(ApiError::internal("Failed to create profile"))
        }
    }
}

pub async fn get_profile(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let profile = ensure_profile(state.store.as_ref(), &auth.account, false)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(profile)))
}

pub async fn update_profile(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateProfileRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let mut profile = ensure_profile(store, &auth.account, false)?;

    if req.username.is_some() {
        profile.username = normalize_username(req.username.as_deref())?;
    }
    if req.full_name.is_some() {
        profile.full_name = normalize_full_name(req.full_name.as_deref())?;
    }
    profile.updated_at = Utc::now();

    store
        .update_profile(&profile)
        .api_err("Failed to update profile")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(profile)))
}
