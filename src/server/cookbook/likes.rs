use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::account::ensure_profile;
use crate::server::dto::ToggleLikeRequest;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::store::Store;
use crate::types::{Account, Like, LikeState};

use super::access::load_recipe;

fn add_like(store: &dyn Store, account: &Account, recipe_id: &str) -> Result<(), ApiError> {
    // Likes reference the profile, not the account.
    let profile = ensure_profile(store, account, false)?;

    let like = Like {
        id: Uuid::new_v4().to_string(),
        recipe_id: recipe_id.to_string(),
        user_id: profile.id,
        created_at: Utc::now(),
    };

    if !store.add_like(&like).api_err("Failed to like recipe")? {
        tracing::debug!("Recipe {recipe_id} already liked by {}", account.id);
    }
    Ok(())
}

fn remove_like(store: &dyn Store, account: &Account, recipe_id: &str) -> Result<(), ApiError> {
    store
        .remove_like(recipe_id, &account.id)
        .api_err("Failed to unlike recipe")?;
    Ok(())
}

/// Recounts after a mutation so the response reflects every viewer's likes.
fn like_state(store: &dyn Store, account: &Account, recipe_id: &str) -> Result<LikeState, ApiError> {
    Ok(LikeState {
        likes_count: store
            .count_likes(recipe_id)
            .api_err("Failed to count likes")?,
        is_liked: store
            .has_liked(recipe_id, &account.id)
            .api_err("Failed to check like")?,
    })
}

pub async fn like_recipe(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let recipe = load_recipe(store, &id)?;

    add_like(store, &auth.account, &recipe.id)?;
    let current = like_state(store, &auth.account, &recipe.id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(current)))
}

pub async fn unlike_recipe(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let recipe = load_recipe(store, &id)?;

    remove_like(store, &auth.account, &recipe.id)?;
    let current = like_state(store, &auth.account, &recipe.id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(current)))
}

/// Flips the like state the client currently shows. A stale client state
/// turns into a no-op rather than a duplicate or a missing row.
pub async fn toggle_like(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ToggleLikeRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let recipe = load_recipe(store, &id)?;

    if req.liked {
        remove_like(store, &auth.account, &recipe.id)?;
    } else {
        add_like(store, &auth.account, &recipe.id)?;
    }
    let current = like_state(store, &auth.account, &recipe.id)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(current)))
}
