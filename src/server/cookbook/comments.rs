use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::account::ensure_profile;
use crate::server::dto::CreateCommentRequest;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::server::validation::validate_comment;
use crate::types::{Author, Comment, CommentWithAuthor};

use super::access::{load_recipe, require_recipe_owner};

pub async fn list_comments(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let recipe = load_recipe(store, &id)?;
    let is_owner = recipe.user_id == auth.account.id;

    let comments: Vec<CommentWithAuthor> = store
        .list_comments(&recipe.id)
        .api_err("Failed to list comments")?
        .into_iter()
        .map(|mut c| {
            c.can_delete = is_owner;
            c
        })
        .collect();

    Ok::<_, ApiError>(Json(ApiResponse::success(comments)))
}

pub async fn add_comment(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CreateCommentRequest>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let recipe = load_recipe(store, &id)?;
    let text = validate_comment(&req.comment)?;
    let profile = ensure_profile(store, &auth.account, false)?;

    let now = Utc::now();
    let comment = Comment {
        id: Uuid::new_v4().to_string(),
        recipe_id: recipe.id.clone(),
        user_id: profile.id.clone(),
        comment: text,
        created_at: now,
        updated_at: now,
    };

    store
        .create_comment(&comment)
        .api_err("Failed to create comment")?;

    tracing::info!("Comment {} added to recipe {}", comment.id, recipe.id);

    let response = CommentWithAuthor {
        comment,
        author: Author::from(&profile),
        can_delete: recipe.user_id == auth.account.id,
    };

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

pub async fn delete_comment(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path((id, comment_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let recipe = require_recipe_owner(store, &auth.account, &id, "delete comments")?;

    let comment = store
        .get_comment(&comment_id)
        .api_err("Failed to get comment")?
        .filter(|c| c.recipe_id == recipe.id)
        .or_not_found("Comment not found")?;

    store
        .delete_comment(&comment.id)
        .api_err("Failed to delete comment")?;

    tracing::info!("Comment {} deleted from recipe {}", comment.id, recipe.id);

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
