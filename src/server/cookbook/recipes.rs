use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::account::ensure_profile;
use crate::server::dto::ListRecipesParams;
use crate::server::response::{ApiError, ApiResponse, StoreOptionExt, StoreResultExt};
use crate::types::{Recipe, RecipeDetail, RecipeForm, parse_ingredients};

use super::access::require_recipe_owner;

pub async fn list_recipes(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListRecipesParams>,
) -> impl IntoResponse {
    let scope = params.scope.unwrap_or_default();

    let recipes = state
        .store
        .list_recipe_summaries(&auth.account.id, scope)
        .api_err("Failed to list recipes")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(params.filter().apply(recipes))))
}

pub async fn list_saved_recipes(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let recipes = state
        .store
        .list_saved_recipes(&auth.account.id)
        .api_err("Failed to list saved recipes")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(recipes)))
}

pub async fn get_recipe(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let summary = state
        .store
        .get_recipe_summary(&auth.account.id, &id)
        .api_err("Failed to get recipe")?
        .or_not_found("Recipe not found")?;

    let detail = RecipeDetail {
        ingredient_list: parse_ingredients(&summary.recipe.ingredients),
        is_owner: summary.recipe.user_id == auth.account.id,
        summary,
    };

    Ok::<_, ApiError>(Json(ApiResponse::success(detail)))
}

pub async fn create_recipe(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(form): Json<RecipeForm>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let draft = form.normalize().map_err(ApiError::from)?;
    let profile = ensure_profile(store, &auth.account, false)?;

    let now = Utc::now();
    let recipe = Recipe {
        id: Uuid::new_v4().to_string(),
        user_id: profile.id,
        title: draft.title,
        description: draft.description,
        ingredients: draft.ingredients,
        instructions: draft.instructions,
        cooking_time: draft.cooking_time,
        difficulty: draft.difficulty,
        category: draft.category,
        created_at: now,
        updated_at: now,
    };

    store
        .create_recipe(&recipe)
        .api_err("Failed to create recipe")?;

    tracing::info!("Recipe {} created by {}", recipe.id, recipe.user_id);

    Ok::<_, ApiError>((StatusCode::CREATED, Json(ApiResponse::success(recipe))))
}

pub async fn update_recipe(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(form): Json<RecipeForm>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let mut recipe = require_recipe_owner(store, &auth.account, &id, "edit this recipe")?;
    let draft = form.normalize().map_err(ApiError::from)?;

    recipe.title = draft.title;
    recipe.description = draft.description;
    recipe.ingredients = draft.ingredients;
    recipe.instructions = draft.instructions;
    recipe.cooking_time = draft.cooking_time;
    recipe.difficulty = draft.difficulty;
    recipe.category = draft.category;
    recipe.updated_at = Utc::now();

    store
        .update_recipe(&recipe)
        .api_err("Failed to update recipe")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(recipe)))
}

pub async fn delete_recipe(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    let recipe = require_recipe_owner(store, &auth.account, &id, "delete this recipe")?;

    store
        .delete_recipe(&recipe.id)
        .api_err("Failed to delete recipe")?;

    tracing::info!("Recipe {} deleted", recipe.id);

    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}
