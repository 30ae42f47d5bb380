mod access;
mod comments;
mod likes;
mod recipes;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::server::AppState;

pub fn cookbook_router() -> Router<Arc<AppState>> {
    Router::new()
        // Recipes
        .route("/recipes", get(recipes::list_recipes))
        .route("/recipes", post(recipes::create_recipe))
        .route("/recipes/saved", get(recipes::list_saved_recipes))
        .route("/recipes/{id}", get(recipes::get_recipe))
        .route("/recipes/{id}", put(recipes::update_recipe))
        .route("/recipes/{id}", delete(recipes::delete_recipe))
        // Likes (one per user per recipe)
        .route("/recipes/{id}/like", put(likes::like_recipe))
        .route("/recipes/{id}/like", delete(likes::unlike_recipe))
        .route("/recipes/{id}/like/toggle", post(likes::toggle_like))
        // Comments
        .route("/recipes/{id}/comments", get(comments::list_comments))
        .route("/recipes/{id}/comments", post(comments::add_comment))
        .route(
            "/recipes/{id}/comments/{comment_id}",
            delete(comments::delete_comment),
        )
}
