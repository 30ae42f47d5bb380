mod profile;
mod sessions;

pub(crate) use profile::ensure_profile;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::server::AppState;

pub fn account_router() -> Router<Arc<AppState>> {
    Router::new()
        // Sessions
        .route("/auth/signup", post(sessions::sign_up))
        .route("/auth/login", post(sessions::sign_in))
        .route("/auth/logout", post(sessions::sign_out))
        .route("/auth/user", get(sessions::current_user))
        // Profile of the signed-in user
        .route(
            "/profile",
            get(profile::get_profile).patch(profile::update_profile),
        )
}
