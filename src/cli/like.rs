use serde::Serialize;

use super::credentials::load_credentials;
use super::http_client::ApiClient;
use super::recipe::{fetch_detail, recipe_path};
use crate::types::LikeState;

#[derive(Serialize)]
struct ToggleLikeRequest {
    liked: bool,
}

fn print_like_state(title: &str, state: LikeState) {
    let verb = if state.is_liked { "Liked" } else { "Unliked" };
    let noun = if state.likes_count == 1 { "like" } else { "likes" };
    println!();
    println!("{verb} '{title}' ({} {noun})", state.likes_count);
    println!();
}

pub fn run_like(id: String) -> anyhow::Result<()> {
    let creds = load_credentials()?;
    let client = ApiClient::new(&creds)?;

    let detail = fetch_detail(&client, &id)?;
    let state: LikeState = client.put_empty(&format!("{}/like", recipe_path(&id)))?;

    print_like_state(&detail.summary.recipe.title, state);
    Ok(())
}

pub fn run_unlike(id: String) -> anyhow::Result<()> {
    let creds = load_credentials()?;
    let client = ApiClient::new(&creds)?;

    let detail = fetch_detail(&client, &id)?;
    let state: LikeState = client.delete_with(&format!("{}/like", recipe_path(&id)))?;

    print_like_state(&detail.summary.recipe.title, state);
    Ok(())
}

/// Flips whatever like state the server last reported for this recipe.
pub fn run_toggle_like(id: String) -> anyhow::Result<()> {
    let creds = load_credentials()?;
    let client = ApiClient::new(&creds)?;

    let detail = fetch_detail(&client, &id)?;
    let state: LikeState = client.post(
        &format!("{}/like/toggle", recipe_path(&id)),
        &ToggleLikeRequest {
            liked: detail.summary.is_liked_by_user,
        },
    )?;

    print_like_state(&detail.summary.recipe.title, state);
    Ok(())
}
