use inquire::Text;
use serde::Serialize;

use super::credentials::load_credentials;
use super::http_client::ApiClient;
use super::pickers::{confirm_action, pick_comment, print_comment_list};
use super::recipe::recipe_path;
use crate::types::CommentWithAuthor;

#[derive(Serialize)]
struct CreateCommentRequest {
    comment: String,
}

fn comments_path(recipe_id: &str) -> String {
    format!("{}/comments", recipe_path(recipe_id))
}

fn fetch_comments(client: &ApiClient, recipe_id: &str) -> anyhow::Result<Vec<CommentWithAuthor>> {
    client.get(&comments_path(recipe_id))
}

fn print_comments(comments: &[CommentWithAuthor]) {
    println!();
    print_comment_list(comments);
    println!();
}

pub fn run_comment_list(recipe_id: String) -> anyhow::Result<()> {
    let creds = load_credentials()?;
    let client = ApiClient::new(&creds)?;

    print_comments(&fetch_comments(&client, &recipe_id)?);
    Ok(())
}

pub fn run_comment_add(
    recipe_id: String,
    text: Option<String>,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let creds = load_credentials()?;

    let text = if let Some(t) = text {
        t
    } else if non_interactive {
        anyhow::bail!("Comment text is required in non-interactive mode");
    } else {
        Text::new("Comment:").prompt()?
    };
    let text = text.trim().to_string();
    if text.is_empty() {
        anyhow::bail!("Comment cannot be empty");
    }

    let client = ApiClient::new(&creds)?;
    let _created: CommentWithAuthor = client.post(
        &comments_path(&recipe_id),
        &CreateCommentRequest { comment: text },
    )?;

    println!();
    println!("Comment added.");
    print_comments(&fetch_comments(&client, &recipe_id)?);
    Ok(())
}

pub fn run_comment_delete(
    recipe_id: String,
    comment_id: Option<String>,
    yes: bool,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let creds = load_credentials()?;
    let client = ApiClient::new(&creds)?;

    let comment_id = if let Some(id) = comment_id {
        id
    } else if non_interactive {
        anyhow::bail!("Comment ID is required in non-interactive mode");
    } else {
        let comments = fetch_comments(&client, &recipe_id)?;
        if comments.first().is_some_and(|c| !c.can_delete) {
            anyhow::bail!("Only the recipe owner can delete comments");
        }
        match pick_comment(comments)? {
            Some(c) => c.comment.id,
            None => {
                println!("No comments to delete.");
                return Ok(());
            }
        }
    };

    if !confirm_action("Delete this comment?", yes, non_interactive)? {
        println!("Cancelled.");
        return Ok(());
    }

    client.delete(&format!(
        "{}/{}",
        comments_path(&recipe_id),
        urlencoding::encode(&comment_id)
    ))?;

    println!();
    println!("Comment deleted.");
    print_comments(&fetch_comments(&client, &recipe_id)?);
    Ok(())
}
