use std::fmt;

use chrono::{DateTime, Utc};
use inquire::Select;

use crate::types::{CommentWithAuthor, RecipeSummary};

/// Recipe line for lists and pickers
pub struct RecipeDisplay {
    pub summary: RecipeSummary,
}

impl fmt::Display for RecipeDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let recipe = &self.summary.recipe;
        let heart = if self.summary.is_liked_by_user {
            "♥"
        } else {
            "♡"
        };
        write!(
            f,
            "{}  by {}  {} {}",
            recipe.title,
            self.summary.author.display_name(),
            heart,
            self.summary.likes_count
        )?;
        if let Some(difficulty) = recipe.difficulty {
            write!(f, "  [{difficulty}]")?;
        }
        if let Some(minutes) = recipe.cooking_time {
            write!(f, "  {minutes} min")?;
        }
        if let Some(category) = &recipe.category {
            write!(f, "  #{category}")?;
        }
        Ok(())
    }
}

/// Comment with author and age for display
pub struct CommentDisplay {
    pub comment: CommentWithAuthor,
}

impl fmt::Display for CommentDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.comment.author.display_name(),
            format_relative_time(&self.comment.comment.created_at),
            self.comment.comment.comment
        )
    }
}

pub fn print_recipe_list(recipes: &[RecipeSummary]) {
    if recipes.is_empty() {
        println!("No recipes found.");
        return;
    }
    println!();
    for summary in recipes {
        let display = RecipeDisplay {
            summary: summary.clone(),
        };
        println!("  {display}");
        println!("    id: {}", summary.recipe.id);
    }
    println!();
}

pub fn print_comment_list(comments: &[CommentWithAuthor]) {
    if comments.is_empty() {
        println!("No comments yet.");
        return;
    }
    for comment in comments {
        let display = CommentDisplay {
            comment: comment.clone(),
        };
        if comment.can_delete {
            println!("  {display}  [{}]", comment.comment.id);
        } else {
            println!("  {display}");
        }
    }
}

/// Format a datetime as relative time (e.g., "2 days ago")
#[must_use]
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let now = Utc::now();
    let diff = now.signed_duration_since(*dt);

    if diff.num_seconds() < 0 {
        return "in the future".to_string();
    }

    if diff.num_seconds() < 60 {
        return "just now".to_string();
    }

    if diff.num_minutes() < 60 {
        let mins = diff.num_minutes();
        return if mins == 1 {
            "1 minute ago".to_string()
        } else {
            format!("{mins} minutes ago")
        };
    }

    if diff.num_hours() < 24 {
        let hours = diff.num_hours();
        return if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{hours} hours ago")
        };
    }

    if diff.num_days() < 30 {
        let days = diff.num_days();
        return if days == 1 {
            "1 day ago".to_string()
        } else {
            format!("{days} days ago")
        };
    }

    if diff.num_days() < 365 {
        let months = diff.num_days() / 30;
        return if months == 1 {
            "1 month ago".to_string()
        } else {
            format!("{months} months ago")
        };
    }

    let years = diff.num_days() / 365;
    if years == 1 {
        "1 year ago".to_string()
    } else {
        format!("{years} years ago")
    }
}

/// Prompts for one of `recipes`. Returns None if the list is empty.
pub fn pick_recipe(
    message: &str,
    recipes: Vec<RecipeSummary>,
) -> anyhow::Result<Option<RecipeSummary>> {
    if recipes.is_empty() {
        return Ok(None);
    }

    let displays: Vec<RecipeDisplay> = recipes
        .into_iter()
        .map(|summary| RecipeDisplay { summary })
        .collect();

    let selected = Select::new(message, displays)
        .with_page_size(15)
        .with_vim_mode(true)
        .with_help_message("Type to filter, Enter to select")
        .prompt()?;

    Ok(Some(selected.summary))
}

pub fn pick_comment(comments: Vec<CommentWithAuthor>) -> anyhow::Result<Option<CommentWithAuthor>> {
    if comments.is_empty() {
        return Ok(None);
    }

    let displays: Vec<CommentDisplay> = comments
        .into_iter()
        .map(|comment| CommentDisplay { comment })
        .collect();

    let selected = Select::new("Select comment to delete:", displays)
        .with_page_size(15)
        .prompt()?;

    Ok(Some(selected.comment))
}

/// Request confirmation for a destructive operation
pub fn confirm_action(message: &str, yes: bool, non_interactive: bool) -> anyhow::Result<bool> {
    if yes {
        Ok(true)
    } else if non_interactive {
        anyhow::bail!("--yes is required for destructive operations in non-interactive mode");
    } else {
        Ok(inquire::Confirm::new(message)
            .with_default(false)
            .prompt()?)
    }
}
