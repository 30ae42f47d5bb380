use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Difficulty;

/// Auth identity. Everything user-facing hangs off the matching [`Profile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    #[serde(skip)]
    pub token_hash: String,
    #[serde(skip)]
    pub token_lookup: String,
    pub account_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of a profile shown next to recipes and comments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub username: Option<String>,
    pub full_name: Option<String>,
}

impl Author {
    /// Full name, then username, then "Anonymous".
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.username.as_deref().filter(|s| !s.is_empty()))
            .unwrap_or("Anonymous")
    }
}

impl From<&Profile> for Author {
    fn from(profile: &Profile) -> Self {
        Self {
            username: profile.username.clone(),
            full_name: profile.full_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw stored text; see [`super::parse_ingredients`].
    pub ingredients: String,
    pub instructions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooking_time: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A recipe as it appears in list views, with author and like state
/// computed for the requesting viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSummary {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub author: Author,
    pub likes_count: i64,
    pub is_liked_by_user: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub summary: RecipeSummary,
    pub ingredient_list: Vec<String>,
    pub is_owner: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    pub id: String,
    pub recipe_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub recipe_id: String,
    pub user_id: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentWithAuthor {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: Author,
    /// True when the viewer owns the recipe the comment belongs to.
    #[serde(default)]
    pub can_delete: bool,
}

/// Like state for one recipe from one viewer's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeState {
    pub likes_count: i64,
    pub is_liked: bool,
}

/// Which recipes a list query returns relative to the viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeScope {
    #[default]
    All,
    Mine,
    Others,
}

impl RecipeScope {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RecipeScope::All => "all",
            RecipeScope::Mine => "mine",
            RecipeScope::Others => "others",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_display_name_fallbacks() {
        let both = Author {
            username: Some("jo".into()),
            full_name: Some("Jo Cook".into()),
        };
        assert_eq!(both.display_name(), "Jo Cook");

        let username_only = Author {
            username: Some("jo".into()),
            full_name: None,
        };
        assert_eq!(username_only.display_name(), "jo");

        let empty_name = Author {
            username: Some("jo".into()),
            full_name: Some(String::new()),
        };
        assert_eq!(empty_name.display_name(), "jo");

        assert_eq!(Author::default().display_name(), "Anonymous");
    }

    #[test]
    fn test_scope_serde() {
        let scope: RecipeScope = serde_json::from_str("\"others\"").unwrap();
        assert_eq!(scope, RecipeScope::Others);
        assert_eq!(RecipeScope::default(), RecipeScope::All);
    }
}
