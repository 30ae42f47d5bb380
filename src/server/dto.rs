use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Account, Profile, RecipeFilter, RecipeScope};

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for UserResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            email: account.email.clone(),
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub user: UserResponse,
    pub profile: Profile,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListRecipesParams {
    #[serde(default)]
    pub scope: Option<RecipeScope>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl ListRecipesParams {
    #[must_use]
    pub fn filter(&self) -> RecipeFilter {
        RecipeFilter {
            search: self.search.clone(),
            category: self.category.clone(),
            difficulty: self.difficulty.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ToggleLikeRequest {
    /// The liked state the client currently shows.
    pub liked: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub comment: String,
}
