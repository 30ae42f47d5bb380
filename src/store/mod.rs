mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;
    fn is_initialized(&self) -> Result<bool>;

    // Account operations
    fn create_account(&self, account: &Account) -> Result<()>;
    fn get_account(&self, id: &str) -> Result<Option<Account>>;
    fn get_account_by_email(&self, email: &str) -> Result<Option<Account>>;

    // Session operations
    fn create_session(&self, session: &Session) -> Result<()>;
    fn get_session_by_lookup(&self, lookup: &str) -> Result<Option<Session>>;
    fn delete_session(&self, id: &str) -> Result<bool>;
    fn update_session_last_used(&self, id: &str) -> Result<()>;
    fn delete_expired_sessions(&self) -> Result<usize>;

    // Profile operations
    fn create_profile(&self, profile: &Profile) -> Result<()>;
    fn get_profile(&self, id: &str) -> Result<Option<Profile>>;
    fn update_profile(&self, profile: &Profile) -> Result<()>;

    // Recipe operations
    fn create_recipe(&self, recipe: &Recipe) -> Result<()>;
    fn get_recipe(&self, id: &str) -> Result<Option<Recipe>>;
    fn update_recipe(&self, recipe: &Recipe) -> Result<()>;
    fn delete_recipe(&self, id: &str) -> Result<bool>;

    /// Lists recipes newest first with author and like state for `viewer_id`,
    /// computed in one aggregated query.
    fn list_recipe_summaries(&self, viewer_id: &str, scope: RecipeScope)
    -> Result<Vec<RecipeSummary>>;
    fn get_recipe_summary(&self, viewer_id: &str, id: &str) -> Result<Option<RecipeSummary>>;
    /// Recipes liked by `viewer_id`, most recently liked first.
    fn list_saved_recipes(&self, viewer_id: &str) -> Result<Vec<RecipeSummary>>;

    // Like operations (unique per recipe/user pair)
    /// Returns false if the pair was already liked.
    fn add_like(&self, like: &Like) -> Result<bool>;
    fn remove_like(&self, recipe_id: &str, user_id: &str) -> Result<bool>;
    fn count_likes(&self, recipe_id: &str) -> Result<i64>;
    fn has_liked(&self, recipe_id: &str, user_id: &str) -> Result<bool>;

    // Comment operations
    fn create_comment(&self, comment: &Comment) -> Result<()>;
    fn get_comment(&self, id: &str) -> Result<Option<Comment>>;
    /// Comments oldest first.
    fn list_comments(&self, recipe_id: &str) -> Result<Vec<CommentWithAuthor>>;
    fn delete_comment(&self, id: &str) -> Result<bool>;
}
