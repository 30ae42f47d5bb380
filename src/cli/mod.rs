mod auth;
mod comment;
mod commands;
pub mod credentials;
pub mod http_client;
mod like;
pub mod pickers;
mod profile;
pub mod recipe;

pub use auth::{run_login, run_logout, run_signup, run_whoami};
pub use comment::{run_comment_add, run_comment_delete, run_comment_list};
pub use commands::{
    CommentCommands, FilterArgs, ProfileCommands, RecipeCommands, RecipeFields, ScopeArg,
};
pub use like::{run_like, run_toggle_like, run_unlike};
pub use profile::{run_profile_show, run_profile_update};
pub use recipe::{
    run_browse, run_recipe_create, run_recipe_delete, run_recipe_edit, run_recipe_show,
    run_saved,
};

use std::path::Path;

use crate::store::{SqliteStore, Store};

/// Opens the database in `data_dir`, failing unless `recipebox init` ran there.
pub fn open_store(data_dir: &Path) -> anyhow::Result<SqliteStore> {
    let db_path = data_dir.join("recipebox.db");

    if !db_path.exists() {
        anyhow::bail!(
            "Database not found at {}. Run 'recipebox init' first.",
            db_path.display()
        );
    }

    let store = SqliteStore::new(&db_path)?;
    if !store.is_initialized()? {
        anyhow::bail!(
            "Database at {} is not initialized. Run 'recipebox init' first.",
            db_path.display()
        );
    }
    Ok(store)
}
