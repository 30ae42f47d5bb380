use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};
use crate::store::Store;
use crate::types::{Account, Recipe};

pub fn load_recipe(store: &dyn Store, id: &str) -> Result<Recipe, ApiError> {
    store
        .get_recipe(id)
        .api_err("Failed to get recipe")?
        .or_not_found("Recipe not found")
}

/// Loads a recipe and fails with 403 unless `account` created it.
pub fn require_recipe_owner(
    store: &dyn Store,
    account: &Account,
    id: &str,
    action: &str,
) -> Result<Recipe, ApiError> {
    let recipe = load_recipe(store, id)?;
    if recipe.user_id != account.id {
        return Err(ApiError::forbidden(format!(
            "Only the recipe owner can {action}"
        )));
    }
    Ok(recipe)
}
