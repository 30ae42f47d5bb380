mod difficulty;
mod filter;
mod ingredients;
mod models;
mod recipe_form;

pub use difficulty::Difficulty;
pub use filter::{RecipeFilter, categories};
pub use ingredients::{encode_ingredients, parse_ingredients};
pub use models::*;
pub use recipe_form::{RecipeDraft, RecipeForm, parse_cooking_time};
