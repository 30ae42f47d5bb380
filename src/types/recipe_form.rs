use serde::{Deserialize, Serialize};

use super::{Difficulty, encode_ingredients};
use crate::error::{Error, Result};

const MAX_TITLE_LEN: usize = 200;
const MAX_CATEGORY_LEN: usize = 64;

/// Recipe fields as a user typed them. Used for both create and edit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeForm {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooking_time: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A validated, normalized recipe ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub title: String,
    pub description: Option<String>,
    /// JSON array text.
    pub ingredients: String,
    pub instructions: String,
    pub cooking_time: Option<i32>,
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
}

fn trimmed_or_none(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl RecipeForm {
    /// Validates the form and normalizes it into a [`RecipeDraft`].
    pub fn normalize(&self) -> Result<RecipeDraft> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::Validation("Title is required".into()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(Error::Validation(format!(
                "Title cannot exceed {MAX_TITLE_LEN} characters"
            )));
        }

        if !self.ingredients.iter().any(|i| !i.trim().is_empty()) {
            return Err(Error::Validation("At least one ingredient is required".into()));
        }

        let instructions = self.instructions.trim();
        if instructions.is_empty() {
            return Err(Error::Validation("Instructions are required".into()));
        }

        if self.cooking_time.is_some_and(|t| t < 0) {
            return Err(Error::Validation("Cooking time cannot be negative".into()));
        }

        let difficulty = Difficulty::parse_optional(self.difficulty.as_deref().unwrap_or(""))
            .map_err(Error::Validation)?;

        let category = trimmed_or_none(self.category.as_deref());
        if category
            .as_deref()
            .is_some_and(|c| c.chars().count() > MAX_CATEGORY_LEN)
        {
            return Err(Error::Validation(format!(
                "Category cannot exceed {MAX_CATEGORY_LEN} characters"
            )));
        }

        Ok(RecipeDraft {
            title: title.to_string(),
            description: trimmed_or_none(self.description.as_deref()),
            ingredients: encode_ingredients(&self.ingredients),
            instructions: instructions.to_string(),
            cooking_time: self.cooking_time,
            difficulty,
            category,
        })
    }
}

/// Lenient integer parse for a cooking time typed as text.
///
/// Blank input is `None`. Otherwise the leading (optionally signed) run of
/// digits is parsed, so "45 min" is 45; input without leading digits is `None`.
#[must_use]
pub fn parse_cooking_time(input: &str) -> Option<i32> {
    let s = input.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(digits.len(), |(i, _)| i);
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i32>().ok().map(|n| sign * n)
}
