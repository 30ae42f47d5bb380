use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{Recipe, RecipeSummary};

/// In-memory filter over an already-fetched recipe list.
///
/// Each field is an independent predicate; empty or blank values are inactive.
/// Active predicates are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeFilter {
    /// Case-insensitive substring of title, description or category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Exact category match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Case-insensitive difficulty match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl RecipeFilter {
    #[must_use]
    pub fn is_active(&self) -> bool {
        active(&self.search).is_some()
            || self.category.as_deref().is_some_and(|s| !s.is_empty())
            || active(&self.difficulty).is_some()
    }

    #[must_use]
    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.matches_search(recipe) && self.matches_category(recipe) && self.matches_difficulty(recipe)
    }

    fn matches_search(&self, recipe: &Recipe) -> bool {
        let Some(query) = active(&self.search) else {
            return true;
        };
        let query = query.to_lowercase();

        recipe.title.to_lowercase().contains(&query)
            || recipe
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&query))
            || recipe
                .category
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&query))
    }

    fn matches_category(&self, recipe: &Recipe) -> bool {
        match self.category.as_deref().filter(|s| !s.is_empty()) {
            Some(category) => recipe.category.as_deref() == Some(category),
            None => true,
        }
    }

    fn matches_difficulty(&self, recipe: &Recipe) -> bool {
        match active(&self.difficulty) {
            Some(wanted) => recipe
                .difficulty
                .is_some_and(|d| d.as_str().eq_ignore_ascii_case(wanted)),
            None => true,
        }
    }

    /// Keeps the recipes matching every active predicate, preserving order.
    #[must_use]
    pub fn apply(&self, recipes: Vec<RecipeSummary>) -> Vec<RecipeSummary> {
        if !self.is_active() {
            return recipes;
        }
        recipes
            .into_iter()
            .filter(|r| self.matches(&r.recipe))
            .collect()
    }
}

/// Distinct non-empty categories of the given recipes, sorted.
#[must_use]
pub fn categories(recipes: &[RecipeSummary]) -> Vec<String> {
    recipes
        .iter()
        .filter_map(|r| r.recipe.category.as_deref())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::types::{Author, Difficulty};

    fn summary(
        id: &str,
        title: &str,
        description: Option<&str>,
        category: Option<&str>,
        difficulty: Option<Difficulty>,
    ) -> RecipeSummary {
        let now = Utc::now();
        RecipeSummary {
            recipe: Recipe {
                id: id.to_string(),
                user_id: "user-1".to_string(),
                title: title.to_string(),
                description: description.map(str::to_string),
                ingredients: "[]".to_string(),
                instructions: "Cook it.".to_string(),
                cooking_time: None,
                difficulty,
                category: category.map(str::to_string),
                created_at: now,
                updated_at: now,
            },
            author: Author::default(),
            likes_count: 0,
            is_liked_by_user: false,
        }
    }

    fn fixture() -> Vec<RecipeSummary> {
        vec![
            summary("1", "Tomato Pasta", Some("Quick weeknight dinner"), Some("Pasta"), Some(Difficulty::Easy)),
            summary("2", "Beef Stew", Some("Slow cooked"), Some("Soup"), Some(Difficulty::Medium)),
            summary("3", "Chocolate Cake", None, Some("Dessert"), Some(Difficulty::Hard)),
            summary("4", "Pesto", Some("Goes with pasta"), None, None),
            summary("5", "Carbonara", None, Some("Pasta"), Some(Difficulty::Medium)),
        ]
    }

    fn ids(recipes: &[RecipeSummary]) -> Vec<&str> {
        recipes.iter().map(|r| r.recipe.id.as_str()).collect()
    }

    #[test]
    fn test_inactive_filter_keeps_everything() {
        let filter = RecipeFilter {
            search: Some("   ".into()),
            category: Some(String::new()),
            difficulty: None,
        };
        assert!(!filter.is_active());
        assert_eq!(filter.apply(fixture()).len(), 5);
    }

    #[test]
    fn test_search_matches_title_description_or_category() {
        let filter = RecipeFilter {
            search: Some("PASTA".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(fixture())), vec!["1", "4", "5"]);
    }

    #[test]
    fn test_category_is_exact() {
        let filter = RecipeFilter {
            category: Some("pasta".into()),
            ..Default::default()
        };
        assert!(filter.apply(fixture()).is_empty());

        let filter = RecipeFilter {
            category: Some("Pasta".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(fixture())), vec!["1", "5"]);
    }

    #[test]
    fn test_difficulty_is_case_insensitive() {
        let filter = RecipeFilter {
            difficulty: Some("MEDIUM".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(fixture())), vec!["2", "5"]);
    }

    #[test]
    fn test_predicates_combine_with_and() {
        let filter = RecipeFilter {
            search: Some("pasta".into()),
            category: Some("Pasta".into()),
            difficulty: Some("medium".into()),
        };
        assert_eq!(ids(&filter.apply(fixture())), vec!["5"]);
    }

    #[test]
    fn test_filtered_set_is_subset_satisfying_all_predicates() {
        let searches = [None, Some("pasta"), Some("cake"), Some("o"), Some("zzz")];
        let categories = [None, Some("Pasta"), Some("Dessert"), Some("Nope")];
        let difficulties = [None, Some("easy"), Some("Medium"), Some("HARD")];

        let all = fixture();
        for search in searches {
            for category in categories {
                for difficulty in difficulties {
                    let filter = RecipeFilter {
                        search: search.map(str::to_string),
                        category: category.map(str::to_string),
                        difficulty: difficulty.map(str::to_string),
                    };
                    let filtered = filter.apply(all.clone());

                    for r in &filtered {
                        assert!(all.iter().any(|a| a.recipe.id == r.recipe.id));
                        if let Some(q) = search {
                            let q = q.to_lowercase();
                            let hay = [
                                Some(r.recipe.title.as_str()),
                                r.recipe.description.as_deref(),
                                r.recipe.category.as_deref(),
                            ];
                            assert!(hay.iter().flatten().any(|h| h.to_lowercase().contains(&q)));
                        }
                        if let Some(c) = category {
                            assert_eq!(r.recipe.category.as_deref(), Some(c));
                        }
                        if let Some(d) = difficulty {
                            assert!(r.recipe.difficulty.unwrap().as_str().eq_ignore_ascii_case(d));
                        }
                    }

                    let expected = all.iter().filter(|a| filter.matches(&a.recipe)).count();
                    assert_eq!(filtered.len(), expected);
                }
            }
        }
    }

    #[test]
    fn test_categories_distinct_sorted() {
        assert_eq!(categories(&fixture()), vec!["Dessert", "Pasta", "Soup"]);
    }
}
