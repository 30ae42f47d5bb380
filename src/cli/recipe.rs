use inquire::{Select, Text};

use super::commands::{FilterArgs, RecipeFields};
use super::credentials::load_credentials;
use super::http_client::{ApiClient, query_string};
use super::pickers::{confirm_action, pick_recipe, print_comment_list, print_recipe_list};
use crate::types::{
    CommentWithAuthor, Difficulty, Recipe, RecipeDetail, RecipeFilter, RecipeForm, RecipeScope,
    RecipeSummary, categories, parse_cooking_time,
};

pub(crate) fn recipe_path(id: &str) -> String {
    format!("/recipes/{}", urlencoding::encode(id))
}

pub(crate) fn fetch_recipes(
    client: &ApiClient,
    scope: RecipeScope,
) -> anyhow::Result<Vec<RecipeSummary>> {
    let path = format!(
        "/recipes{}",
        query_string(&[("scope", Some(scope.as_str()))])
    );
    client.get(&path)
}

pub(crate) fn fetch_detail(client: &ApiClient, id: &str) -> anyhow::Result<RecipeDetail> {
    client.get(&recipe_path(id))
}

fn print_filtered(recipes: Vec<RecipeSummary>, args: &FilterArgs) -> anyhow::Result<()> {
    let filter = RecipeFilter {
        search: args.search.clone(),
        category: args.category.clone(),
        difficulty: args.difficulty.clone(),
    };
    let available = categories(&recipes);
    let total = recipes.len();
    let recipes = filter.apply(recipes);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
        return Ok(());
    }

    print_recipe_list(&recipes);
    if filter.is_active() {
        println!("Showing {} of {} recipes", recipes.len(), total);
    }
    if !available.is_empty() {
        println!("Categories: {}", available.join(", "));
    }
    Ok(())
}

pub fn run_browse(scope: RecipeScope, args: FilterArgs) -> anyhow::Result<()> {
    let creds = load_credentials()?;
    let client = ApiClient::new(&creds)?;

    let recipes = fetch_recipes(&client, scope)?;
    print_filtered(recipes, &args)
}

pub fn run_saved(args: FilterArgs) -> anyhow::Result<()> {
    let creds = load_credentials()?;
    let client = ApiClient::new(&creds)?;

    let recipes: Vec<RecipeSummary> = client.get("/recipes/saved")?;
    print_filtered(recipes, &args)
}

pub fn run_recipe_show(id: String, json: bool) -> anyhow::Result<()> {
    let creds = load_credentials()?;
    let client = ApiClient::new(&creds)?;

    let detail = fetch_detail(&client, &id)?;
    let comments: Vec<CommentWithAuthor> =
        client.get(&format!("{}/comments", recipe_path(&id)))?;

    if json {
        let value = serde_json::json!({ "recipe": detail, "comments": comments });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let summary = &detail.summary;
    let recipe = &summary.recipe;

    println!();
    println!("{}", recipe.title);
    println!("by {}", summary.author.display_name());
    if let Some(description) = &recipe.description {
        println!();
        println!("{description}");
    }
    println!();
    let mut facts = Vec::new();
    if let Some(minutes) = recipe.cooking_time {
        facts.push(format!("{minutes} min"));
    }
    if let Some(difficulty) = recipe.difficulty {
        facts.push(difficulty.to_string());
    }
    if let Some(category) = &recipe.category {
        facts.push(category.clone());
    }
    let liked = if summary.is_liked_by_user {
        " (you like this)"
    } else {
        ""
    };
    facts.push(format!("{} likes{liked}", summary.likes_count));
    println!("{}", facts.join(" · "));

    println!();
    println!("Ingredients:");
    for ingredient in &detail.ingredient_list {
        println!("  - {ingredient}");
    }
    println!();
    println!("Instructions:");
    println!("{}", recipe.instructions);
    println!();
    println!("Comments:");
    print_comment_list(&comments);
    println!();

    Ok(())
}

/// Uses `given`, else prompts (with `default`), else falls back to `default`.
fn text_field(
    label: &str,
    given: Option<String>,
    default: Option<&str>,
    non_interactive: bool,
) -> anyhow::Result<Option<String>> {
    if given.is_some() {
        return Ok(given);
    }
    if non_interactive {
        return Ok(default.map(str::to_string));
    }
    let mut prompt = Text::new(label);
    if let Some(default) = default {
        prompt = prompt.with_default(default);
    }
    let input = prompt.prompt()?;
    Ok(if input.trim().is_empty() {
        None
    } else {
        Some(input)
    })
}

fn ingredients_field(
    given: Vec<String>,
    existing: &[String],
    non_interactive: bool,
) -> anyhow::Result<Vec<String>> {
    if !given.is_empty() {
        return Ok(given);
    }
    if non_interactive {
        return Ok(existing.to_vec());
    }
    if !existing.is_empty() {
        println!("Current ingredients:");
        for ingredient in existing {
            println!("  - {ingredient}");
        }
        let keep = inquire::Confirm::new("Keep these ingredients?")
            .with_default(true)
            .prompt()?;
        if keep {
            return Ok(existing.to_vec());
        }
    }

    let mut ingredients = Vec::new();
    loop {
        let input = Text::new("Ingredient:")
            .with_help_message("Leave empty to finish")
            .prompt()?;
        if input.trim().is_empty() {
            break;
        }
        ingredients.push(input);
    }
    Ok(ingredients)
}

fn difficulty_field(
    given: Option<String>,
    existing: Option<Difficulty>,
    non_interactive: bool,
) -> anyhow::Result<Option<String>> {
    if given.is_some() {
        return Ok(given);
    }
    let existing = existing.map(|d| d.as_str().to_string());
    if non_interactive {
        return Ok(existing);
    }

    let mut options = vec!["(none)"];
    options.extend(Difficulty::ALL.iter().map(|d| d.as_str()));
    let start = existing
        .as_deref()
        .and_then(|e| options.iter().position(|o| *o == e))
        .unwrap_or(0);

    let selected = Select::new("Difficulty:", options)
        .with_starting_cursor(start)
        .prompt()?;
    Ok((selected != "(none)").then(|| selected.to_string()))
}

/// Collects a recipe form from flags and prompts. When editing, `existing`
/// supplies defaults for anything not given.
fn collect_form(
    fields: RecipeFields,
    existing: Option<&RecipeDetail>,
) -> anyhow::Result<RecipeForm> {
    let current: Option<&Recipe> = existing.map(|d| &d.summary.recipe);
    let ni = fields.non_interactive;

    let title = text_field("Title:", fields.title, current.map(|r| r.title.as_str()), ni)?;
    let description = text_field(
        "Description (optional):",
        fields.description,
        current.and_then(|r| r.description.as_deref()),
        ni,
    )?;
    let ingredients = ingredients_field(
        fields.ingredients,
        existing.map_or(&[][..], |d| d.ingredient_list.as_slice()),
        ni,
    )?;
    let instructions = text_field(
        "Instructions:",
        fields.instructions,
        current.map(|r| r.instructions.as_str()),
        ni,
    )?;
    let current_time = current.and_then(|r| r.cooking_time).map(|t| t.to_string());
    let cooking_time = text_field(
        "Cooking time in minutes (optional):",
        fields.cooking_time,
        current_time.as_deref(),
        ni,
    )?;
    let difficulty = difficulty_field(fields.difficulty, current.and_then(|r| r.difficulty), ni)?;
    let category = text_field(
        "Category (optional):",
        fields.category,
        current.and_then(|r| r.category.as_deref()),
        ni,
    )?;

    Ok(RecipeForm {
        title: title.unwrap_or_default(),
        description,
        ingredients,
        instructions: instructions.unwrap_or_default(),
        cooking_time: cooking_time.as_deref().and_then(parse_cooking_time),
        difficulty,
        category,
    })
}

pub fn run_recipe_create(fields: RecipeFields) -> anyhow::Result<()> {
    let creds = load_credentials()?;

    let form = collect_form(fields, None)?;
    // Reject bad input before anything is sent.
    form.normalize()?;

    let client = ApiClient::new(&creds)?;
    let recipe: Recipe = client.post("/recipes", &form)?;

    println!();
    println!("Shared recipe '{}'", recipe.title);
    println!("  id: {}", recipe.id);
    println!();

    Ok(())
}

fn resolve_own_recipe(
    client: &ApiClient,
    id: Option<String>,
    non_interactive: bool,
    action: &str,
) -> anyhow::Result<Option<String>> {
    if let Some(id) = id {
        return Ok(Some(id));
    }
    if non_interactive {
        anyhow::bail!("Recipe ID is required in non-interactive mode");
    }
    let mine = fetch_recipes(client, RecipeScope::Mine)?;
    if mine.is_empty() {
        println!("You have not shared any recipes yet.");
        return Ok(None);
    }
    Ok(pick_recipe(&format!("Select recipe to {action}:"), mine)?.map(|s| s.recipe.id))
}

pub fn run_recipe_edit(id: Option<String>, fields: RecipeFields) -> anyhow::Result<()> {
    let creds = load_credentials()?;
    let client = ApiClient::new(&creds)?;

    let Some(id) = resolve_own_recipe(&client, id, fields.non_interactive, "edit")? else {
        return Ok(());
    };

    let detail = fetch_detail(&client, &id)?;
    if !detail.is_owner {
        anyhow::bail!("Only the recipe owner can edit this recipe");
    }

    let form = collect_form(fields, Some(&detail))?;
    form.normalize()?;

    let recipe: Recipe = client.put(&recipe_path(&id), &form)?;

    println!();
    println!("Updated recipe '{}'", recipe.title);
    println!();

    Ok(())
}

pub fn run_recipe_delete(
    id: Option<String>,
    yes: bool,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let creds = load_credentials()?;
    let client = ApiClient::new(&creds)?;

    let Some(id) = resolve_own_recipe(&client, id, non_interactive, "delete")? else {
        return Ok(());
    };

    let detail = fetch_detail(&client, &id)?;
    let title = detail.summary.recipe.title;
    if !detail.is_owner {
        anyhow::bail!("Only the recipe owner can delete this recipe");
    }

    if !confirm_action(&format!("Delete recipe '{title}'?"), yes, non_interactive)? {
        println!("Cancelled.");
        return Ok(());
    }

    client.delete(&recipe_path(&id))?;

    println!();
    println!("Deleted recipe '{title}'");
    println!();

    Ok(())
}
