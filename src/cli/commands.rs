use clap::{Args, Subcommand};

use crate::types::RecipeScope;

/// Filters applied locally to a fetched recipe list.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Case-insensitive text matched against title, description and category
    #[arg(long, short)]
    pub search: Option<String>,

    /// Exact category name
    #[arg(long, short)]
    pub category: Option<String>,

    /// easy, medium or hard
    #[arg(long, short)]
    pub difficulty: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Recipe fields for create and edit. Missing fields are prompted for
/// unless --non-interactive is set.
#[derive(Args, Debug, Default, Clone)]
pub struct RecipeFields {
    /// Recipe title
    #[arg(long)]
    pub title: Option<String>,

    /// Short description
    #[arg(long)]
    pub description: Option<String>,

    /// One ingredient; repeat for each
    #[arg(long = "ingredient", short = 'i')]
    pub ingredients: Vec<String>,

    /// Preparation steps
    #[arg(long)]
    pub instructions: Option<String>,

    /// Cooking time in minutes (e.g. "45" or "45 min")
    #[arg(long)]
    pub cooking_time: Option<String>,

    /// easy, medium or hard
    #[arg(long)]
    pub difficulty: Option<String>,

    /// Category name
    #[arg(long)]
    pub category: Option<String>,

    /// Skip interactive prompts
    #[arg(long)]
    pub non_interactive: bool,
}

#[derive(Subcommand)]
pub enum RecipeCommands {
    /// Show a recipe with its ingredients, likes and comments
    Show {
        /// Recipe ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Share a new recipe
    Create {
        #[command(flatten)]
        fields: RecipeFields,
    },

    /// Edit one of your recipes
    Edit {
        /// Recipe ID (prompts with your recipes if omitted)
        id: Option<String>,

        #[command(flatten)]
        fields: RecipeFields,
    },

    /// Delete one of your recipes
    Delete {
        /// Recipe ID (prompts with your recipes if omitted)
        id: Option<String>,

        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },
}

#[derive(Subcommand)]
pub enum CommentCommands {
    /// List comments on a recipe, oldest first
    List {
        /// Recipe ID
        recipe_id: String,
    },

    /// Comment on a recipe
    Add {
        /// Recipe ID
        recipe_id: String,

        /// Comment text (prompts if omitted)
        text: Option<String>,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },

    /// Delete a comment on one of your recipes
    Delete {
        /// Recipe ID
        recipe_id: String,

        /// Comment ID (prompts if omitted)
        comment_id: Option<String>,

        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show your profile
    Show,

    /// Change your username or full name
    Update {
        /// New username
        #[arg(long)]
        username: Option<String>,

        /// New full name
        #[arg(long)]
        full_name: Option<String>,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },
}

/// Which recipes `browse` lists.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default)]
pub enum ScopeArg {
    #[default]
    All,
    Mine,
    Others,
}

impl From<ScopeArg> for RecipeScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::All => RecipeScope::All,
            ScopeArg::Mine => RecipeScope::Mine,
            ScopeArg::Others => RecipeScope::Others,
        }
    }
}
