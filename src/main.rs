use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use recipebox::cli::{
    self, CommentCommands, FilterArgs, ProfileCommands, RecipeCommands, ScopeArg,
};
use recipebox::config::{DEFAULT_SESSION_TTL_DAYS, MAX_SESSION_TTL_DAYS, ServerConfig};
use recipebox::server::{AppState, create_router};
use recipebox::store::{SqliteStore, Store};
use recipebox::types::RecipeScope;

#[derive(Parser)]
#[command(name = "recipebox")]
#[command(about = "Share recipes, like them and talk about them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database in a data directory
    Init {
        /// Data directory for the database
        #[arg(long, env = "RECIPEBOX_DATA_DIR", default_value = "./data")]
        data_dir: String,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, env = "RECIPEBOX_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, env = "RECIPEBOX_PORT", default_value = "8080")]
        port: u16,

        /// Data directory for the database
        #[arg(long, env = "RECIPEBOX_DATA_DIR", default_value = "./data")]
        data_dir: String,

        /// Days a login session stays valid; 0 never expires
        #[arg(
            long,
            env = "RECIPEBOX_SESSION_TTL_DAYS",
            default_value_t = DEFAULT_SESSION_TTL_DAYS,
            value_parser = clap::value_parser!(i64).range(0..=MAX_SESSION_TTL_DAYS)
        )]
        session_ttl_days: i64,
    },

    /// Create an account
    Signup {
        /// Server URL (e.g. http://127.0.0.1:8080)
        #[arg(long)]
        server: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long, env = "RECIPEBOX_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },

    /// Log in and store a session token locally
    Login {
        /// Server URL (e.g. http://127.0.0.1:8080)
        #[arg(long)]
        server: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long, env = "RECIPEBOX_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },

    /// End the session and remove stored credentials
    Logout,

    /// Show the signed-in account
    Whoami,

    /// List recipes, newest first
    Browse {
        /// Whose recipes to list
        #[arg(long, value_enum, default_value_t = ScopeArg::All)]
        scope: ScopeArg,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// List your own recipes
    MyRecipes {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// List recipes you liked, most recently liked first
    Saved {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show, create, edit or delete recipes
    Recipe {
        #[command(subcommand)]
        command: RecipeCommands,
    },

    /// Like a recipe
    Like {
        /// Recipe ID
        id: String,

        /// Flip the current like state instead
        #[arg(long)]
        toggle: bool,
    },

    /// Remove your like from a recipe
    Unlike {
        /// Recipe ID
        id: String,
    },

    /// List, add or delete comments
    Comment {
        #[command(subcommand)]
        command: CommentCommands,
    },

    /// Show or update your profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
}

fn run_init(data_dir: String) -> anyhow::Result<()> {
    let data_path = PathBuf::from(data_dir);
    fs::create_dir_all(&data_path)?;

    let db_path = data_path.join("recipebox.db");
    let store = SqliteStore::new(&db_path)?;
    if store.is_initialized()? {
        bail!("Already initialized: {}", db_path.display());
    }
    store.initialize()?;

    println!();
    println!("Created database at {}", db_path.display());
    println!("Start the server with 'recipebox serve --data-dir {}'", data_path.display());
    println!();

    Ok(())
}

async fn run_serve(config: ServerConfig) -> anyhow::Result<()> {
    let session_ttl = config.session_ttl()?;
    let store = cli::open_store(&config.data_dir)?;

    let state = Arc::new(AppState {
        store: Arc::new(store),
        session_ttl,
    });

    let app = create_router(state);
    let addr = config.socket_addr()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("recipebox=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { data_dir } => run_init(data_dir)?,
        Commands::Serve {
            host,
            port,
            data_dir,
            session_ttl_days,
        } => {
            run_serve(ServerConfig {
                host,
                port,
                data_dir: data_dir.into(),
                session_ttl_days,
            })
            .await?;
        }
        // The client blocks on HTTP, so it runs off the async runtime.
        command => tokio::task::spawn_blocking(move || run_client(command)).await??,
    }

    Ok(())
}

fn run_client(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Init { .. } | Commands::Serve { .. } => bail!("not a client command"),
        Commands::Signup {
            server,
            email,
            password,
            non_interactive,
        } => cli::run_signup(server, email, password, non_interactive),
        Commands::Login {
            server,
            email,
            password,
            non_interactive,
        } => cli::run_login(server, email, password, non_interactive),
        Commands::Logout => cli::run_logout(),
        Commands::Whoami => cli::run_whoami(),
        Commands::Browse { scope, filter } => cli::run_browse(scope.into(), filter),
        Commands::MyRecipes { filter } => cli::run_browse(RecipeScope::Mine, filter),
        Commands::Saved { filter } => cli::run_saved(filter),
        Commands::Recipe { command } => match command {
            RecipeCommands::Show { id, json } => cli::run_recipe_show(id, json),
            RecipeCommands::Create { fields } => cli::run_recipe_create(fields),
            RecipeCommands::Edit { id, fields } => cli::run_recipe_edit(id, fields),
            RecipeCommands::Delete {
                id,
                yes,
                non_interactive,
            } => cli::run_recipe_delete(id, yes, non_interactive),
        },
        Commands::Like { id, toggle } => {
            if toggle {
                cli::run_toggle_like(id)
            } else {
                cli::run_like(id)
            }
        }
        Commands::Unlike { id } => cli::run_unlike(id),
        Commands::Comment { command } => match command {
            CommentCommands::List { recipe_id } => cli::run_comment_list(recipe_id),
            CommentCommands::Add {
                recipe_id,
                text,
                non_interactive,
            } => cli::run_comment_add(recipe_id, text, non_interactive),
            CommentCommands::Delete {
                recipe_id,
                comment_id,
                yes,
                non_interactive,
            } => cli::run_comment_delete(recipe_id, comment_id, yes, non_interactive),
        },
        Commands::Profile { command } => match command {
            ProfileCommands::Show => cli::run_profile_show(),
            ProfileCommands::Update {
                username,
                full_name,
                non_interactive,
            } => cli::run_profile_update(username, full_name, non_interactive),
        },
    }
}
