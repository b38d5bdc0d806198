//! # Fridge CLI (`fridge`)
//!
//! Manages users, the ingredient catalog, pantries, and recipes, asks the
//! matching engine what can be cooked, and runs the HTTP server.
//!
//! ## Usage
//!
//! ```bash
//! fridge --config ./config/fridge.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fridge init` | Create the SQLite database and schema |
//! | `fridge serve` | Start the HTTP API server |
//! | `fridge ingredient add/list/update/remove` | Manage the ingredient catalog |
//! | `fridge user add/list/remove` | Manage users |
//! | `fridge pantry add/list/update/remove` | Manage a user's pantry |
//! | `fridge recipe add/list/show/remove` | Manage recipes |
//! | `fridge suggest <user_id>` | Which recipes can this user make? |
//!
//! ## Examples
//!
//! ```bash
//! fridge init
//! fridge ingredient add egg --shelf-life 14
//! fridge ingredient add flour --shelf-life 180
//! fridge user add cook@example.com
//! fridge pantry add 1 1
//! fridge recipe add Omelette --kind internal --instructions "Whisk and fry." --ingredient 1
//! fridge suggest 1 --makeable
//! ```

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use fridge::models::{IngredientId, RecipeKind, RequirementDraft, UserId};
use fridge::{config, ingredients, logging, migrate, pantry, recipes, server, suggest, users};

/// Fridge: a pantry tracker that tells you which recipes you can cook.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/fridge.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "fridge",
    about = "Fridge: pantry tracking and recipe matching",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/fridge.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and all tables. Safe to run more
    /// than once.
    Init,

    /// Start the HTTP API server on `[server].bind`.
    Serve,

    /// Manage the ingredient catalog.
    Ingredient {
        #[command(subcommand)]
        action: IngredientAction,
    },

    /// Manage users.
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage a user's pantry.
    Pantry {
        #[command(subcommand)]
        action: PantryAction,
    },

    /// Manage recipes.
    Recipe {
        #[command(subcommand)]
        action: RecipeAction,
    },

    /// Show which recipes a user can make with their pantry.
    Suggest {
        user_id: UserId,

        /// Only list recipes that can be made now.
        #[arg(long)]
        makeable: bool,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum IngredientAction {
    /// Add an ingredient to the catalog.
    Add {
        name: String,
        /// Days a fresh item keeps. Defaults to `[pantry].default_shelf_life_days`.
        #[arg(long)]
        shelf_life: Option<i64>,
    },
    /// List all ingredients.
    List,
    /// Rename an ingredient or change its shelf life.
    Update {
        id: IngredientId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        shelf_life: Option<i64>,
    },
    /// Remove an ingredient no pantry or recipe uses.
    Remove { id: IngredientId },
}

#[derive(Subcommand)]
enum UserAction {
    /// Register a user.
    Add { email: String },
    /// List all users.
    List,
    /// Remove a user and their pantry.
    Remove { id: UserId },
}

#[derive(Subcommand)]
enum PantryAction {
    /// Put an ingredient in a user's pantry.
    Add {
        user_id: UserId,
        ingredient_id: IngredientId,
        /// Defaults to 1.
        #[arg(long)]
        quantity: Option<i64>,
        /// Expiry date (YYYY-MM-DD). Defaults to today plus the ingredient's shelf life.
        #[arg(long)]
        expires: Option<NaiveDate>,
    },
    /// List a user's pantry, soonest expiry first.
    List { user_id: UserId },
    /// Change quantity or expiry of a pantry entry.
    Update {
        user_id: UserId,
        ingredient_id: IngredientId,
        #[arg(long)]
        quantity: Option<i64>,
        #[arg(long)]
        expires: Option<NaiveDate>,
    },
    /// Take an ingredient out of a user's pantry.
    Remove {
        user_id: UserId,
        ingredient_id: IngredientId,
    },
}

#[derive(Subcommand)]
enum RecipeAction {
    /// Add a recipe.
    ///
    /// Internal recipes need `--instructions`, external ones need `--link`.
    Add {
        name: String,
        /// `internal` or `external`.
        #[arg(long)]
        kind: RecipeKind,
        #[arg(long)]
        instructions: Option<String>,
        #[arg(long)]
        link: Option<String>,
        /// Required ingredient as `ID` or `ID:AMOUNT`. Repeatable.
        #[arg(long = "ingredient", value_parser = recipes::parse_requirement)]
        ingredients: Vec<RequirementDraft>,
    },
    /// List all recipes.
    List,
    /// Show one recipe with its ingredients.
    Show { id: String },
    /// Remove a recipe.
    Remove { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;
    logging::init_tracing(&cfg.logging);

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Ingredient { action } => match action {
            IngredientAction::Add { name, shelf_life } => {
                ingredients::run_add(&cfg, name, shelf_life).await?;
            }
            IngredientAction::List => {
                ingredients::run_list(&cfg).await?;
            }
            IngredientAction::Update {
                id,
                name,
                shelf_life,
            } => {
                ingredients::run_update(&cfg, id, name, shelf_life).await?;
            }
            IngredientAction::Remove { id } => {
                ingredients::run_remove(&cfg, id).await?;
            }
        },
        Commands::User { action } => match action {
            UserAction::Add { email } => {
                users::run_add(&cfg, email).await?;
            }
            UserAction::List => {
                users::run_list(&cfg).await?;
            }
            UserAction::Remove { id } => {
                users::run_remove(&cfg, id).await?;
            }
        },
        Commands::Pantry { action } => match action {
            PantryAction::Add {
                user_id,
                ingredient_id,
                quantity,
                expires,
            } => {
                pantry::run_add(&cfg, user_id, ingredient_id, quantity, expires).await?;
            }
            PantryAction::List { user_id } => {
                pantry::run_list(&cfg, user_id).await?;
            }
            PantryAction::Update {
                user_id,
                ingredient_id,
                quantity,
                expires,
            } => {
                pantry::run_update(&cfg, user_id, ingredient_id, quantity, expires).await?;
            }
            PantryAction::Remove {
                user_id,
                ingredient_id,
            } => {
                pantry::run_remove(&cfg, user_id, ingredient_id).await?;
            }
        },
        Commands::Recipe { action } => match action {
            RecipeAction::Add {
                name,
                kind,
                instructions,
                link,
                ingredients,
            } => {
                recipes::run_add(&cfg, name, kind, instructions, link, ingredients).await?;
            }
            RecipeAction::List => {
                recipes::run_list(&cfg).await?;
            }
            RecipeAction::Show { id } => {
                recipes::run_show(&cfg, &id).await?;
            }
            RecipeAction::Remove { id } => {
                recipes::run_remove(&cfg, &id).await?;
            }
        },
        Commands::Suggest {
            user_id,
            makeable,
            json,
        } => {
            suggest::run_suggest(&cfg, user_id, makeable, json).await?;
        }
    }

    Ok(())
}
