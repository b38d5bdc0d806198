//! Recipe catalog.
//!
//! A recipe is either `internal` (carries its own instructions) or
//! `external` (points at a link). Each recipe lists the ingredients it
//! needs, at most once each, with an optional free-text amount. Recipe ids
//! are random UUIDs assigned at creation.

use anyhow::Result;
use fridge_core::validate;

use crate::config::Config;
use crate::db;
use crate::error::AppError;
use crate::models::{Recipe, RecipeDraft, RecipeKind, RecipeUpdate, RequirementDraft};
use crate::sqlite_store::{RecipeFields, SqliteStore};

/// Drops blank optional text so it is stored as NULL.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Rejects duplicate and unknown ingredient ids in a requirement list.
async fn check_requirements(
    store: &SqliteStore,
    requirements: &[RequirementDraft],
) -> Result<(), AppError> {
    if let Some(dup) = validate::first_duplicate(requirements.iter().map(|r| r.ingredient_id)) {
        return Err(AppError::conflict(format!(
            "ingredient {} already in recipe",
            dup
        )));
    }
    for req in requirements {
        if store.find_ingredient(req.ingredient_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "ingredient not found: {}",
                req.ingredient_id
            )));
        }
    }
    Ok(())
}

pub async fn create_recipe(store: &SqliteStore, input: RecipeDraft) -> Result<Recipe, AppError> {
    let name = validate::non_empty("name", &input.name)?;
    let instructions = present(input.instructions.as_deref());
    let link = present(input.link.as_deref());
    validate::recipe_kind(input.kind, instructions, link)?;
    check_requirements(store, &input.ingredients).await?;

    let id = uuid::Uuid::new_v4().to_string();
    let fields = RecipeFields {
        name: &name,
        kind: input.kind,
        instructions,
        link,
    };
    store.insert_recipe(&id, fields, &input.ingredients).await?;
    tracing::info!(recipe_id = %id, name = %name, kind = %input.kind, "recipe created");

    get_recipe(store, &id).await
}

pub async fn list_recipes(store: &SqliteStore) -> Result<Vec<Recipe>, AppError> {
    store.list_recipes().await
}

pub async fn get_recipe(store: &SqliteStore, id: &str) -> Result<Recipe, AppError> {
    store
        .find_recipe(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("recipe not found: {}", id)))
}

pub async fn update_recipe(
    store: &SqliteStore,
    id: &str,
    input: RecipeUpdate,
) -> Result<Recipe, AppError> {
    let name = validate::non_empty("name", &input.name)?;
    let instructions = present(input.instructions.as_deref());
    let link = present(input.link.as_deref());
    validate::recipe_kind(input.kind, instructions, link)?;
    if let Some(requirements) = &input.ingredients {
        check_requirements(store, requirements).await?;
    }

    let fields = RecipeFields {
        name: &name,
        kind: input.kind,
        instructions,
        link,
    };
    if !store
        .update_recipe(id, fields, input.ingredients.as_deref())
        .await?
    {
        return Err(AppError::not_found(format!("recipe not found: {}", id)));
    }
    tracing::info!(recipe_id = %id, "recipe updated");

    get_recipe(store, id).await
}

pub async fn delete_recipe(store: &SqliteStore, id: &str) -> Result<(), AppError> {
    if !store.delete_recipe(id).await? {
        return Err(AppError::not_found(format!("recipe not found: {}", id)));
    }
    tracing::info!(recipe_id = %id, "recipe deleted");
    Ok(())
}

/// Parses a `--ingredient` argument of the form `ID` or `ID:AMOUNT`.
pub fn parse_requirement(s: &str) -> Result<RequirementDraft, String> {
    let (id, amount) = match s.split_once(':') {
        Some((id, amount)) => (id, Some(amount.trim())),
        None => (s, None),
    };
    let ingredient_id = id
        .trim()
        .parse()
        .map_err(|_| format!("invalid ingredient id '{}'", id))?;
    Ok(RequirementDraft {
        ingredient_id,
        amount: amount.filter(|a| !a.is_empty()).map(str::to_string),
    })
}

/// CLI entry point for `fridge recipe add`.
pub async fn run_add(
    config: &Config,
    name: String,
    kind: RecipeKind,
    instructions: Option<String>,
    link: Option<String>,
    ingredients: Vec<RequirementDraft>,
) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());
    let result = create_recipe(
        &store,
        RecipeDraft {
            name,
            kind,
            instructions,
            link,
            ingredients,
        },
    )
    .await;
    pool.close().await;

    let recipe = result?;
    println!(
        "Created {} recipe {} ({}, {} ingredients)",
        recipe.kind,
        recipe.id,
        recipe.name,
        recipe.ingredients.len()
    );
    Ok(())
}

/// CLI entry point for `fridge recipe list`.
pub async fn run_list(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());
    let result = list_recipes(&store).await;
    pool.close().await;

    let recipes = result?;
    if recipes.is_empty() {
        println!("No recipes.");
        return Ok(());
    }

    println!("{:<36}  {:<8}  {:>5}  NAME", "ID", "KIND", "ITEMS");
    for r in &recipes {
        println!(
            "{:<36}  {:<8}  {:>5}  {}",
            r.id,
            r.kind,
            r.ingredients.len(),
            r.name
        );
    }
    Ok(())
}

/// CLI entry point for `fridge recipe show`.
pub async fn run_show(config: &Config, id: &str) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());
    let result = get_recipe(&store, id).await;
    pool.close().await;

    let recipe = result?;
    println!("{} ({})", recipe.name, recipe.kind);
    println!("id: {}", recipe.id);
    if let Some(link) = &recipe.link {
        println!("link: {}", link);
    }

    println!();
    if recipe.ingredients.is_empty() {
        println!("No ingredients.");
    } else {
        println!("Ingredients:");
        for ing in &recipe.ingredients {
            match &ing.amount {
                Some(amount) => println!("  - {} ({})", ing.ingredient_name, amount),
                None => println!("  - {}", ing.ingredient_name),
            }
        }
    }

    if let Some(instructions) = &recipe.instructions {
        println!();
        println!("{}", instructions);
    }
    Ok(())
}

/// CLI entry point for `fridge recipe remove`.
pub async fn run_remove(config: &Config, id: &str) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());
    let result = delete_recipe(&store, id).await;
    pool.close().await;

    result?;
    println!("Removed recipe {}", id);
    Ok(())
}
