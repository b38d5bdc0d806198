//! Ingredient catalog.
//!
//! Ingredient names are unique and are the identity the matching engine
//! compares on, so renaming an ingredient renames it in every pantry and
//! recipe at once. An ingredient still referenced by a pantry entry or a
//! recipe cannot be deleted.

use anyhow::Result;
use fridge_core::validate;

use crate::config::{Config, PantryConfig};
use crate::db;
use crate::error::AppError;
use crate::models::{Ingredient, IngredientId, IngredientUpdate, NewIngredient};
use crate::sqlite_store::SqliteStore;

pub async fn create_ingredient(
    store: &SqliteStore,
    defaults: &PantryConfig,
    input: NewIngredient,
) -> Result<Ingredient, AppError> {
    let name = validate::non_empty("name", &input.name)?;
    let days = validate::shelf_life(
        input
            .default_shelf_life_days
            .unwrap_or(defaults.default_shelf_life_days),
    )?;

    let ingredient = store.insert_ingredient(&name, days).await?;
    tracing::info!(ingredient_id = ingredient.id, name = %ingredient.name, "ingredient created");
    Ok(ingredient)
}

pub async fn list_ingredients(store: &SqliteStore) -> Result<Vec<Ingredient>, AppError> {
    store.list_ingredients().await
}

pub async fn get_ingredient(store: &SqliteStore, id: IngredientId) -> Result<Ingredient, AppError> {
    store
        .find_ingredient(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("ingredient not found: {}", id)))
}

pub async fn update_ingredient(
    store: &SqliteStore,
    id: IngredientId,
    input: IngredientUpdate,
) -> Result<Ingredient, AppError> {
    let name = validate::non_empty("name", &input.name)?;
    let days = validate::shelf_life(input.default_shelf_life_days)?;

    store
        .update_ingredient(id, &name, days)
        .await?
        .ok_or_else(|| AppError::not_found(format!("ingredient not found: {}", id)))
}

pub async fn delete_ingredient(store: &SqliteStore, id: IngredientId) -> Result<(), AppError> {
    let references = store.ingredient_references(id).await?;
    if references > 0 {
        return Err(AppError::conflict(format!(
            "ingredient {} is in use by {} pantry entries or recipes",
            id, references
        )));
    }

    if !store.delete_ingredient(id).await? {
        return Err(AppError::not_found(format!("ingredient not found: {}", id)));
    }
    tracing::info!(ingredient_id = id, "ingredient deleted");
    Ok(())
}

/// CLI entry point for `fridge ingredient add`.
pub async fn run_add(config: &Config, name: String, shelf_life: Option<i64>) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());
    let result = create_ingredient(
        &store,
        &config.pantry,
        NewIngredient {
            name,
            default_shelf_life_days: shelf_life,
        },
    )
    .await;
    pool.close().await;

    let ingredient = result?;
    println!(
        "Created ingredient {} ({}, keeps {} days)",
        ingredient.id, ingredient.name, ingredient.default_shelf_life_days
    );
    Ok(())
}

/// CLI entry point for `fridge ingredient list`.
pub async fn run_list(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());
    let result = list_ingredients(&store).await;
    pool.close().await;

    let ingredients = result?;
    if ingredients.is_empty() {
        println!("No ingredients.");
        return Ok(());
    }

    println!("{:>6}  {:<24} {:>10}", "ID", "NAME", "SHELF LIFE");
    for i in &ingredients {
        println!(
            "{:>6}  {:<24} {:>5} days",
            i.id, i.name, i.default_shelf_life_days
        );
    }
    Ok(())
}

/// CLI entry point for `fridge ingredient update`.
pub async fn run_update(
    config: &Config,
    id: IngredientId,
    name: Option<String>,
    shelf_life: Option<i64>,
) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());
    let result = async move {
        let current = get_ingredient(&store, id).await?;
        update_ingredient(
            &store,
            id,
            IngredientUpdate {
                name: name.unwrap_or(current.name),
                default_shelf_life_days: shelf_life.unwrap_or(current.default_shelf_life_days),
            },
        )
        .await
    }
    .await;
    pool.close().await;

    let ingredient = result?;
    println!(
        "Updated ingredient {} ({}, keeps {} days)",
        ingredient.id, ingredient.name, ingredient.default_shelf_life_days
    );
    Ok(())
}

/// CLI entry point for `fridge ingredient remove`.
pub async fn run_remove(config: &Config, id: IngredientId) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());
    let result = delete_ingredient(&store, id).await;
    pool.close().await;

    result?;
    println!("Removed ingredient {}", id);
    Ok(())
}
