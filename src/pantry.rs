//! Per-user pantry entries.
//!
//! Each user holds at most one entry per ingredient. An entry created
//! without a quantity gets 1; without an expiry date it gets today plus the
//! ingredient's default shelf life.

use anyhow::Result;
use chrono::NaiveDate;
use fridge_core::validate;

use crate::config::Config;
use crate::db;
use crate::error::AppError;
use crate::models::{IngredientId, NewPantryEntry, PantryEntry, PantryUpdate, UserId};
use crate::sqlite_store::SqliteStore;

/// Local calendar date used for defaulting expiry dates.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

async fn require_user(store: &SqliteStore, user_id: UserId) -> Result<(), AppError> {
    match store.find_user(user_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::not_found(format!("user not found: {}", user_id))),
    }
}

pub async fn add_pantry_entry(
    store: &SqliteStore,
    user_id: UserId,
    input: NewPantryEntry,
    today: NaiveDate,
) -> Result<PantryEntry, AppError> {
    require_user(store, user_id).await?;
    let ingredient = store
        .find_ingredient(input.ingredient_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("ingredient not found: {}", input.ingredient_id))
        })?;

    let quantity = validate::quantity(input.quantity.unwrap_or(1))?;
    let expiry_date = match input.expiry_date {
        Some(date) => date,
        None => validate::default_expiry(today, ingredient.default_shelf_life_days)?,
    };

    let entry = store
        .insert_pantry_entry(user_id, &ingredient, quantity, expiry_date)
        .await?;
    tracing::info!(
        user_id,
        ingredient = %entry.ingredient_name,
        quantity,
        %expiry_date,
        "pantry entry added"
    );
    Ok(entry)
}

pub async fn list_pantry(store: &SqliteStore, user_id: UserId) -> Result<Vec<PantryEntry>, AppError> {
    require_user(store, user_id).await?;
    store.list_pantry(user_id).await
}

/// Changes quantity and/or expiry; fields left `None` keep their value.
pub async fn update_pantry_entry(
    store: &SqliteStore,
    user_id: UserId,
    ingredient_id: IngredientId,
    input: PantryUpdate,
) -> Result<PantryEntry, AppError> {
    require_user(store, user_id).await?;
    let not_found = || {
        AppError::not_found(format!(
            "ingredient {} not in pantry of user {}",
            ingredient_id, user_id
        ))
    };

    let mut entry = store
        .find_pantry_entry(user_id, ingredient_id)
        .await?
        .ok_or_else(not_found)?;

    if let Some(q) = input.quantity {
        entry.quantity = validate::quantity(q)?;
    }
    if let Some(date) = input.expiry_date {
        entry.expiry_date = date;
    }

    if !store
        .update_pantry_entry(user_id, ingredient_id, entry.quantity, entry.expiry_date)
        .await?
    {
        return Err(not_found());
    }
    Ok(entry)
}

pub async fn remove_pantry_entry(
    store: &SqliteStore,
    user_id: UserId,
    ingredient_id: IngredientId,
) -> Result<(), AppError> {
    require_user(store, user_id).await?;
    if !store.delete_pantry_entry(user_id, ingredient_id).await? {
        return Err(AppError::not_found(format!(
            "ingredient {} not in pantry of user {}",
            ingredient_id, user_id
        )));
    }
    tracing::info!(user_id, ingredient_id, "pantry entry removed");
    Ok(())
}

/// Human-readable freshness of an entry relative to `today`.
pub fn freshness(expiry_date: NaiveDate, today: NaiveDate) -> String {
    let days = (expiry_date - today).num_days();
    match days {
        d if d < 0 => "expired".to_string(),
        0 => "expires today".to_string(),
        1 => "1 day left".to_string(),
        d => format!("{} days left", d),
    }
}

/// CLI entry point for `fridge pantry add`.
pub async fn run_add(
    config: &Config,
    user_id: UserId,
    ingredient_id: IngredientId,
    quantity: Option<i64>,
    expiry_date: Option<NaiveDate>,
) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());
    let result = add_pantry_entry(
        &store,
        user_id,
        NewPantryEntry {
            ingredient_id,
            quantity,
            expiry_date,
        },
        today(),
    )
    .await;
    pool.close().await;

    let entry = result?;
    println!(
        "Added {} x{} to pantry of user {} (expires {})",
        entry.ingredient_name, entry.quantity, user_id, entry.expiry_date
    );
    Ok(())
}

/// CLI entry point for `fridge pantry list`.
pub async fn run_list(config: &Config, user_id: UserId) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());
    let result = list_pantry(&store, user_id).await;
    pool.close().await;

    let entries = result?;
    if entries.is_empty() {
        println!("Pantry is empty.");
        return Ok(());
    }

    let today = today();
    println!(
        "{:>6}  {:<24} {:>4}  {:<10}  STATUS",
        "ING", "NAME", "QTY", "EXPIRES"
    );
    for e in &entries {
        println!(
            "{:>6}  {:<24} {:>4}  {:<10}  {}",
            e.ingredient_id,
            e.ingredient_name,
            e.quantity,
            e.expiry_date,
            freshness(e.expiry_date, today)
        );
    }
    Ok(())
}

/// CLI entry point for `fridge pantry update`.
pub async fn run_update(
    config: &Config,
    user_id: UserId,
    ingredient_id: IngredientId,
    quantity: Option<i64>,
    expiry_date: Option<NaiveDate>,
) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());
    let result = update_pantry_entry(
        &store,
        user_id,
        ingredient_id,
        PantryUpdate {
            quantity,
            expiry_date,
        },
    )
    .await;
    pool.close().await;

    let entry = result?;
    println!(
        "Updated {} x{} (expires {})",
        entry.ingredient_name, entry.quantity, entry.expiry_date
    );
    Ok(())
}

/// CLI entry point for `fridge pantry remove`.
pub async fn run_remove(config: &Config, user_id: UserId, ingredient_id: IngredientId) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());
    let result = remove_pantry_entry(&store, user_id, ingredient_id).await;
    pool.close().await;

    result?;
    println!("Removed ingredient {} from pantry of user {}", ingredient_id, user_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_freshness() {
        let today = date(2024, 5, 10);
        assert_eq!(freshness(date(2024, 5, 9), today), "expired");
        assert_eq!(freshness(date(2024, 5, 10), today), "expires today");
        assert_eq!(freshness(date(2024, 5, 11), today), "1 day left");
        assert_eq!(freshness(date(2024, 5, 17), today), "7 days left");
    }
}
