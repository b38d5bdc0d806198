//! Recipe suggestions for a user.
//!
//! Thin wrapper over [`fridge_core::suggest`] that reads from SQLite and
//! formats the report for the CLI.

use anyhow::Result;

use crate::config::Config;
use crate::db;
use crate::error::AppError;
use crate::models::{RecipeFeasibility, UserId};
use crate::sqlite_store::SqliteStore;

/// Feasibility of every recipe for `user_id`, optionally only the ones that
/// can be made now.
pub async fn suggest_for_user(
    store: &SqliteStore,
    user_id: UserId,
    makeable: bool,
) -> Result<Vec<RecipeFeasibility>, AppError> {
    let report = fridge_core::suggest(store, user_id).await?;
    let total = report.len();
    let report = if makeable {
        fridge_core::makeable_only(report)
    } else {
        report
    };

    tracing::debug!(user_id, total, returned = report.len(), "suggestions computed");
    Ok(report)
}

/// CLI entry point for `fridge suggest`.
pub async fn run_suggest(config: &Config, user_id: UserId, makeable: bool, json: bool) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());
    let result = suggest_for_user(&store, user_id, makeable).await;
    pool.close().await;

    let report = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.is_empty() {
        println!("No recipes.");
        return Ok(());
    }

    for r in &report {
        let mark = if r.can_make { "✓" } else { "✗" };
        println!("{} {}  ({})", mark, r.recipe_name, r.recipe_id);
        if !r.missing_ingredients.is_empty() {
            println!("    missing: {}", r.missing_ingredients.join(", "));
        }
    }
    Ok(())
}
