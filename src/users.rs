//! User registration and lookup.
//!
//! Used by the `fridge user` CLI commands and the `/users` HTTP routes.

use anyhow::Result;
use fridge_core::validate;

use crate::config::Config;
use crate::db;
use crate::error::AppError;
use crate::models::{NewUser, User, UserId, UserUpdate};
use crate::sqlite_store::SqliteStore;

pub async fn create_user(store: &SqliteStore, input: NewUser) -> Result<User, AppError> {
    let email = validate::non_empty("email", &input.email)?;
    let user = store.insert_user(&email).await?;
    tracing::info!(user_id = user.id, "user created");
    Ok(user)
}

pub async fn list_users(store: &SqliteStore) -> Result<Vec<User>, AppError> {
    store.list_users().await
}

pub async fn get_user(store: &SqliteStore, id: UserId) -> Result<User, AppError> {
    store
        .find_user(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("user not found: {}", id)))
}

pub async fn update_user(
    store: &SqliteStore,
    id: UserId,
    input: UserUpdate,
) -> Result<User, AppError> {
    let email = validate::non_empty("email", &input.email)?;
    store
        .update_user(id, &email)
        .await?
        .ok_or_else(|| AppError::not_found(format!("user not found: {}", id)))
}

pub async fn delete_user(store: &SqliteStore, id: UserId) -> Result<(), AppError> {
    if !store.delete_user(id).await? {
        return Err(AppError::not_found(format!("user not found: {}", id)));
    }
    tracing::info!(user_id = id, "user deleted");
    Ok(())
}

/// CLI entry point for `fridge user add`.
pub async fn run_add(config: &Config, email: String) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());
    let result = create_user(&store, NewUser { email }).await;
    pool.close().await;

    let user = result?;
    println!("Created user {} ({})", user.id, user.email);
    Ok(())
}

/// CLI entry point for `fridge user list`.
pub async fn run_list(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());
    let result = list_users(&store).await;
    pool.close().await;

    let users = result?;
    if users.is_empty() {
        println!("No users.");
        return Ok(());
    }

    println!("{:>6}  EMAIL", "ID");
    for user in &users {
        println!("{:>6}  {}", user.id, user.email);
    }
    Ok(())
}

/// CLI entry point for `fridge user remove`.
pub async fn run_remove(config: &Config, id: UserId) -> Result<()> {
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());
    let result = delete_user(&store, id).await;
    pool.close().await;

    result?;
    println!("Removed user {}", id);
    Ok(())
}
