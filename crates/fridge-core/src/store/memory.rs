//! In-memory [`RecipeSource`] implementation for tests and embedding.
//!
//! Uses `BTreeMap` and `Vec` behind `std::sync::RwLock` for thread safety.
//! Recipes are returned in insertion order.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use crate::models::UserId;

use super::{RecipeRequirements, RecipeSource};

#[derive(Default)]
struct Inner {
    /// user → (ingredient name, quantity)
    pantries: BTreeMap<UserId, Vec<(String, i64)>>,
    recipes: Vec<RecipeRequirements>,
}

/// In-memory store keyed by ingredient name.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))
    }

    /// Registers a user with an empty pantry. Re-adding is a no-op.
    pub fn add_user(&self, user_id: UserId) -> Result<()> {
        self.write()?.pantries.entry(user_id).or_default();
        Ok(())
    }

    /// Puts `quantity` of an ingredient in a user's pantry, replacing any
    /// existing quantity for that name.
    pub fn stock(&self, user_id: UserId, name: &str, quantity: i64) -> Result<()> {
        let mut inner = self.write()?;
        let Some(pantry) = inner.pantries.get_mut(&user_id) else {
            bail!("user not found: {}", user_id);
        };
        match pantry.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = quantity,
            None => pantry.push((name.to_string(), quantity)),
        }
        Ok(())
    }

    /// Removes an ingredient from a user's pantry. Returns whether it was present.
    pub fn discard(&self, user_id: UserId, name: &str) -> Result<bool> {
        let mut inner = self.write()?;
        let Some(pantry) = inner.pantries.get_mut(&user_id) else {
            bail!("user not found: {}", user_id);
        };
        let before = pantry.len();
        pantry.retain(|(n, _)| n != name);
        Ok(pantry.len() != before)
    }

    /// Appends a recipe. Requirement names are stored as given, duplicates included.
    pub fn add_recipe(&self, recipe_id: &str, recipe_name: &str, required: &[&str]) -> Result<()> {
        self.write()?.recipes.push(RecipeRequirements {
            recipe_id: recipe_id.to_string(),
            recipe_name: recipe_name.to_string(),
            required: required.iter().map(|s| s.to_string()).collect(),
        });
        Ok(())
    }
}

#[async_trait]
impl RecipeSource for InMemoryStore {
    async fn pantry_ingredient_names(&self, user_id: UserId) -> Result<Option<BTreeSet<String>>> {
        let inner = self.read()?;
        Ok(inner
            .pantries
            .get(&user_id)
            .map(|p| p.iter().map(|(name, _)| name.clone()).collect()))
    }

    async fn recipes_with_requirements(&self) -> Result<Vec<RecipeRequirements>> {
        Ok(self.read()?.recipes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_user_has_no_pantry() {
        let store = InMemoryStore::new();
        assert_eq!(store.pantry_ingredient_names(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn pantry_names_are_distinct() {
        let store = InMemoryStore::new();
        store.add_user(1).unwrap();
        store.stock(1, "egg", 2).unwrap();
        store.stock(1, "egg", 6).unwrap();
        store.stock(1, "flour", 1).unwrap();

        let names = store.pantry_ingredient_names(1).await.unwrap().unwrap();
        assert_eq!(
            names.into_iter().collect::<Vec<_>>(),
            vec!["egg".to_string(), "flour".to_string()]
        );
    }

    #[tokio::test]
    async fn discard_removes_entry() {
        let store = InMemoryStore::new();
        store.add_user(1).unwrap();
        store.stock(1, "milk", 1).unwrap();
        assert!(store.discard(1, "milk").unwrap());
        assert!(!store.discard(1, "milk").unwrap());
        assert!(store.pantry_ingredient_names(1).await.unwrap().unwrap().is_empty());
    }

    #[test]
    fn stock_for_unknown_user_fails() {
        let store = InMemoryStore::new();
        let err = store.stock(9, "egg", 1).unwrap_err();
        assert!(err.to_string().contains("user not found"));
    }

    #[tokio::test]
    async fn snapshot_preserves_recipe_order() {
        let store = InMemoryStore::new();
        store.add_user(1).unwrap();
        store.add_recipe("b", "Bread", &["flour"]).unwrap();
        store.add_recipe("a", "Apple pie", &["apple", "flour"]).unwrap();

        let snap = store.snapshot(1).await.unwrap().unwrap();
        let ids: Vec<&str> = snap.recipes.iter().map(|r| r.recipe_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert!(store.snapshot(2).await.unwrap().is_none());
    }
}
