//! Read abstraction consumed by the matching engine.
//!
//! The [`RecipeSource`] trait is the only thing the engine knows about
//! storage. Implementations are responsible for reducing their object graph
//! (user → pantry entry → ingredient, recipe → requirement → ingredient) to
//! plain ingredient **names** before the engine runs.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::models::{RecipeId, UserId};

/// A recipe reduced to the ingredient names it requires.
///
/// `required` may contain the same name more than once if storage holds
/// duplicate requirements; the engine collapses them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRequirements {
    pub recipe_id: RecipeId,
    pub recipe_name: String,
    pub required: Vec<String>,
}

/// Everything one `suggest` call reads, taken at a single point in time.
#[derive(Debug, Clone, Default)]
pub struct PantrySnapshot {
    /// Ingredient names the user currently holds.
    pub owned: BTreeSet<String>,
    /// Every recipe in store order.
    pub recipes: Vec<RecipeRequirements>,
}

/// Read-only view of pantry and recipe data.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`pantry_ingredient_names`](RecipeSource::pantry_ingredient_names) | Owned names for a user, `None` if the user is absent |
/// | [`recipes_with_requirements`](RecipeSource::recipes_with_requirements) | All recipes with required names |
/// | [`snapshot`](RecipeSource::snapshot) | Both of the above as one consistent read |
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Ingredient names in the user's pantry, or `None` if no such user exists.
    async fn pantry_ingredient_names(&self, user_id: UserId) -> Result<Option<BTreeSet<String>>>;

    /// Every recipe with the names of the ingredients it requires.
    async fn recipes_with_requirements(&self) -> Result<Vec<RecipeRequirements>>;

    /// Reads the pantry and the recipe book together.
    ///
    /// The default issues the two reads back to back. Backends that can
    /// provide a point-in-time view (e.g. a read transaction) should
    /// override it.
    async fn snapshot(&self, user_id: UserId) -> Result<Option<PantrySnapshot>> {
        let Some(owned) = self.pantry_ingredient_names(user_id).await? else {
            return Ok(None);
        };
        let recipes = self.recipes_with_requirements().await?;
        Ok(Some(PantrySnapshot { owned, recipes }))
    }
}
