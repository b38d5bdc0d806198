//! Data types used by the application crate.
//!
//! Stored entities come from `fridge-core` and are re-exported here. The
//! request payloads below are what the HTTP API accepts and what the CLI
//! builds from its arguments.

use chrono::NaiveDate;
use serde::Deserialize;

pub use fridge_core::models::{
    Ingredient, IngredientId, PantryEntry, Recipe, RecipeFeasibility, RecipeId, RecipeIngredient,
    RecipeKind, User, UserId,
};

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserUpdate {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewIngredient {
    pub name: String,
    /// Falls back to `[pantry].default_shelf_life_days`.
    #[serde(default)]
    pub default_shelf_life_days: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngredientUpdate {
    pub name: String,
    pub default_shelf_life_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPantryEntry {
    pub ingredient_id: IngredientId,
    /// Defaults to 1.
    #[serde(default)]
    pub quantity: Option<i64>,
    /// Defaults to today + the ingredient's shelf life.
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PantryUpdate {
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequirementDraft {
    pub ingredient_id: IngredientId,
    #[serde(default)]
    pub amount: Option<String>,
}

/// Body of `POST /recipes`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeDraft {
    pub name: String,
    pub kind: RecipeKind,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<RequirementDraft>,
}

/// Body of `PUT /recipes/{id}`.
///
/// Replaces name, kind, instructions and link. The requirement list is
/// replaced only when `ingredients` is present.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeUpdate {
    pub name: String,
    pub kind: RecipeKind,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub ingredients: Option<Vec<RequirementDraft>>,
}
