//! Core data models shared by the store, the matching engine, and the
//! HTTP/CLI frontends.
//!
//! The serialized field names are the wire shape returned by the HTTP API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

pub type UserId = i64;
pub type IngredientId = i64;
/// Recipes are keyed by a UUID v4 string.
pub type RecipeId = String;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
}

/// A catalog ingredient. Its `name` is the identity used for matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub default_shelf_life_days: i64,
}

/// One ingredient owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PantryEntry {
    pub id: i64,
    pub user_id: UserId,
    pub ingredient_id: IngredientId,
    pub ingredient_name: String,
    pub quantity: i64,
    pub expiry_date: NaiveDate,
}

/// Whether a recipe carries its own instructions or points elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeKind {
    Internal,
    External,
}

impl RecipeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeKind::Internal => "internal",
            RecipeKind::External => "external",
        }
    }
}

impl fmt::Display for RecipeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecipeKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "internal" => Ok(RecipeKind::Internal),
            "external" => Ok(RecipeKind::External),
            other => Err(ValidationError::UnknownRecipeKind(other.to_string())),
        }
    }
}

/// A single ingredient requirement of a recipe.
///
/// `amount` is a free-form annotation ("2 cups", "a pinch") and is never
/// interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub ingredient_id: IngredientId,
    pub ingredient_name: String,
    pub amount: Option<String>,
}

/// A recipe with its resolved requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub kind: RecipeKind,
    pub instructions: Option<String>,
    pub link: Option<String>,
    pub ingredients: Vec<RecipeIngredient>,
}

/// Feasibility verdict for one recipe against one user's pantry.
///
/// Serializes as `{ id, name, can_make, missing_ingredients, used_ingredients }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeFeasibility {
    #[serde(rename = "id")]
    pub recipe_id: RecipeId,
    #[serde(rename = "name")]
    pub recipe_name: String,
    pub can_make: bool,
    pub missing_ingredients: Vec<String>,
    pub used_ingredients: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipe_kind_round_trips_through_str() {
        assert_eq!("internal".parse::<RecipeKind>(), Ok(RecipeKind::Internal));
        assert_eq!("external".parse::<RecipeKind>(), Ok(RecipeKind::External));
        assert_eq!(RecipeKind::External.to_string(), "external");
    }

    #[test]
    fn recipe_kind_rejects_unknown() {
        let err = "video".parse::<RecipeKind>().unwrap_err();
        assert_eq!(err, ValidationError::UnknownRecipeKind("video".to_string()));
    }

    #[test]
    fn feasibility_serializes_to_wire_shape() {
        let f = RecipeFeasibility {
            recipe_id: "r1".to_string(),
            recipe_name: "Pancakes".to_string(),
            can_make: false,
            missing_ingredients: vec!["milk".to_string()],
            used_ingredients: vec!["egg".to_string(), "flour".to_string(), "milk".to_string()],
        };
        let v = serde_json::to_value(&f).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "id": "r1",
                "name": "Pancakes",
                "can_make": false,
                "missing_ingredients": ["milk"],
                "used_ingredients": ["egg", "flour", "milk"],
            })
        );
    }
}
