//! Recipe matching engine.
//!
//! Decides, for every recipe in the book, whether a user can make it with
//! what is in their pantry. The engine works purely over sets of ingredient
//! names read through [`RecipeSource`]; it holds no state and writes nothing.
//!
//! # Algorithm
//!
//! 1. `owned` = names of the ingredients in the user's pantry.
//! 2. For each recipe, `required` = its requirement names as a set.
//! 3. `missing = required - owned`, `can_make = missing.is_empty()`.
//!
//! Quantities play no part: presence of the ingredient name is all that
//! counts. `missing_ingredients` and `used_ingredients` are sorted by name.

use std::collections::BTreeSet;

use crate::error::SuggestError;
use crate::models::{RecipeFeasibility, UserId};
use crate::store::{RecipeRequirements, RecipeSource};

/// Builds the feasibility report for `user_id`, one entry per recipe in
/// store order.
///
/// Fails with [`SuggestError::UserNotFound`] if the user does not exist;
/// store failures are returned as [`SuggestError::Store`] untouched.
pub async fn suggest<S>(store: &S, user_id: UserId) -> Result<Vec<RecipeFeasibility>, SuggestError>
where
    S: RecipeSource + ?Sized,
{
    let snapshot = store
        .snapshot(user_id)
        .await?
        .ok_or(SuggestError::UserNotFound { user_id })?;

    Ok(snapshot
        .recipes
        .iter()
        .map(|recipe| assess(recipe, &snapshot.owned))
        .collect())
}

/// Checks one recipe against a set of owned ingredient names.
pub fn assess(recipe: &RecipeRequirements, owned: &BTreeSet<String>) -> RecipeFeasibility {
    let required: BTreeSet<&str> = recipe.required.iter().map(String::as_str).collect();

    let missing_ingredients: Vec<String> = required
        .iter()
        .filter(|name| !owned.contains(**name))
        .map(|name| name.to_string())
        .collect();

    RecipeFeasibility {
        recipe_id: recipe.recipe_id.clone(),
        recipe_name: recipe.recipe_name.clone(),
        can_make: missing_ingredients.is_empty(),
        missing_ingredients,
        used_ingredients: required.into_iter().map(str::to_string).collect(),
    }
}

/// Keeps only the recipes that can be made right now.
pub fn makeable_only(report: Vec<RecipeFeasibility>) -> Vec<RecipeFeasibility> {
    report.into_iter().filter(|r| r.can_make).collect()
}
