//! Domain rules applied before anything is written.
//!
//! These are enforced by the CRUD layer at create/update time. The matching
//! engine never calls them and does not rely on them holding.

use chrono::{Days, NaiveDate};
use std::collections::HashSet;
use std::hash::Hash;

use crate::error::ValidationError;
use crate::models::RecipeKind;

/// Trims `value` and rejects it if nothing is left.
pub fn non_empty(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(trimmed.to_string())
}

pub fn quantity(q: i64) -> Result<i64, ValidationError> {
    if q < 1 {
        return Err(ValidationError::NonPositiveQuantity(q));
    }
    Ok(q)
}

pub fn shelf_life(days: i64) -> Result<i64, ValidationError> {
    if days < 0 {
        return Err(ValidationError::NegativeShelfLife(days));
    }
    Ok(days)
}

/// Expiry used when a pantry entry is created without one:
/// `today + shelf_life_days`.
pub fn default_expiry(today: NaiveDate, shelf_life_days: i64) -> Result<NaiveDate, ValidationError> {
    let days = shelf_life(shelf_life_days)?;
    today
        .checked_add_days(Days::new(days as u64))
        .ok_or(ValidationError::ExpiryOutOfRange { start: today, days })
}

/// Checks the recipe-type invariant: internal recipes carry instructions and
/// no link, external recipes carry a link and no instructions.
///
/// Blank strings count as absent.
pub fn recipe_kind(
    kind: RecipeKind,
    instructions: Option<&str>,
    link: Option<&str>,
) -> Result<(), ValidationError> {
    let has_instructions = instructions.is_some_and(|s| !s.trim().is_empty());
    let has_link = link.is_some_and(|s| !s.trim().is_empty());

    match kind {
        RecipeKind::Internal if !has_instructions => Err(ValidationError::MissingInstructions),
        RecipeKind::Internal if has_link => Err(ValidationError::UnexpectedLink),
        RecipeKind::External if !has_link => Err(ValidationError::MissingLink),
        RecipeKind::External if has_instructions => Err(ValidationError::UnexpectedInstructions),
        _ => Ok(()),
    }
}

/// Returns the first value that appears more than once.
pub fn first_duplicate<T, I>(values: I) -> Option<T>
where
    T: Eq + Hash + Copy,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    values.into_iter().find(|v| !seen.insert(*v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(non_empty("name", "  egg ").unwrap(), "egg");
        assert_eq!(
            non_empty("name", "   "),
            Err(ValidationError::EmptyField { field: "name" })
        );
    }

    #[test]
    fn test_quantity_must_be_positive() {
        assert_eq!(quantity(1), Ok(1));
        assert_eq!(quantity(0), Err(ValidationError::NonPositiveQuantity(0)));
        assert_eq!(quantity(-3), Err(ValidationError::NonPositiveQuantity(-3)));
    }

    #[test]
    fn test_default_expiry_adds_shelf_life() {
        assert_eq!(default_expiry(date(2024, 2, 25), 7), Ok(date(2024, 3, 3)));
        assert_eq!(default_expiry(date(2024, 2, 25), 0), Ok(date(2024, 2, 25)));
    }

    #[test]
    fn test_default_expiry_rejects_negative() {
        assert_eq!(
            default_expiry(date(2024, 1, 1), -1),
            Err(ValidationError::NegativeShelfLife(-1))
        );
    }

    #[test]
    fn test_default_expiry_overflow() {
        let err = default_expiry(NaiveDate::MAX, 1).unwrap_err();
        assert!(matches!(err, ValidationError::ExpiryOutOfRange { .. }));
    }

    #[test]
    fn test_internal_recipe_rules() {
        assert!(recipe_kind(RecipeKind::Internal, Some("Whisk."), None).is_ok());
        assert_eq!(
            recipe_kind(RecipeKind::Internal, None, None),
            Err(ValidationError::MissingInstructions)
        );
        assert_eq!(
            recipe_kind(RecipeKind::Internal, Some("Whisk."), Some("https://x")),
            Err(ValidationError::UnexpectedLink)
        );
    }

    #[test]
    fn test_external_recipe_rules() {
        assert!(recipe_kind(RecipeKind::External, None, Some("https://x")).is_ok());
        assert!(recipe_kind(RecipeKind::External, Some(""), Some("https://x")).is_ok());
        assert_eq!(
            recipe_kind(RecipeKind::External, None, Some("  ")),
            Err(ValidationError::MissingLink)
        );
        assert_eq!(
            recipe_kind(RecipeKind::External, Some("Boil."), Some("https://x")),
            Err(ValidationError::UnexpectedInstructions)
        );
    }

    #[test]
    fn test_first_duplicate() {
        assert_eq!(first_duplicate([1, 2, 3]), None);
        assert_eq!(first_duplicate([1, 2, 1, 2]), Some(1));
    }
}
