//! # Fridge Core
//!
//! Storage-agnostic logic for Fridge: pantry and recipe data models,
//! domain validation, the [`store::RecipeSource`] read abstraction, and the
//! recipe matching engine.
//!
//! This crate contains no tokio, sqlx, HTTP, or filesystem dependencies.
//! The application crate supplies a SQLite-backed [`store::RecipeSource`];
//! tests use [`store::memory::InMemoryStore`].

pub mod error;
pub mod models;
pub mod store;
pub mod suggest;
pub mod validate;

pub use error::{SuggestError, ValidationError};
pub use models::RecipeFeasibility;
pub use suggest::{assess, makeable_only, suggest};
