//! # Fridge
//!
//! A household pantry tracker with a recipe matching engine.
//!
//! Users record which ingredients they have in their pantry. Recipes list the
//! ingredients they need. [`suggest`] asks the engine in `fridge-core`
//! which recipes a user can make right now and what is missing for the
//! rest.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐
//! │   CLI    │   │   HTTP   │
//! │ (fridge) │   │  (axum)  │
//! └────┬─────┘   └────┬─────┘
//!      └──────┬───────┘
//!             ▼
//!   ┌───────────────────┐      ┌──────────────────┐
//!   │  service modules  │─────▶│ fridge-core      │
//!   │ users / pantry /  │      │ suggest engine   │
//!   │ recipes / ...     │      └────────┬─────────┘
//!   └─────────┬─────────┘               │ RecipeSource
//!             ▼                         ▼
//!        ┌──────────────────────────────────┐
//!        │       SqliteStore (sqlx)         │
//!        └──────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema creation |
//! | [`error`] | Application error type and HTTP error body |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`models`] | Entities and request payloads |
//! | [`sqlite_store`] | All SQL, plus the engine's `RecipeSource` |
//! | [`users`] | User CRUD |
//! | [`ingredients`] | Ingredient catalog CRUD |
//! | [`pantry`] | Pantry entries with expiry defaults |
//! | [`recipes`] | Recipe CRUD |
//! | [`suggest`] | Recipe suggestions for a user |
//! | [`server`] | HTTP API |

pub mod config;
pub mod db;
pub mod error;
pub mod ingredients;
pub mod logging;
pub mod migrate;
pub mod models;
pub mod pantry;
pub mod recipes;
pub mod server;
pub mod sqlite_store;
pub mod suggest;
pub mod users;
