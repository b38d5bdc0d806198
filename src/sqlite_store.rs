//! SQLite-backed storage.
//!
//! [`SqliteStore`] holds every SQL statement in the application: the CRUD
//! queries used by the service modules and the [`RecipeSource`]
//! implementation consumed by the matching engine. Lookups return
//! `Option`; callers decide what "absent" means. Values are assumed to be
//! validated already.

use std::collections::{BTreeSet, HashMap};

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use fridge_core::store::{PantrySnapshot, RecipeRequirements, RecipeSource};

use crate::error::{conflict_on_foreign_key, conflict_on_unique, AppError};
use crate::models::{
    Ingredient, IngredientId, PantryEntry, Recipe, RecipeIngredient, RecipeKind, RequirementDraft,
    User, UserId,
};

/// Column values of a recipe row, excluding its id.
#[derive(Debug, Clone, Copy)]
pub struct RecipeFields<'a> {
    pub name: &'a str,
    pub kind: RecipeKind,
    pub instructions: Option<&'a str>,
    pub link: Option<&'a str>,
}

/// SQLite implementation of storage and of the [`RecipeSource`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ============ Users ============

    pub async fn insert_user(&self, email: &str) -> Result<User, AppError> {
        let id = sqlx::query("INSERT INTO users (email) VALUES (?)")
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, || format!("email already registered: {}", email)))?
            .last_insert_rowid();

        Ok(User {
            id,
            email: email.to_string(),
        })
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query("SELECT id, email FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(user_from_row).collect())
    }

    pub async fn find_user(&self, id: UserId) -> Result<Option<User>, AppError> {
        let row = sqlx::query("SELECT id, email FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    pub async fn update_user(&self, id: UserId, email: &str) -> Result<Option<User>, AppError> {
        let affected = sqlx::query("UPDATE users SET email = ? WHERE id = ?")
            .bind(email)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, || format!("email already registered: {}", email)))?
            .rows_affected();

        if affected == 0 {
            return Ok(None);
        }
        Ok(Some(User {
            id,
            email: email.to_string(),
        }))
    }

    /// Deletes a user; their pantry entries go with them.
    pub async fn delete_user(&self, id: UserId) -> Result<bool, AppError> {
        let affected = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    // ============ Ingredients ============

    pub async fn insert_ingredient(
        &self,
        name: &str,
        default_shelf_life_days: i64,
    ) -> Result<Ingredient, AppError> {
        let id = sqlx::query("INSERT INTO ingredients (name, default_shelf_life_days) VALUES (?, ?)")
            .bind(name)
            .bind(default_shelf_life_days)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, || format!("ingredient already exists: {}", name)))?
            .last_insert_rowid();

        Ok(Ingredient {
            id,
            name: name.to_string(),
            default_shelf_life_days,
        })
    }

    pub async fn list_ingredients(&self) -> Result<Vec<Ingredient>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, default_shelf_life_days FROM ingredients ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(ingredient_from_row).collect())
    }

    pub async fn find_ingredient(&self, id: IngredientId) -> Result<Option<Ingredient>, AppError> {
        let row =
            sqlx::query("SELECT id, name, default_shelf_life_days FROM ingredients WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.as_ref().map(ingredient_from_row))
    }

    pub async fn update_ingredient(
        &self,
        id: IngredientId,
        name: &str,
        default_shelf_life_days: i64,
    ) -> Result<Option<Ingredient>, AppError> {
        let affected =
            sqlx::query("UPDATE ingredients SET name = ?, default_shelf_life_days = ? WHERE id = ?")
                .bind(name)
                .bind(default_shelf_life_days)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    conflict_on_unique(e, || format!("ingredient already exists: {}", name))
                })?
                .rows_affected();

        if affected == 0 {
            return Ok(None);
        }
        Ok(Some(Ingredient {
            id,
            name: name.to_string(),
            default_shelf_life_days,
        }))
    }

    /// Number of pantry entries and recipe requirements pointing at an ingredient.
    pub async fn ingredient_references(&self, id: IngredientId) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT (SELECT COUNT(*) FROM user_ingredients WHERE ingredient_id = ?1)
                 + (SELECT COUNT(*) FROM recipe_ingredients WHERE ingredient_id = ?1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn delete_ingredient(&self, id: IngredientId) -> Result<bool, AppError> {
        let affected = sqlx::query("DELETE FROM ingredients WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_on_foreign_key(e, || format!("ingredient {} is in use", id)))?
            .rows_affected();
        Ok(affected > 0)
    }

    // ============ Pantry ============

    pub async fn insert_pantry_entry(
        &self,
        user_id: UserId,
        ingredient: &Ingredient,
        quantity: i64,
        expiry_date: NaiveDate,
    ) -> Result<PantryEntry, AppError> {
        let id = sqlx::query(
            "INSERT INTO user_ingredients (user_id, ingredient_id, quantity, expiry_date) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(ingredient.id)
        .bind(quantity)
        .bind(expiry_date)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            conflict_on_unique(e, || {
                format!("{} is already in the pantry of user {}", ingredient.name, user_id)
            })
        })?
        .last_insert_rowid();

        Ok(PantryEntry {
            id,
            user_id,
            ingredient_id: ingredient.id,
            ingredient_name: ingredient.name.clone(),
            quantity,
            expiry_date,
        })
    }

    /// A user's pantry, soonest expiry first.
    pub async fn list_pantry(&self, user_id: UserId) -> Result<Vec<PantryEntry>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT ui.id, ui.user_id, ui.ingredient_id, i.name AS ingredient_name,
                   ui.quantity, ui.expiry_date
            FROM user_ingredients ui
            JOIN ingredients i ON i.id = ui.ingredient_id
            WHERE ui.user_id = ?
            ORDER BY ui.expiry_date, i.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(pantry_entry_from_row).collect()
    }

    pub async fn find_pantry_entry(
        &self,
        user_id: UserId,
        ingredient_id: IngredientId,
    ) -> Result<Option<PantryEntry>, AppError> {
        let row = sqlx::query(
            r#"
            SELECT ui.id, ui.user_id, ui.ingredient_id, i.name AS ingredient_name,
                   ui.quantity, ui.expiry_date
            FROM user_ingredients ui
            JOIN ingredients i ON i.id = ui.ingredient_id
            WHERE ui.user_id = ? AND ui.ingredient_id = ?
            "#,
        )
        .bind(user_id)
        .bind(ingredient_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(pantry_entry_from_row).transpose()
    }

    pub async fn update_pantry_entry(
        &self,
        user_id: UserId,
        ingredient_id: IngredientId,
        quantity: i64,
        expiry_date: NaiveDate,
    ) -> Result<bool, AppError> {
        let affected = sqlx::query(
            "UPDATE user_ingredients SET quantity = ?, expiry_date = ? WHERE user_id = ? AND ingredient_id = ?",
        )
        .bind(quantity)
        .bind(expiry_date)
        .bind(user_id)
        .bind(ingredient_id)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(affected > 0)
    }

    pub async fn delete_pantry_entry(
        &self,
        user_id: UserId,
        ingredient_id: IngredientId,
    ) -> Result<bool, AppError> {
        let affected =
            sqlx::query("DELETE FROM user_ingredients WHERE user_id = ? AND ingredient_id = ?")
                .bind(user_id)
                .bind(ingredient_id)
                .execute(&self.pool)
                .await?
                .rows_affected();
        Ok(affected > 0)
    }

    // ============ Recipes ============

    /// Inserts a recipe and its requirements in one transaction.
    pub async fn insert_recipe(
        &self,
        id: &str,
        fields: RecipeFields<'_>,
        requirements: &[RequirementDraft],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO recipes (id, name, kind, instructions, link) VALUES (?, ?, ?, ?, ?)")
            .bind(id)
            .bind(fields.name)
            .bind(fields.kind.as_str())
            .bind(fields.instructions)
            .bind(fields.link)
            .execute(&mut *tx)
            .await
            .map_err(|e| conflict_on_unique(e, || format!("recipe already exists: {}", fields.name)))?;

        insert_requirements(&mut tx, id, requirements).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Rewrites a recipe row, and its requirements when `requirements` is
    /// `Some`. Returns `false` if the recipe does not exist.
    pub async fn update_recipe(
        &self,
        id: &str,
        fields: RecipeFields<'_>,
        requirements: Option<&[RequirementDraft]>,
    ) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let affected = sqlx::query(
            "UPDATE recipes SET name = ?, kind = ?, instructions = ?, link = ? WHERE id = ?",
        )
        .bind(fields.name)
        .bind(fields.kind.as_str())
        .bind(fields.instructions)
        .bind(fields.link)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, || format!("recipe already exists: {}", fields.name)))?
        .rows_affected();

        if affected == 0 {
            return Ok(false);
        }

        if let Some(requirements) = requirements {
            sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_requirements(&mut tx, id, requirements).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    pub async fn find_recipe(&self, id: &str) -> Result<Option<Recipe>, AppError> {
        Ok(self.fetch_recipes(Some(id)).await?.pop())
    }

    /// All recipes ordered by name.
    pub async fn list_recipes(&self) -> Result<Vec<Recipe>, AppError> {
        self.fetch_recipes(None).await
    }

    /// Deletes a recipe; its requirements go with it.
    pub async fn delete_recipe(&self, id: &str) -> Result<bool, AppError> {
        let affected = sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn fetch_recipes(&self, id: Option<&str>) -> Result<Vec<Recipe>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, kind, instructions, link
            FROM recipes
            WHERE (?1 IS NULL OR id = ?1)
            ORDER BY name, id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let requirement_rows = sqlx::query(
            r#"
            SELECT ri.recipe_id, ri.ingredient_id, i.name AS ingredient_name, ri.amount
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE (?1 IS NULL OR ri.recipe_id = ?1)
            ORDER BY i.name
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let mut requirements: HashMap<String, Vec<RecipeIngredient>> = HashMap::new();
        for row in &requirement_rows {
            requirements
                .entry(row.get("recipe_id"))
                .or_default()
                .push(RecipeIngredient {
                    ingredient_id: row.get("ingredient_id"),
                    ingredient_name: row.get("ingredient_name"),
                    amount: row.get("amount"),
                });
        }

        rows.iter()
            .map(|row| -> Result<Recipe, AppError> {
                let id: String = row.get("id");
                let kind: String = row.get("kind");
                let kind = kind
                    .parse::<RecipeKind>()
                    .with_context(|| format!("recipe {} has a corrupt kind", id))?;
                Ok(Recipe {
                    ingredients: requirements.remove(&id).unwrap_or_default(),
                    name: row.get("name"),
                    kind,
                    instructions: row.get("instructions"),
                    link: row.get("link"),
                    id,
                })
            })
            .collect()
    }
}

async fn insert_requirements(
    conn: &mut SqliteConnection,
    recipe_id: &str,
    requirements: &[RequirementDraft],
) -> Result<(), AppError> {
    for req in requirements {
        sqlx::query(
            "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) VALUES (?, ?, ?)",
        )
        .bind(recipe_id)
        .bind(req.ingredient_id)
        .bind(&req.amount)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            conflict_on_unique(e, || {
                format!("ingredient {} already in recipe", req.ingredient_id)
            })
        })?;
    }
    Ok(())
}

async fn load_owned_names(
    conn: &mut SqliteConnection,
    user_id: UserId,
) -> anyhow::Result<Option<BTreeSet<String>>> {
    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;
    if exists.is_none() {
        return Ok(None);
    }

    let names: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT i.name
        FROM user_ingredients ui
        JOIN ingredients i ON i.id = ui.ingredient_id
        WHERE ui.user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(names.into_iter().collect()))
}

async fn load_recipe_requirements(
    conn: &mut SqliteConnection,
) -> anyhow::Result<Vec<RecipeRequirements>> {
    let recipes = sqlx::query("SELECT id, name FROM recipes ORDER BY name, id")
        .fetch_all(&mut *conn)
        .await?;

    let rows = sqlx::query(
        r#"
        SELECT ri.recipe_id, i.name
        FROM recipe_ingredients ri
        JOIN ingredients i ON i.id = ri.ingredient_id
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    let mut required: HashMap<String, Vec<String>> = HashMap::new();
    for row in &rows {
        required
            .entry(row.get("recipe_id"))
            .or_default()
            .push(row.get("name"));
    }

    Ok(recipes
        .iter()
        .map(|row| {
            let recipe_id: String = row.get("id");
            RecipeRequirements {
                required: required.remove(&recipe_id).unwrap_or_default(),
                recipe_name: row.get("name"),
                recipe_id,
            }
        })
        .collect())
}

#[async_trait]
impl RecipeSource for SqliteStore {
    async fn pantry_ingredient_names(
        &self,
        user_id: UserId,
    ) -> anyhow::Result<Option<BTreeSet<String>>> {
        let mut conn = self.pool.acquire().await?;
        load_owned_names(&mut conn, user_id).await
    }

    async fn recipes_with_requirements(&self) -> anyhow::Result<Vec<RecipeRequirements>> {
        let mut conn = self.pool.acquire().await?;
        load_recipe_requirements(&mut conn).await
    }

    /// Reads pantry and recipes inside one transaction so a concurrent
    /// write cannot land between the two reads.
    async fn snapshot(&self, user_id: UserId) -> anyhow::Result<Option<PantrySnapshot>> {
        let mut tx = self.pool.begin().await?;

        let Some(owned) = load_owned_names(&mut tx, user_id).await? else {
            tx.rollback().await?;
            return Ok(None);
        };
        let recipes = load_recipe_requirements(&mut tx).await?;

        tx.commit().await?;
        Ok(Some(PantrySnapshot { owned, recipes }))
    }
}

fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
    }
}

fn ingredient_from_row(row: &SqliteRow) -> Ingredient {
    Ingredient {
        id: row.get("id"),
        name: row.get("name"),
        default_shelf_life_days: row.get("default_shelf_life_days"),
    }
}

fn pantry_entry_from_row(row: &SqliteRow) -> Result<PantryEntry, AppError> {
    Ok(PantryEntry {
        id: row.get("id"),
        user_id: row.get("user_id"),
        ingredient_id: row.get("ingredient_id"),
        ingredient_name: row.get("ingredient_name"),
        quantity: row.get("quantity"),
        expiry_date: row.try_get("expiry_date")?,
    })
}
