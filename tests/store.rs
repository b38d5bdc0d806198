//! `SqliteStore` as a `RecipeSource`, driven through the core engine.

use fridge::config::Config;
use fridge::db;
use fridge::migrate;
use fridge::models::RequirementDraft;
use fridge::sqlite_store::{RecipeFields, SqliteStore};
use fridge_core::models::RecipeKind;
use fridge_core::store::RecipeSource;
use fridge_core::SuggestError;
use tempfile::TempDir;

async fn open_store(tmp: &TempDir) -> SqliteStore {
    let config: Config = toml::from_str(&format!(
        r#"
[db]
path = "{}"

[server]
bind = "127.0.0.1:0"
"#,
        tmp.path().join("store.sqlite").display()
    ))
    .unwrap();

    let pool = db::connect(&config).await.unwrap();
    migrate::create_schema(&pool).await.unwrap();
    // Running it twice must be harmless.
    migrate::create_schema(&pool).await.unwrap();
    SqliteStore::new(pool)
}

fn internal(name: &str) -> RecipeFields<'_> {
    RecipeFields {
        name,
        kind: RecipeKind::Internal,
        instructions: Some("Cook."),
        link: None,
    }
}

fn needs(ids: &[i64]) -> Vec<RequirementDraft> {
    ids.iter()
        .map(|&ingredient_id| RequirementDraft {
            ingredient_id,
            amount: None,
        })
        .collect()
}

#[tokio::test]
async fn test_pantry_names_and_requirements() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp).await;

    let egg = store.insert_ingredient("egg", 14).await.unwrap();
    let flour = store.insert_ingredient("flour", 180).await.unwrap();
    let user = store.insert_user("cook@example.com").await.unwrap();
    let today = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    store.insert_pantry_entry(user.id, &egg, 6, today).await.unwrap();

    let owned = store
        .pantry_ingredient_names(user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(owned.into_iter().collect::<Vec<_>>(), vec!["egg"]);

    assert!(store.pantry_ingredient_names(999).await.unwrap().is_none());

    store
        .insert_recipe("r-1", internal("Bread"), &needs(&[flour.id, egg.id]))
        .await
        .unwrap();
    let recipes = store.recipes_with_requirements().await.unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].recipe_id, "r-1");
    let mut required = recipes[0].required.clone();
    required.sort();
    assert_eq!(required, vec!["egg", "flour"]);
}

#[tokio::test]
async fn test_engine_over_sqlite() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp).await;

    let egg = store.insert_ingredient("egg", 14).await.unwrap();
    let flour = store.insert_ingredient("flour", 180).await.unwrap();
    let milk = store.insert_ingredient("milk", 5).await.unwrap();
    let user = store.insert_user("cook@example.com").await.unwrap();
    let today = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    store.insert_pantry_entry(user.id, &egg, 1, today).await.unwrap();
    store.insert_pantry_entry(user.id, &flour, 1, today).await.unwrap();

    store
        .insert_recipe("p", internal("Pancakes"), &needs(&[egg.id, flour.id, milk.id]))
        .await
        .unwrap();
    store
        .insert_recipe("o", internal("Omelette"), &needs(&[egg.id]))
        .await
        .unwrap();

    let report = fridge_core::suggest(&store, user.id).await.unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(report[0].recipe_name, "Omelette");
    assert!(report[0].can_make);
    assert_eq!(report[1].recipe_name, "Pancakes");
    assert_eq!(report[1].missing_ingredients, vec!["milk"]);

    store
        .update_pantry_entry(user.id, egg.id, 40, today)
        .await
        .unwrap();
    assert_eq!(fridge_core::suggest(&store, user.id).await.unwrap(), report);
}

#[tokio::test]
async fn test_engine_unknown_user() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp).await;

    let err = fridge_core::suggest(&store, 7).await.unwrap_err();
    assert!(matches!(err, SuggestError::UserNotFound { user_id: 7 }));
}

#[tokio::test]
async fn test_delete_recipe_removes_requirements() {
    let tmp = TempDir::new().unwrap();
    let store = open_store(&tmp).await;

    let egg = store.insert_ingredient("egg", 14).await.unwrap();
    store
        .insert_recipe("o", internal("Omelette"), &needs(&[egg.id]))
        .await
        .unwrap();
    assert_eq!(store.ingredient_references(egg.id).await.unwrap(), 1);

    assert!(store.delete_recipe("o").await.unwrap());
    assert!(!store.delete_recipe("o").await.unwrap());
    assert_eq!(store.ingredient_references(egg.id).await.unwrap(), 0);
    assert!(store.delete_ingredient(egg.id).await.unwrap());
}
