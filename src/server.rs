//! HTTP API server.
//!
//! Exposes the user, ingredient, pantry, and recipe operations plus the
//! suggestion engine as a JSON API. Every handler delegates to the same
//! service functions the CLI uses.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Liveness message |
//! | `GET`  | `/health` | Health check (returns version) |
//! | `POST`/`GET` | `/ingredients` | Create / list ingredients |
//! | `GET`/`PUT`/`DELETE` | `/ingredients/{id}` | Read / update / delete one ingredient |
//! | `POST`/`GET` | `/users` | Create / list users |
//! | `GET`/`PUT`/`DELETE` | `/users/{id}` | Read / update / delete one user |
//! | `POST`/`GET` | `/users/{user_id}/ingredients` | Add to / list a pantry |
//! | `PUT`/`DELETE` | `/users/{user_id}/ingredients/{ingredient_id}` | Update / remove a pantry entry |
//! | `GET`  | `/recipes/suggest?user_id=N&makeable=true` | Recipe suggestions |
//! | `POST`/`GET` | `/recipes` | Create / list recipes |
//! | `GET`/`PUT`/`DELETE` | `/recipes/{id}` | Read / update / delete one recipe |
//!
//! Creates answer `201 Created` with the new resource, deletes answer
//! `204 No Content`.
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "quantity must be a positive integer, got 0" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `conflict` (409),
//! `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so a browser frontend
//! can call the API from another origin.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Path, Query, Request, State,
    },
    http::request::Parts,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db;
use crate::error::AppError;
use crate::ingredients;
use crate::models::{
    IngredientId, IngredientUpdate, NewIngredient, NewPantryEntry, NewUser, PantryUpdate,
    RecipeDraft, RecipeUpdate, UserId, UserUpdate,
};
use crate::pantry;
use crate::recipes;
use crate::sqlite_store::SqliteStore;
use crate::suggest;
use crate::users;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SqliteStore>,
    pub config: Arc<Config>,
}

/// Starts the HTTP server on `[server].bind` and runs until the process is
/// terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let pool = db::connect(config).await?;

    let state = AppState {
        store: Arc::new(SqliteStore::new(pool)),
        config: Arc::new(config.clone()),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "server listening");
    println!("Fridge server listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Assembles every route with CORS and request tracing.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route(
            "/ingredients",
            get(handle_list_ingredients).post(handle_create_ingredient),
        )
        .route(
            "/ingredients/{id}",
            get(handle_get_ingredient)
                .put(handle_update_ingredient)
                .delete(handle_delete_ingredient),
        )
        .route("/users", get(handle_list_users).post(handle_create_user))
        .route(
            "/users/{id}",
            get(handle_get_user)
                .put(handle_update_user)
                .delete(handle_delete_user),
        )
        .route(
            "/users/{user_id}/ingredients",
            get(handle_list_pantry).post(handle_add_pantry_entry),
        )
        .route(
            "/users/{user_id}/ingredients/{ingredient_id}",
            axum::routing::put(handle_update_pantry_entry).delete(handle_remove_pantry_entry),
        )
        .route("/recipes/suggest", get(handle_suggest))
        .route("/recipes", get(handle_list_recipes).post(handle_create_recipe))
        .route(
            "/recipes/{id}",
            get(handle_get_recipe)
                .put(handle_update_recipe)
                .delete(handle_delete_recipe),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============ Extractors ============

/// `Json` extractor whose rejection uses the API error body.
struct AppJson<T>(T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(AppJson(value))
    }
}

/// `Path` extractor whose rejection uses the API error body.
struct AppPath<T>(T);

impl<S, T> FromRequestParts<S> for AppPath<T>
where
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(AppPath(value))
    }
}

// ============ GET / and /health ============

async fn handle_root() -> &'static str {
    "Fridge App Backend working!"
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ /ingredients ============

async fn handle_create_ingredient(
    State(state): State<AppState>,
    AppJson(input): AppJson<NewIngredient>,
) -> Result<impl IntoResponse, AppError> {
    let ingredient =
        ingredients::create_ingredient(&state.store, &state.config.pantry, input).await?;
    Ok((StatusCode::CREATED, Json(ingredient)))
}

async fn handle_list_ingredients(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(ingredients::list_ingredients(&state.store).await?))
}

async fn handle_get_ingredient(
    State(state): State<AppState>,
    AppPath(id): AppPath<IngredientId>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(ingredients::get_ingredient(&state.store, id).await?))
}

async fn handle_update_ingredient(
    State(state): State<AppState>,
    AppPath(id): AppPath<IngredientId>,
    AppJson(input): AppJson<IngredientUpdate>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(ingredients::update_ingredient(&state.store, id, input).await?))
}

async fn handle_delete_ingredient(
    State(state): State<AppState>,
    AppPath(id): AppPath<IngredientId>,
) -> Result<StatusCode, AppError> {
    ingredients::delete_ingredient(&state.store, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============ /users ============

async fn handle_create_user(
    State(state): State<AppState>,
    AppJson(input): AppJson<NewUser>,
) -> Result<impl IntoResponse, AppError> {
    let user = users::create_user(&state.store, input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn handle_list_users(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(users::list_users(&state.store).await?))
}

async fn handle_get_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<UserId>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(users::get_user(&state.store, id).await?))
}

async fn handle_update_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<UserId>,
    AppJson(input): AppJson<UserUpdate>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(users::update_user(&state.store, id, input).await?))
}

async fn handle_delete_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<UserId>,
) -> Result<StatusCode, AppError> {
    users::delete_user(&state.store, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============ /users/{user_id}/ingredients ============

async fn handle_add_pantry_entry(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<UserId>,
    AppJson(input): AppJson<NewPantryEntry>,
) -> Result<impl IntoResponse, AppError> {
    let entry = pantry::add_pantry_entry(&state.store, user_id, input, pantry::today()).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn handle_list_pantry(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<UserId>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(pantry::list_pantry(&state.store, user_id).await?))
}

async fn handle_update_pantry_entry(
    State(state): State<AppState>,
    AppPath((user_id, ingredient_id)): AppPath<(UserId, IngredientId)>,
    AppJson(input): AppJson<PantryUpdate>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(
        pantry::update_pantry_entry(&state.store, user_id, ingredient_id, input).await?,
    ))
}

async fn handle_remove_pantry_entry(
    State(state): State<AppState>,
    AppPath((user_id, ingredient_id)): AppPath<(UserId, IngredientId)>,
) -> Result<StatusCode, AppError> {
    pantry::remove_pantry_entry(&state.store, user_id, ingredient_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============ GET /recipes/suggest ============

#[derive(Deserialize)]
struct SuggestQuery {
    user_id: UserId,
    #[serde(default)]
    makeable: bool,
}

async fn handle_suggest(
    State(state): State<AppState>,
    query: Result<Query<SuggestQuery>, axum::extract::rejection::QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let report = suggest::suggest_for_user(&state.store, query.user_id, query.makeable).await?;
    Ok(Json(report))
}

// ============ /recipes ============

async fn handle_create_recipe(
    State(state): State<AppState>,
    AppJson(input): AppJson<RecipeDraft>,
) -> Result<impl IntoResponse, AppError> {
    let recipe = recipes::create_recipe(&state.store, input).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

async fn handle_list_recipes(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(recipes::list_recipes(&state.store).await?))
}

async fn handle_get_recipe(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(recipes::get_recipe(&state.store, &id).await?))
}

async fn handle_update_recipe(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(input): AppJson<RecipeUpdate>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(recipes::update_recipe(&state.store, &id, input).await?))
}

async fn handle_delete_recipe(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<StatusCode, AppError> {
    recipes::delete_recipe(&state.store, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
