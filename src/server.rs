//! HTTP server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Readiness message |
//! | `GET`  | `/test` | Service and datastore diagnostics |
//! | `POST` | `/api/recipes/from-image` | Guess a recipe from an uploaded photo (multipart) |
//! | `POST` | `/api/recipes/from-ingredients` | Match catalog recipes against `{ "ingredients": [...] }` |
//!
//! # Error Contract
//!
//! Client errors return `400` with a JSON body:
//!
//! ```json
//! { "detail": "No file uploaded", "code": "bad_request" }
//! ```
//!
//! Storage failures never surface as errors: the recipe or query is still
//! returned, with a `null` id where one applies.
//!
//! # CORS
//!
//! Any origin, method, and header is accepted with credentials allowed. The
//! allowed values are mirrored from the request.

use anyhow::Context;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::diagnostics::{self, DiagnosticsReport};
use crate::error::RecipeError;
use crate::matcher::match_recipes;
use crate::models::{ImageRecipeResponse, RecipeQuery, RecipeSummary};
use crate::resolver::resolve_from_filename;
use crate::store::{
    create_best_effort, SqliteStore, StoreHandle, RECIPE_KIND, RECIPE_QUERY_KIND,
};

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Image templates and seed recipes, parsed once at startup.
    catalog: Arc<Catalog>,
    /// Best-effort document store.
    store: StoreHandle,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>, store: StoreHandle) -> Self {
        Self { catalog, store }
    }
}

/// Open the configured document store.
///
/// A missing `[db]` section yields [`StoreHandle::Unconfigured`]; a failure
/// to open is logged and kept as [`StoreHandle::Failed`] so the server can
/// still start and report it.
pub async fn open_store(config: &Config) -> StoreHandle {
    let Some(db_config) = &config.db else {
        info!("no database configured, requests will not be recorded");
        return StoreHandle::Unconfigured;
    };

    match SqliteStore::open(db_config).await {
        Ok(store) => {
            info!(
                url = %db_config.url,
                name = db_config.name.as_deref().unwrap_or("-"),
                "database ready"
            );
            StoreHandle::Ready(Arc::new(store))
        }
        Err(e) => {
            warn!(error = %format!("{:#}", e), "database unavailable");
            StoreHandle::Failed(format!("{:#}", e))
        }
    }
}

/// Build the router with CORS and request tracing.
///
/// The upload route has no body size limit: photo contents are streamed
/// and discarded.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .route("/", get(handle_root))
        .route("/test", get(handle_test))
        .route(
            "/api/recipes/from-image",
            post(handle_from_image).layer(DefaultBodyLimit::disable()),
        )
        .route("/api/recipes/from-ingredients", post(handle_from_ingredients))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the HTTP server on `[server].bind`, opening the configured store.
///
/// Runs until Ctrl+C or SIGTERM.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let store = open_store(config).await;
    run_server_with_store(config, store).await
}

/// Like [`run_server`], but with an already-opened store.
pub async fn run_server_with_store(config: &Config, store: StoreHandle) -> anyhow::Result<()> {
    let bind_addr = config.bind_addr()?;
    let catalog = Arc::new(Catalog::builtin()?);

    info!(
        templates = catalog.templates().len(),
        seeds = catalog.seeds().len(),
        "catalog loaded"
    );

    let app = router(AppState::new(catalog, store));

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    /// Human-readable error message.
    detail: String,
    /// Machine-readable error code (e.g., `"bad_request"`).
    code: &'static str,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 400 Bad Request error.
fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

impl From<RecipeError> for AppError {
    fn from(err: RecipeError) -> Self {
        bad_request(err.to_string())
    }
}

// ============ GET / ============

#[derive(Serialize)]
struct RootResponse {
    message: &'static str,
}

async fn handle_root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Recipe AI backend ready",
    })
}

// ============ GET /test ============

/// Handler for `GET /test`. Always answers `200`.
async fn handle_test(State(state): State<AppState>) -> Json<DiagnosticsReport> {
    let report = diagnostics::collect(&state.store, |key| std::env::var_os(key).is_some()).await;
    Json(report)
}

// ============ POST /api/recipes/from-image ============

/// Handler for `POST /api/recipes/from-image`.
///
/// Uses the first multipart field that carries a non-empty filename. Every
/// field body is drained chunk by chunk so the upload stream is fully
/// consumed without buffering it; the bytes themselves are ignored.
async fn handle_from_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImageRecipeResponse>, AppError> {
    let mut filename: Option<String> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(e.body_text()))?
    {
        let field_filename = field.file_name().map(str::to_string);
        let mut size = 0usize;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| bad_request(e.body_text()))?
        {
            size += chunk.len();
        }

        if filename.is_none() {
            if let Some(name) = field_filename.filter(|n| !n.is_empty()) {
                debug!(filename = %name, bytes = size, "received upload");
                filename = Some(name);
            }
        }
    }

    let recipe = resolve_from_filename(&state.catalog, filename.as_deref())?;
    let id = create_best_effort(state.store.store(), RECIPE_KIND, &recipe).await;

    Ok(Json(ImageRecipeResponse {
        id,
        title: recipe.title,
        ingredients: recipe.ingredients,
        steps: recipe.steps,
    }))
}

// ============ POST /api/recipes/from-ingredients ============

/// Request body for `POST /api/recipes/from-ingredients`.
#[derive(Debug, Deserialize)]
pub struct IngredientsRequest {
    pub ingredients: Vec<String>,
}

/// Handler for `POST /api/recipes/from-ingredients`.
async fn handle_from_ingredients(
    State(state): State<AppState>,
    Json(payload): Json<IngredientsRequest>,
) -> Result<Json<Vec<RecipeSummary>>, AppError> {
    let (ingredients, matches) = match_recipes(&payload.ingredients, state.catalog.seeds())?;

    let query = RecipeQuery {
        ingredients,
        matches: matches.iter().map(|r| r.title.clone()).collect(),
    };
    create_best_effort(state.store.store(), RECIPE_QUERY_KIND, &query).await;

    Ok(Json(matches.into_iter().map(RecipeSummary::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_errors_are_bad_requests() {
        let err = AppError::from(RecipeError::NoFileUploaded);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "bad_request");
        assert_eq!(err.message, "No file uploaded");

        let err = AppError::from(RecipeError::NoIngredients);
        assert_eq!(err.message, "Podaj co najmniej jeden składnik");
    }

    #[tokio::test]
    async fn test_open_store_unconfigured() {
        let handle = open_store(&Config::minimal()).await;
        assert!(matches!(handle, StoreHandle::Unconfigured));
    }
}
