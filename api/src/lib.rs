//! HTTP API for the Tutorial Management service.
//!
//! Routes (all JSON):
//! - `GET    /api/tutorials[?title2=..]`: list, optionally by title substring
//! - `POST   /api/tutorials`: create (always unpublished)
//! - `DELETE /api/tutorials`: delete all
//! - `GET    /api/tutorials/published`: list published
//! - `GET    /api/tutorials/{id}`, `PUT`, `DELETE`: single tutorial
//! - `GET    /v3/api-docs`: OpenAPI document
//!
//! Empty listings answer `204 No Content`; unknown ids answer `404`.

use std::sync::Arc;

use axum::{
    Router,
    routing::{MethodRouter, get},
};
use serde_json::Value;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tutorial_store::TutorialStore;

pub mod config;
pub mod error;
pub mod openapi;
pub mod routes;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use tutorial_store::Tutorial;

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<TutorialStore>,
    pub api_doc: Arc<Value>,
}

impl AppState {
    pub fn new(store: Arc<TutorialStore>, config: &ApiConfig) -> Self {
        Self {
            store,
            api_doc: Arc::new(openapi::document(config)),
        }
    }
}

/// Build the HTTP API router over `store`.
///
/// Fails only when the configuration is invalid.
pub fn build_router(store: Arc<TutorialStore>, config: &ApiConfig) -> ApiResult<Router> {
    let cors = config.cors_layer()?;
    let state = AppState::new(store, config);

    Ok(api_routes(get(routes::list_published), state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

/// Assembles the `/api` routes and the docs route with panic handling.
/// Panics in `published` answer 204; panics anywhere else answer 500.
fn api_routes(published: MethodRouter<AppState>, state: AppState) -> Router {
    Router::new()
        .route(
            openapi::TUTORIALS,
            get(routes::list_tutorials)
                .post(routes::create_tutorial)
                .delete(routes::delete_all_tutorials),
        )
        .route(
            openapi::PUBLISHED,
            published.layer(CatchPanicLayer::custom(routes::panic_as_no_content)),
        )
        .route(
            openapi::TUTORIAL_BY_ID,
            get(routes::get_tutorial)
                .put(routes::update_tutorial)
                .delete(routes::delete_tutorial),
        )
        .route(openapi::API_DOCS, get(routes::api_docs))
        .with_state(state)
        .layer(CatchPanicLayer::custom(routes::panic_as_internal_error))
}
