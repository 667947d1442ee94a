//! Request handlers for the tutorial endpoints.

use std::any::Any;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{error, info};
use tutorial_store::Tutorial;

use crate::AppState;
use crate::error::{ApiError, ApiResult};

/// Query string for the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct TitleFilter {
    /// Part of the title to search for.
    pub title2: Option<String>,
}

/// GET /api/tutorials
pub async fn list_tutorials(
    State(state): State<AppState>,
    Query(filter): Query<TitleFilter>,
) -> Response {
    let tutorials = match filter.title2.as_deref() {
        Some(title) => state.store.find_by_title_contains(title),
        None => state.store.find_all(),
    };
    list_response(tutorials)
}

/// GET /api/tutorials/published
pub async fn list_published(State(state): State<AppState>) -> Response {
    list_response(state.store.find_by_published(true))
}

/// GET /api/tutorials/{id}
pub async fn get_tutorial(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Tutorial>> {
    state
        .store
        .find_by_id(id)
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

/// POST /api/tutorials
///
/// The client-supplied id and published flag are ignored: new tutorials
/// always start unpublished.
pub async fn create_tutorial(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Tutorial>> {
    let input: Tutorial = parse_body(&headers, &body)?;
    let saved = state
        .store
        .save(Tutorial::new(input.title, input.description, false));
    info!(id = saved.id, title = %saved.title, "tutorial created");
    Ok(Json(saved))
}

/// PUT /api/tutorials/{id}
pub async fn update_tutorial(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Tutorial>> {
    let input: Tutorial = parse_body(&headers, &body)?;
    let updated = state.store.update(id, |t| {
        t.title = input.title;
        t.description = input.description;
        t.published = input.published;
    })?;
    info!(id, "tutorial updated");
    Ok(Json(updated))
}

/// DELETE /api/tutorials/{id}
pub async fn delete_tutorial(State(state): State<AppState>, Path(id): Path<i64>) -> StatusCode {
    state.store.delete_by_id(id);
    info!(id, "tutorial deleted");
    StatusCode::NO_CONTENT
}

/// DELETE /api/tutorials
pub async fn delete_all_tutorials(State(state): State<AppState>) -> StatusCode {
    state.store.delete_all();
    info!("all tutorials deleted");
    StatusCode::NO_CONTENT
}

/// GET /v3/api-docs
pub async fn api_docs(State(state): State<AppState>) -> Json<Value> {
    Json((*state.api_doc).clone())
}

/// Empty listings answer 204 rather than an empty array.
fn list_response(tutorials: Vec<Tutorial>) -> Response {
    if tutorials.is_empty() {
        StatusCode::NO_CONTENT.into_response()
    } else {
        Json(tutorials).into_response()
    }
}

/// Decodes a JSON request body. An empty body or a literal `null` counts
/// as missing; a non-empty body must be declared as JSON.
fn parse_body<T: DeserializeOwned>(headers: &HeaderMap, body: &Bytes) -> ApiResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::MissingBody);
    }
    check_json_content_type(headers)?;
    serde_json::from_slice::<Option<T>>(body)?.ok_or(ApiError::MissingBody)
}

/// Accepts `application/json` and `application/*+json`, with any parameters.
fn check_json_content_type(headers: &HeaderMap) -> ApiResult<()> {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        return Err(ApiError::UnsupportedMediaType("none".to_string()));
    };
    let raw = value.to_str().unwrap_or_default();
    let mime = raw.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    let is_json = mime == "application/json"
        || (mime.starts_with("application/") && mime.ends_with("+json"));
    if is_json {
        Ok(())
    } else {
        Err(ApiError::UnsupportedMediaType(raw.to_string()))
    }
}

/// Response used when a handler panics.
pub fn panic_as_internal_error(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic_message(err.as_ref());
    error!(panic = %message, "handler panicked");
    ApiError::Internal(message).into_response()
}

/// Response used when the published listing panics: failures there are
/// reported as an empty result.
pub fn panic_as_no_content(err: Box<dyn Any + Send + 'static>) -> Response {
    error!(panic = %panic_message(err.as_ref()), "published listing panicked");
    StatusCode::NO_CONTENT.into_response()
}

fn panic_message(err: &(dyn Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
