//! Item handlers
//!
//! The JSON read routes surface a structured 404 for missing items. The
//! form-driven write routes always redirect back to the listing, whatever
//! happened; the distinction between a validation failure and a missing id
//! lives only in the server log.

use crate::services::ItemError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use shelf_types::{CreateReport, Item};

/// Create/update form body. Missing fields deserialize as empty strings so
/// an absent name takes the validation path instead of a 422.
#[derive(Debug, Deserialize)]
pub struct ItemForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Item>>, StatusCode> {
    match state.items.list().await {
        Ok(items) => Ok(Json(items)),
        Err(e) => {
            tracing::error!("Failed to list items: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Item>, (StatusCode, Json<Value>)> {
    match state.items.get(id).await {
        Ok(item) => Ok(Json(item)),
        Err(ItemError::NotFound(_)) => {
            tracing::warn!("Item with id {} not found", id);
            Err((
                StatusCode::NOT_FOUND,
                Json(json!({"error": "Item not found"})),
            ))
        }
        Err(e) => {
            tracing::error!("Failed to get item {}: {}", id, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal error"})),
            ))
        }
    }
}

pub async fn create(State(state): State<AppState>, Form(form): Form<ItemForm>) -> Redirect {
    match state.items.create(&form.name, &form.description).await {
        Ok(_) => {}
        Err(ItemError::EmptyName) => {
            tracing::error!("Name field is required for item creation");
        }
        Err(e) => tracing::error!("Failed to create item: {}", e),
    }
    Redirect::to("/")
}

/// Create variant for test and load clients: reports the assigned id back
/// instead of redirecting.
pub async fn create_reporting(
    State(state): State<AppState>,
    Form(form): Form<ItemForm>,
) -> Response {
    match state.items.create(&form.name, &form.description).await {
        Ok(item) => Json(CreateReport {
            status: "success".to_string(),
            id: item.id,
            name: item.name,
            description: item.description,
        })
        .into_response(),
        Err(ItemError::EmptyName) => {
            tracing::error!("Name field is required for item creation");
            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create item: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<ItemForm>,
) -> Redirect {
    match state.items.update(id, &form.name, &form.description).await {
        Ok(_) => {}
        Err(ItemError::EmptyName) => {
            tracing::error!("Name field is required for item update");
        }
        Err(ItemError::NotFound(_)) => {
            tracing::warn!("No item with id {} found to update", id);
        }
        Err(e) => tracing::error!("Failed to update item {}: {}", id, e),
    }
    Redirect::to("/")
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Redirect {
    match state.items.delete(id).await {
        Ok(()) => {}
        Err(ItemError::NotFound(_)) => {
            tracing::warn!("No item with id {} found to delete", id);
        }
        Err(e) => tracing::error!("Failed to delete item {}: {}", id, e),
    }
    Redirect::to("/")
}
