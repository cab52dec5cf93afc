//! Handlers for `/tags` and `/authors` — every known label, alphabetical.

use axum::{Json, extract::State};

use quill_core::{label::Label, store::PageStore};

use crate::{AppState, error::ApiError};

/// `GET /tags`
pub async fn tags<S: PageStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Label>>, ApiError> {
  Ok(Json(state.wiki.tags().await?))
}

/// `GET /authors`
pub async fn authors<S: PageStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Label>>, ApiError> {
  Ok(Json(state.wiki.authors().await?))
}
