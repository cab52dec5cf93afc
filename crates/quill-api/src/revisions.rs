//! Handlers for revision history endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/pages/:title/revisions` | Newest first |
//! | `GET`  | `/revisions/:id` | Single snapshot |
//! | `POST` | `/revisions/:id/restore` | Rolls the owning page back |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};

use quill_core::{
  revision::{Revision, RevisionId},
  store::PageStore,
};

use crate::{AppState, error::ApiError};

/// `GET /pages/:title/revisions`
pub async fn list<S: PageStore>(
  State(state): State<AppState<S>>,
  Path(title): Path<String>,
) -> Result<Json<Vec<Revision>>, ApiError> {
  Ok(Json(state.wiki.revisions(&title).await?))
}

/// `GET /revisions/:id`
pub async fn get_one<S: PageStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<RevisionId>,
) -> Result<Json<Revision>, ApiError> {
  let revision = state
    .wiki
    .revision(id)
    .await?
    .ok_or(ApiError(quill_core::Error::RevisionNotFound(id)))?;
  Ok(Json(revision))
}

/// `POST /revisions/:id/restore`
pub async fn restore<S: PageStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<RevisionId>,
) -> Result<StatusCode, ApiError> {
  state.wiki.restore_revision(state.auth.as_ref(), id).await?;
  Ok(StatusCode::NO_CONTENT)
}
