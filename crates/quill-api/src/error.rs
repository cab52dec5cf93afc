//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Handlers return core errors via `?`; the status mapping lives here so
//! every endpoint reports the taxonomy the same way.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub quill_core::Error);

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    use quill_core::Error;

    let status = match &self.0 {
      Error::Unauthorized => StatusCode::UNAUTHORIZED,
      Error::PageNotFound(_) | Error::RevisionNotFound(_) => {
        StatusCode::NOT_FOUND
      }
      Error::DuplicateTitle(_) => StatusCode::CONFLICT,
      Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": self.0.to_string() }))).into_response()
  }
}
