//! Error taxonomy for `quill-core`.
//!
//! The first five variants are expected failures: callers are meant to
//! branch on them. `Store` wraps anything unexpected from the backend;
//! no operation retries, and no failure outlives the call that hit it.

use thiserror::Error;

use crate::revision::RevisionId;

#[derive(Debug, Error)]
pub enum Error {
  /// The caller is not authenticated for a mutating operation.
  #[error("authentication required")]
  Unauthorized,

  #[error("page not found: {0}")]
  PageNotFound(String),

  #[error("revision not found: {0}")]
  RevisionNotFound(RevisionId),

  /// A create collided with an existing page title.
  #[error("page title already taken: {0}")]
  DuplicateTitle(String),

  /// A required field failed validation. Not the same as `DuplicateTitle`.
  #[error("validation error: {0}")]
  Validation(String),

  /// Unexpected datastore failure.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
