//! Error type for `quill-store-sqlite`.

use thiserror::Error;

use quill_core::{page::PageId, revision::RevisionId};

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// An insert or rename collided with an existing page title.
  #[error("page title already taken: {0}")]
  DuplicateTitle(String),

  #[error("page not found: {0}")]
  PageNotFound(PageId),

  #[error("revision not found: {0}")]
  RevisionNotFound(RevisionId),
}

/// Translate into the core taxonomy so expected failures stay structured
/// across the trait boundary.
impl From<Error> for quill_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::DuplicateTitle(title) => quill_core::Error::DuplicateTitle(title),
      Error::PageNotFound(id) => quill_core::Error::PageNotFound(id.to_string()),
      Error::RevisionNotFound(id) => quill_core::Error::RevisionNotFound(id),
      other => quill_core::Error::Store(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
