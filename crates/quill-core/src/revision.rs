//! Revision — an immutable snapshot of a page's content.
//!
//! Revisions are append-only: captured once at page creation and once
//! immediately before every overwrite, never updated, and deleted only when
//! their page is deleted. History always reflects prior states, never the
//! just-applied one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{auth::UserId, page::PageId};

pub type RevisionId = i64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revision {
  pub id:         RevisionId,
  pub page_id:    PageId,
  /// Full snapshot, not a diff.
  pub content:    String,
  /// `None` for system-authored captures.
  pub author_id:  Option<UserId>,
  pub created_at: DateTime<Utc>,
}
