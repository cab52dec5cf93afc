//! Page — the title-addressed unit of content.
//!
//! A page row caches its current content for fast reads; the full history
//! lives in the append-only revision table. Accepted duplication, not
//! normalized away.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{auth::UserId, label::Label};

pub type PageId = i64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
  pub id:           PageId,
  /// Unique, non-empty; doubles as the external lookup key.
  pub title:        String,
  pub content:      String,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
  /// The account that created the page; `None` for system-authored pages.
  pub created_by:   Option<UserId>,
  /// Governs inclusion in the default listing, not direct lookup.
  pub discoverable: bool,
}

/// Input to [`PageStore::create_page`](crate::store::PageStore::create_page).
/// Timestamps are always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewPage {
  pub title:        String,
  pub content:      String,
  pub created_by:   Option<UserId>,
  pub discoverable: bool,
  /// Tag names to attach; trimmed, blanks skipped, created lazily.
  pub tags:         Vec<String>,
  /// Display author names to attach, same treatment as tags.
  pub authors:      Vec<String>,
}

/// Read model for page lookup: the page plus its resolved tag and display
/// author lists, both alphabetical.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageView {
  pub page:    Page,
  pub tags:    Vec<Label>,
  pub authors: Vec<Label>,
}

/// Listing and search result row. `author` is the creating user's username,
/// resolved when the account still exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSummary {
  pub id:         PageId,
  pub title:      String,
  pub updated_at: DateTime<Utc>,
  pub author:     Option<String>,
}
