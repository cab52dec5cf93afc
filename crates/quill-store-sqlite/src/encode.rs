//! Decoding helpers between SQLite column text and Rust domain types.
//!
//! Timestamps are stored as RFC 3339 UTC strings; their lexicographic order
//! equals chronological order, which the date-range filters rely on.

use chrono::{DateTime, Utc};
use quill_core::{
  label::LabelKind,
  page::{Page, PageSummary},
  revision::Revision,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Label tables ────────────────────────────────────────────────────────────

/// `(label table, association table, association column)` for a kind.
/// Tags and display authors share semantics but live in separate relations.
pub fn label_tables(kind: LabelKind) -> (&'static str, &'static str, &'static str) {
  match kind {
    LabelKind::Tag => ("tags", "page_tags", "tag_id"),
    LabelKind::Author => ("authors", "page_authors", "author_id"),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `pages` row.
pub struct RawPage {
  pub id:           i64,
  pub title:        String,
  pub content:      String,
  pub created_at:   String,
  pub updated_at:   String,
  pub created_by:   Option<i64>,
  pub discoverable: bool,
}

impl RawPage {
  pub fn into_page(self) -> Result<Page> {
    Ok(Page {
      id:           self.id,
      title:        self.title,
      content:      self.content,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
      created_by:   self.created_by,
      discoverable: self.discoverable,
    })
  }
}

/// Raw values read directly from a `revisions` row.
pub struct RawRevision {
  pub id:         i64,
  pub page_id:    i64,
  pub content:    String,
  pub author_id:  Option<i64>,
  pub created_at: String,
}

impl RawRevision {
  pub fn into_revision(self) -> Result<Revision> {
    Ok(Revision {
      id:         self.id,
      page_id:    self.page_id,
      content:    self.content,
      author_id:  self.author_id,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values for a listing/search result row (creator username resolved
/// through a LEFT JOIN on `users`).
pub struct RawSummary {
  pub id:         i64,
  pub title:      String,
  pub updated_at: String,
  pub author:     Option<String>,
}

impl RawSummary {
  pub fn into_summary(self) -> Result<PageSummary> {
    Ok(PageSummary {
      id:         self.id,
      title:      self.title,
      updated_at: decode_dt(&self.updated_at)?,
      author:     self.author,
    })
  }
}
