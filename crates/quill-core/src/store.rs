//! The `PageStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `quill-store-sqlite`).
//! Higher layers (`quill-api`, the [`Wiki`](crate::wiki::Wiki) repository)
//! depend on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  auth::UserId,
  label::{Label, LabelId, LabelKind},
  page::{NewPage, Page, PageId, PageSummary, PageView},
  revision::{Revision, RevisionId},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`PageStore::search`].
///
/// Every field is independently optional. Supplied predicate groups combine
/// with AND; the `tags` list matches pages carrying ANY of the listed tags.
#[derive(Debug, Clone, Default)]
pub struct PageQuery {
  /// Case-insensitive substring match against title OR content.
  pub text:         Option<String>,
  /// OR semantics within the list.
  pub tags:         Vec<String>,
  /// Exact match against the page's creating user — not the display-author
  /// list.
  pub author:       Option<String>,
  /// Inclusive lower bound on `updated_at`.
  pub updated_from: Option<DateTime<Utc>>,
  /// Inclusive upper bound on `updated_at`.
  pub updated_to:   Option<DateTime<Utc>>,
  pub limit:        Option<usize>,
  pub offset:       Option<usize>,
}

impl PageQuery {
  /// `true` when no predicate is supplied (limit/offset do not count).
  pub fn is_empty(&self) -> bool {
    self.text.as_deref().is_none_or(str::is_empty)
      && self.tags.is_empty()
      && self.author.is_none()
      && self.updated_from.is_none()
      && self.updated_to.is_none()
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Quill page store backend.
///
/// Revisions are append-only: no implementation ever updates or reorders
/// them. Every mutating operation executes as a single unit of work, so a
/// failure mid-sequence cannot leave a page without its initial revision or
/// with a half-replaced label set.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PageStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Pages ─────────────────────────────────────────────────────────────

  /// Insert the page row, capture the initial revision, then attach each
  /// author and tag name, all in one transaction. Fails with a
  /// duplicate-title error (never a generic one) when the title is taken.
  fn create_page(
    &self,
    new: NewPage,
  ) -> impl Future<Output = Result<Page, Self::Error>> + Send + '_;

  /// Look up a page by exact title — no fuzzy fallback. Returns the page
  /// enriched with its resolved tag and author lists.
  fn get_page<'a>(
    &'a self,
    title: &'a str,
  ) -> impl Future<Output = Result<Option<PageView>, Self::Error>> + Send + 'a;

  fn get_page_by_id(
    &self,
    id: PageId,
  ) -> impl Future<Output = Result<Option<PageView>, Self::Error>> + Send + '_;

  /// Capture a revision of the current content, then overwrite it and bump
  /// `updated_at`, in one transaction so history is written before the page.
  fn update_content<'a>(
    &'a self,
    id: PageId,
    content: &'a str,
    author: Option<UserId>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete the page's revisions, then the page row. Label associations
  /// cascade per schema; label rows themselves are left behind.
  fn delete_page(
    &self,
    id: PageId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Most-recently-updated first, `discoverable` pages only.
  fn list_pages(
    &self,
    limit: usize,
    offset: usize,
  ) -> impl Future<Output = Result<Vec<PageSummary>, Self::Error>> + Send + '_;

  /// Every title alphabetically, irrespective of discoverability.
  /// Administrative enumeration; a distinct contract from [`list_pages`].
  ///
  /// [`list_pages`]: PageStore::list_pages
  fn list_titles(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  // ── Revisions ─────────────────────────────────────────────────────────

  /// Insert exactly one immutable revision row. `page_id` must reference an
  /// existing page; `content` may be empty; `author` may be `None`
  /// (system-authored).
  fn capture_revision<'a>(
    &'a self,
    page_id: PageId,
    content: &'a str,
    author: Option<UserId>,
  ) -> impl Future<Output = Result<RevisionId, Self::Error>> + Send + 'a;

  /// Newest first.
  fn list_revisions(
    &self,
    page_id: PageId,
  ) -> impl Future<Output = Result<Vec<Revision>, Self::Error>> + Send + '_;

  fn get_revision(
    &self,
    id: RevisionId,
  ) -> impl Future<Output = Result<Option<Revision>, Self::Error>> + Send + '_;

  /// Capture a safety snapshot of the page's current content, then
  /// overwrite it with the target revision's content and bump `updated_at`,
  /// in one transaction. Neither the restored revision nor any later one is
  /// removed; history is never truncated.
  fn restore_revision(
    &self,
    id: RevisionId,
    author: Option<UserId>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Labels (tags and display authors) ─────────────────────────────────

  /// Case-sensitive exact-match lookup, creating the row if absent. A
  /// losing concurrent insert resolves to the winner's id rather than
  /// surfacing a uniqueness error.
  fn get_or_create_label<'a>(
    &'a self,
    kind: LabelKind,
    name: &'a str,
  ) -> impl Future<Output = Result<LabelId, Self::Error>> + Send + 'a;

  /// Idempotent: attaching an already-attached pair is a no-op.
  fn attach_label(
    &self,
    page_id: PageId,
    kind: LabelKind,
    label: LabelId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn detach_label(
    &self,
    page_id: PageId,
    kind: LabelKind,
    label: LabelId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Alphabetical.
  fn labels_for_page(
    &self,
    page_id: PageId,
    kind: LabelKind,
  ) -> impl Future<Output = Result<Vec<Label>, Self::Error>> + Send + '_;

  /// Detach everything currently attached, then attach each name in the
  /// input (trimmed, blanks discarded, each via get-or-create), in one
  /// transaction so no observer sees an empty set mid-replace.
  fn replace_labels<'a>(
    &'a self,
    page_id: PageId,
    kind: LabelKind,
    names: &'a [String],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Every known label of `kind`, alphabetical.
  fn all_labels(
    &self,
    kind: LabelKind,
  ) -> impl Future<Output = Result<Vec<Label>, Self::Error>> + Send + '_;

  // ── Search ────────────────────────────────────────────────────────────

  /// Filtered page lookup, newest-`updated_at` first. No relevance
  /// scoring; substring matching is delegated to the datastore.
  fn search<'a>(
    &'a self,
    query: &'a PageQuery,
  ) -> impl Future<Output = Result<Vec<PageSummary>, Self::Error>> + Send + 'a;
}
