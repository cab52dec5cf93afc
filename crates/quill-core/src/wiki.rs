//! [`Wiki`] — the page lifecycle gate.
//!
//! Composes a [`PageStore`] backend with a caller-supplied
//! [`AuthContext`]: every mutating operation checks authentication before
//! touching the store, and expected failures come back as structured
//! [`Error`](crate::Error) variants for callers to branch on.

use crate::{
  Error, Result,
  auth::AuthContext,
  label::{Label, LabelKind},
  page::{NewPage, PageId, PageSummary, PageView},
  revision::{Revision, RevisionId},
  store::{PageQuery, PageStore},
};

// ─── Input type ──────────────────────────────────────────────────────────────

/// Input to [`Wiki::create_page`]. The creating user and all timestamps are
/// filled in by the repository and store.
#[derive(Debug, Clone)]
pub struct CreatePage {
  pub title:        String,
  pub content:      String,
  pub tags:         Vec<String>,
  pub authors:      Vec<String>,
  pub discoverable: bool,
}

impl CreatePage {
  pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
    Self {
      title:        title.into(),
      content:      content.into(),
      tags:         Vec::new(),
      authors:      Vec::new(),
      discoverable: true,
    }
  }
}

// ─── Repository ──────────────────────────────────────────────────────────────

/// The page repository. Cloning is as cheap as cloning the backend handle.
#[derive(Clone)]
pub struct Wiki<S> {
  store: S,
}

impl<S: PageStore> Wiki<S> {
  pub fn new(store: S) -> Self { Self { store } }

  // ── Mutations — all gated on the auth context ─────────────────────────

  /// Create a page: page row, initial revision, then author and tag
  /// attachment. Fails with [`Error::Validation`] on a blank title and
  /// [`Error::DuplicateTitle`] when the title is taken.
  pub async fn create_page(
    &self,
    auth: &dyn AuthContext,
    input: CreatePage,
  ) -> Result<PageId> {
    let user = auth.current_user().ok_or(Error::Unauthorized)?;
    if input.title.trim().is_empty() {
      return Err(Error::Validation("page title must not be empty".into()));
    }

    let page = self
      .store
      .create_page(NewPage {
        title:        input.title,
        content:      input.content,
        created_by:   Some(user.id),
        discoverable: input.discoverable,
        tags:         input.tags,
        authors:      input.authors,
      })
      .await
      .map_err(Into::into)?;

    Ok(page.id)
  }

  /// Overwrite a page's content. The store captures a revision of the
  /// content as it stood before this change.
  pub async fn update_page(
    &self,
    auth: &dyn AuthContext,
    title: &str,
    content: &str,
  ) -> Result<()> {
    let user = auth.current_user().ok_or(Error::Unauthorized)?;
    let view = self.require_page(title).await?;
    self
      .store
      .update_content(view.page.id, content, Some(user.id))
      .await
      .map_err(Into::into)
  }

  /// Delete a page and its entire revision history. Label rows survive.
  pub async fn delete_page(
    &self,
    auth: &dyn AuthContext,
    title: &str,
  ) -> Result<()> {
    if !auth.is_logged_in() {
      return Err(Error::Unauthorized);
    }
    let view = self.require_page(title).await?;
    self.store.delete_page(view.page.id).await.map_err(Into::into)
  }

  /// Roll a page back to an earlier revision. The current content is
  /// snapshotted first, so the restore itself becomes part of history.
  pub async fn restore_revision(
    &self,
    auth: &dyn AuthContext,
    id: RevisionId,
  ) -> Result<()> {
    let user = auth.current_user().ok_or(Error::Unauthorized)?;
    self
      .store
      .restore_revision(id, Some(user.id))
      .await
      .map_err(Into::into)
  }

  /// Full replace of a page's tag set.
  pub async fn update_tags(
    &self,
    auth: &dyn AuthContext,
    title: &str,
    names: &[String],
  ) -> Result<()> {
    self.replace_labels(auth, title, LabelKind::Tag, names).await
  }

  /// Full replace of a page's display-author set.
  pub async fn update_authors(
    &self,
    auth: &dyn AuthContext,
    title: &str,
    names: &[String],
  ) -> Result<()> {
    self.replace_labels(auth, title, LabelKind::Author, names).await
  }

  async fn replace_labels(
    &self,
    auth: &dyn AuthContext,
    title: &str,
    kind: LabelKind,
    names: &[String],
  ) -> Result<()> {
    if !auth.is_logged_in() {
      return Err(Error::Unauthorized);
    }
    let view = self.require_page(title).await?;
    self
      .store
      .replace_labels(view.page.id, kind, names)
      .await
      .map_err(Into::into)
  }

  // ── Reads — ungated ───────────────────────────────────────────────────

  /// Exact title lookup, enriched with tag and author lists.
  pub async fn get_page(&self, title: &str) -> Result<Option<PageView>> {
    self.store.get_page(title).await.map_err(Into::into)
  }

  pub async fn page_by_id(&self, id: PageId) -> Result<Option<PageView>> {
    self.store.get_page_by_id(id).await.map_err(Into::into)
  }

  /// Revision history for a page, newest first.
  pub async fn revisions(&self, title: &str) -> Result<Vec<Revision>> {
    let view = self.require_page(title).await?;
    self.store.list_revisions(view.page.id).await.map_err(Into::into)
  }

  pub async fn revision(&self, id: RevisionId) -> Result<Option<Revision>> {
    self.store.get_revision(id).await.map_err(Into::into)
  }

  /// Discoverable pages, most recently updated first.
  pub async fn list_pages(
    &self,
    limit: usize,
    offset: usize,
  ) -> Result<Vec<PageSummary>> {
    self.store.list_pages(limit, offset).await.map_err(Into::into)
  }

  /// All titles alphabetically, hidden pages included.
  pub async fn list_titles(&self) -> Result<Vec<String>> {
    self.store.list_titles().await.map_err(Into::into)
  }

  pub async fn tags(&self) -> Result<Vec<Label>> {
    self.store.all_labels(LabelKind::Tag).await.map_err(Into::into)
  }

  pub async fn authors(&self) -> Result<Vec<Label>> {
    self.store.all_labels(LabelKind::Author).await.map_err(Into::into)
  }

  /// Filtered search. A query with no criteria at all does not search and
  /// returns an empty result.
  pub async fn search(&self, query: &PageQuery) -> Result<Vec<PageSummary>> {
    if query.is_empty() {
      return Ok(Vec::new());
    }
    self.store.search(query).await.map_err(Into::into)
  }

  // ── Helpers ───────────────────────────────────────────────────────────

  async fn require_page(&self, title: &str) -> Result<PageView> {
    self
      .store
      .get_page(title)
      .await
      .map_err(Into::into)?
      .ok_or_else(|| Error::PageNotFound(title.to_owned()))
  }
}
