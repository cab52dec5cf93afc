//! [`SqlitePageStore`] — the SQLite implementation of [`PageStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use quill_core::{
  auth::UserId,
  label::{Label, LabelId, LabelKind},
  page::{NewPage, Page, PageId, PageSummary, PageView},
  revision::{Revision, RevisionId},
  store::{PageQuery, PageStore},
};

use crate::{
  Error, Result,
  encode::{RawPage, RawRevision, RawSummary, encode_dt, label_tables},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Quill page store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqlitePageStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqlitePageStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Connection-level helpers ────────────────────────────────────────────────
//
// These run inside a `call` closure, against either a bare connection or an
// open transaction, so composite operations can share one unit of work.

/// Insert-or-fetch a label id. The unique constraint on `name` is the
/// authority: a losing concurrent insert lands on the conflict arm and
/// resolves to the winner's row.
fn get_or_create_label_in(
  conn: &rusqlite::Connection,
  kind: LabelKind,
  name: &str,
) -> rusqlite::Result<LabelId> {
  let (table, _, _) = label_tables(kind);
  conn.query_row(
    &format!(
      "INSERT INTO {table} (name) VALUES (?1)
       ON CONFLICT(name) DO UPDATE SET name = excluded.name
       RETURNING id"
    ),
    rusqlite::params![name],
    |row| row.get(0),
  )
}

/// Trim, skip blanks, get-or-create, attach. Idempotent per pair.
fn attach_label_in(
  conn: &rusqlite::Connection,
  page_id: PageId,
  kind: LabelKind,
  name: &str,
) -> rusqlite::Result<()> {
  let name = name.trim();
  if name.is_empty() {
    return Ok(());
  }
  let label_id = get_or_create_label_in(conn, kind, name)?;
  let (_, assoc, col) = label_tables(kind);
  conn.execute(
    &format!("INSERT OR IGNORE INTO {assoc} (page_id, {col}) VALUES (?1, ?2)"),
    rusqlite::params![page_id, label_id],
  )?;
  Ok(())
}

fn labels_for_page_in(
  conn: &rusqlite::Connection,
  page_id: PageId,
  kind: LabelKind,
) -> rusqlite::Result<Vec<Label>> {
  let (table, assoc, col) = label_tables(kind);
  let mut stmt = conn.prepare(&format!(
    "SELECT l.id, l.name
     FROM {table} l
     JOIN {assoc} a ON a.{col} = l.id
     WHERE a.page_id = ?1
     ORDER BY l.name"
  ))?;
  stmt
    .query_map(rusqlite::params![page_id], |row| {
      Ok(Label { id: row.get(0)?, name: row.get(1)? })
    })?
    .collect()
}

fn insert_revision_in(
  conn: &rusqlite::Connection,
  page_id: PageId,
  content: &str,
  author: Option<UserId>,
  at: &str,
) -> rusqlite::Result<RevisionId> {
  conn.execute(
    "INSERT INTO revisions (page_id, content, author_id, created_at)
     VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![page_id, content, author, at],
  )?;
  Ok(conn.last_insert_rowid())
}

const PAGE_COLUMNS: &str =
  "id, title, content, created_at, updated_at, created_by, discoverable";

fn page_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPage> {
  Ok(RawPage {
    id:           row.get(0)?,
    title:        row.get(1)?,
    content:      row.get(2)?,
    created_at:   row.get(3)?,
    updated_at:   row.get(4)?,
    created_by:   row.get(5)?,
    discoverable: row.get(6)?,
  })
}

/// Load a page plus its label lists in one closure-scoped read.
fn page_view_in(
  conn: &rusqlite::Connection,
  where_clause: &str,
  param: impl rusqlite::ToSql,
) -> rusqlite::Result<Option<(RawPage, Vec<Label>, Vec<Label>)>> {
  let raw = conn
    .query_row(
      &format!("SELECT {PAGE_COLUMNS} FROM pages WHERE {where_clause}"),
      rusqlite::params![param],
      page_row,
    )
    .optional()?;

  let Some(raw) = raw else { return Ok(None) };
  let tags = labels_for_page_in(conn, raw.id, LabelKind::Tag)?;
  let authors = labels_for_page_in(conn, raw.id, LabelKind::Author)?;
  Ok(Some((raw, tags, authors)))
}

fn assemble_view(
  loaded: Option<(RawPage, Vec<Label>, Vec<Label>)>,
) -> Result<Option<PageView>> {
  loaded
    .map(|(raw, tags, authors)| {
      Ok(PageView { page: raw.into_page()?, tags, authors })
    })
    .transpose()
}

/// `true` for the unique-constraint failure a duplicate page title raises.
fn is_unique_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── PageStore impl ──────────────────────────────────────────────────────────

impl PageStore for SqlitePageStore {
  type Error = Error;

  // ── Pages ─────────────────────────────────────────────────────────────────

  async fn create_page(&self, new: NewPage) -> Result<Page> {
    let now = Utc::now();
    let now_str = encode_dt(now);
    let title = new.title.clone();

    let created = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO pages (title, content, created_at, updated_at, created_by, discoverable)
           VALUES (?1, ?2, ?3, ?3, ?4, ?5)",
          rusqlite::params![
            new.title,
            new.content,
            now_str,
            new.created_by,
            new.discoverable,
          ],
        )?;
        let page_id = tx.last_insert_rowid();

        insert_revision_in(&tx, page_id, &new.content, new.created_by, &now_str)?;
        for name in &new.authors {
          attach_label_in(&tx, page_id, LabelKind::Author, name)?;
        }
        for name in &new.tags {
          attach_label_in(&tx, page_id, LabelKind::Tag, name)?;
        }
        tx.commit()?;

        Ok(Page {
          id:           page_id,
          title:        new.title,
          content:      new.content,
          created_at:   now,
          updated_at:   now,
          created_by:   new.created_by,
          discoverable: new.discoverable,
        })
      })
      .await;

    match created {
      Ok(page) => Ok(page),
      Err(e) if is_unique_violation(&e) => Err(Error::DuplicateTitle(title)),
      Err(e) => Err(e.into()),
    }
  }

  async fn get_page(&self, title: &str) -> Result<Option<PageView>> {
    let title = title.to_owned();
    let loaded = self
      .conn
      .call(move |conn| page_view_in(conn, "title = ?1", title).map_err(Into::into))
      .await?;
    assemble_view(loaded)
  }

  async fn get_page_by_id(&self, id: PageId) -> Result<Option<PageView>> {
    let loaded = self
      .conn
      .call(move |conn| page_view_in(conn, "id = ?1", id).map_err(Into::into))
      .await?;
    assemble_view(loaded)
  }

  async fn update_content(
    &self,
    id: PageId,
    content: &str,
    author: Option<UserId>,
  ) -> Result<()> {
    let content = content.to_owned();
    let now_str = encode_dt(Utc::now());

    let updated: Option<()> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let current: Option<String> = tx
          .query_row(
            "SELECT content FROM pages WHERE id = ?1",
            rusqlite::params![id],
            |row| row.get(0),
          )
          .optional()?;
        let Some(current) = current else { return Ok(None) };

        // History first: the pre-update content becomes a revision.
        insert_revision_in(&tx, id, &current, author, &now_str)?;
        tx.execute(
          "UPDATE pages SET content = ?1, updated_at = ?2 WHERE id = ?3",
          rusqlite::params![content, now_str, id],
        )?;
        tx.commit()?;
        Ok(Some(()))
      })
      .await?;

    updated.ok_or(Error::PageNotFound(id))
  }

  async fn delete_page(&self, id: PageId) -> Result<()> {
    let deleted: Option<()> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let exists: bool = tx
          .query_row(
            "SELECT 1 FROM pages WHERE id = ?1",
            rusqlite::params![id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !exists {
          return Ok(None);
        }

        // Revisions first, then the page; label associations cascade.
        tx.execute("DELETE FROM revisions WHERE page_id = ?1", rusqlite::params![id])?;
        tx.execute("DELETE FROM pages WHERE id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        Ok(Some(()))
      })
      .await?;

    deleted.ok_or(Error::PageNotFound(id))
  }

  async fn list_pages(
    &self,
    limit: usize,
    offset: usize,
  ) -> Result<Vec<PageSummary>> {
    let raws: Vec<RawSummary> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT p.id, p.title, p.updated_at, u.username
           FROM pages p
           LEFT JOIN users u ON u.id = p.created_by
           WHERE p.discoverable = 1
           ORDER BY p.updated_at DESC
           LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt
          .query_map(
            rusqlite::params![limit as i64, offset as i64],
            |row| {
              Ok(RawSummary {
                id:         row.get(0)?,
                title:      row.get(1)?,
                updated_at: row.get(2)?,
                author:     row.get(3)?,
              })
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSummary::into_summary).collect()
  }

  async fn list_titles(&self) -> Result<Vec<String>> {
    let titles = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT title FROM pages ORDER BY title")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(titles)
  }

  // ── Revisions ─────────────────────────────────────────────────────────────

  async fn capture_revision(
    &self,
    page_id: PageId,
    content: &str,
    author: Option<UserId>,
  ) -> Result<RevisionId> {
    let content = content.to_owned();
    let now_str = encode_dt(Utc::now());
    let id = self
      .conn
      .call(move |conn| {
        insert_revision_in(conn, page_id, &content, author, &now_str)
          .map_err(Into::into)
      })
      .await?;
    Ok(id)
  }

  async fn list_revisions(&self, page_id: PageId) -> Result<Vec<Revision>> {
    let raws: Vec<RawRevision> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, page_id, content, author_id, created_at
           FROM revisions
           WHERE page_id = ?1
           ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![page_id], |row| {
            Ok(RawRevision {
              id:         row.get(0)?,
              page_id:    row.get(1)?,
              content:    row.get(2)?,
              author_id:  row.get(3)?,
              created_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRevision::into_revision).collect()
  }

  async fn get_revision(&self, id: RevisionId) -> Result<Option<Revision>> {
    let raw: Option<RawRevision> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, page_id, content, author_id, created_at
               FROM revisions WHERE id = ?1",
              rusqlite::params![id],
              |row| {
                Ok(RawRevision {
                  id:         row.get(0)?,
                  page_id:    row.get(1)?,
                  content:    row.get(2)?,
                  author_id:  row.get(3)?,
                  created_at: row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRevision::into_revision).transpose()
  }

  async fn restore_revision(
    &self,
    id: RevisionId,
    author: Option<UserId>,
  ) -> Result<()> {
    let now_str = encode_dt(Utc::now());

    let restored: Option<()> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let target: Option<(PageId, String)> = tx
          .query_row(
            "SELECT page_id, content FROM revisions WHERE id = ?1",
            rusqlite::params![id],
            |row| Ok((row.get(0)?, row.get(1)?)),
          )
          .optional()?;
        let Some((page_id, revision_content)) = target else {
          return Ok(None);
        };

        // Safety snapshot of what the restore is about to overwrite.
        let current: String = tx.query_row(
          "SELECT content FROM pages WHERE id = ?1",
          rusqlite::params![page_id],
          |row| row.get(0),
        )?;
        insert_revision_in(&tx, page_id, &current, author, &now_str)?;

        tx.execute(
          "UPDATE pages SET content = ?1, updated_at = ?2 WHERE id = ?3",
          rusqlite::params![revision_content, now_str, page_id],
        )?;
        tx.commit()?;
        Ok(Some(()))
      })
      .await?;

    restored.ok_or(Error::RevisionNotFound(id))
  }

  // ── Labels ────────────────────────────────────────────────────────────────

  async fn get_or_create_label(
    &self,
    kind: LabelKind,
    name: &str,
  ) -> Result<LabelId> {
    let name = name.to_owned();
    let id = self
      .conn
      .call(move |conn| {
        get_or_create_label_in(conn, kind, &name).map_err(Into::into)
      })
      .await?;
    Ok(id)
  }

  async fn attach_label(
    &self,
    page_id: PageId,
    kind: LabelKind,
    label: LabelId,
  ) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let (_, assoc, col) = label_tables(kind);
        conn.execute(
          &format!("INSERT OR IGNORE INTO {assoc} (page_id, {col}) VALUES (?1, ?2)"),
          rusqlite::params![page_id, label],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn detach_label(
    &self,
    page_id: PageId,
    kind: LabelKind,
    label: LabelId,
  ) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let (_, assoc, col) = label_tables(kind);
        conn.execute(
          &format!("DELETE FROM {assoc} WHERE page_id = ?1 AND {col} = ?2"),
          rusqlite::params![page_id, label],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn labels_for_page(
    &self,
    page_id: PageId,
    kind: LabelKind,
  ) -> Result<Vec<Label>> {
    let labels = self
      .conn
      .call(move |conn| labels_for_page_in(conn, page_id, kind).map_err(Into::into))
      .await?;
    Ok(labels)
  }

  async fn replace_labels(
    &self,
    page_id: PageId,
    kind: LabelKind,
    names: &[String],
  ) -> Result<()> {
    let names = names.to_vec();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let (_, assoc, _) = label_tables(kind);
        tx.execute(
          &format!("DELETE FROM {assoc} WHERE page_id = ?1"),
          rusqlite::params![page_id],
        )?;
        for name in &names {
          attach_label_in(&tx, page_id, kind, name)?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn all_labels(&self, kind: LabelKind) -> Result<Vec<Label>> {
    let labels = self
      .conn
      .call(move |conn| {
        let (table, _, _) = label_tables(kind);
        let mut stmt =
          conn.prepare(&format!("SELECT id, name FROM {table} ORDER BY name"))?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Label { id: row.get(0)?, name: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(labels)
  }

  // ── Search ────────────────────────────────────────────────────────────────

  async fn search(&self, query: &PageQuery) -> Result<Vec<PageSummary>> {
    let q = query.clone();

    let raws: Vec<RawSummary> = self
      .conn
      .call(move |conn| {
        // Build the statement dynamically; every predicate group is
        // optional and they AND together.
        let mut sql = String::from(
          "SELECT DISTINCT p.id, p.title, p.updated_at, u.username
           FROM pages p
           LEFT JOIN users u ON u.id = p.created_by",
        );
        let mut conds: Vec<String> = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if !q.tags.is_empty() {
          sql.push_str(
            " JOIN page_tags pt ON pt.page_id = p.id
              JOIN tags t ON t.id = pt.tag_id",
          );
          let marks = vec!["?"; q.tags.len()].join(", ");
          conds.push(format!("t.name IN ({marks})"));
          for tag in &q.tags {
            params.push(Box::new(tag.clone()));
          }
        }
        if let Some(text) = &q.text
          && !text.is_empty()
        {
          // SQLite LIKE is case-insensitive for ASCII.
          conds.push("(p.title LIKE ? OR p.content LIKE ?)".to_owned());
          let pattern = format!("%{text}%");
          params.push(Box::new(pattern.clone()));
          params.push(Box::new(pattern));
        }
        if let Some(author) = &q.author {
          conds.push("u.username = ?".to_owned());
          params.push(Box::new(author.clone()));
        }
        if let Some(from) = q.updated_from {
          conds.push("p.updated_at >= ?".to_owned());
          params.push(Box::new(encode_dt(from)));
        }
        if let Some(to) = q.updated_to {
          conds.push("p.updated_at <= ?".to_owned());
          params.push(Box::new(encode_dt(to)));
        }

        if !conds.is_empty() {
          sql.push_str(" WHERE ");
          sql.push_str(&conds.join(" AND "));
        }
        sql.push_str(" ORDER BY p.updated_at DESC LIMIT ? OFFSET ?");
        // A negative LIMIT means unbounded in SQLite.
        params.push(Box::new(q.limit.map(|l| l as i64).unwrap_or(-1)));
        params.push(Box::new(q.offset.unwrap_or(0) as i64));

        let param_refs: Vec<&dyn rusqlite::ToSql> =
          params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(param_refs.as_slice(), |row| {
            Ok(RawSummary {
              id:         row.get(0)?,
              title:      row.get(1)?,
              updated_at: row.get(2)?,
              author:     row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSummary::into_summary).collect()
  }
}
