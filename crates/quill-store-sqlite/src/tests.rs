//! Integration tests for `SqlitePageStore` against an in-memory database,
//! plus repository-level tests for the `Wiki` gate running on top of it.

use quill_core::{
  auth::{Anonymous, CurrentUser, Role},
  label::LabelKind,
  page::NewPage,
  store::{PageQuery, PageStore},
  wiki::{CreatePage, Wiki},
};

use crate::SqlitePageStore;

async fn store() -> SqlitePageStore {
  SqlitePageStore::open_in_memory()
    .await
    .expect("in-memory store")
}

/// The account layer owns the `users` table; tests that exercise the
/// creator-username join seed it directly.
async fn seed_user(s: &SqlitePageStore, id: i64, username: &str) {
  let username = username.to_owned();
  s.conn
    .call(move |conn| {
      conn.execute(
        "INSERT INTO users (id, username, password_hash, role, created_at)
         VALUES (?1, ?2, 'x', 'user', '2026-01-01T00:00:00+00:00')",
        rusqlite::params![id, username],
      )?;
      Ok(())
    })
    .await
    .unwrap();
}

fn new_page(title: &str, content: &str) -> NewPage {
  NewPage {
    title:        title.into(),
    content:      content.into(),
    created_by:   None,
    discoverable: true,
    tags:         Vec::new(),
    authors:      Vec::new(),
  }
}

fn alice() -> CurrentUser {
  CurrentUser { id: 1, username: "alice".into(), role: Role::User }
}

// ─── Page CRUD ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_page() {
  let s = store().await;

  let mut input = new_page("Home", "# Welcome");
  input.tags = vec!["intro".into(), "docs".into()];
  input.authors = vec!["Ada".into()];
  let page = s.create_page(input).await.unwrap();
  assert_eq!(page.title, "Home");

  let view = s.get_page("Home").await.unwrap().expect("page exists");
  assert_eq!(view.page.id, page.id);
  assert_eq!(view.page.content, "# Welcome");
  assert!(view.page.discoverable);

  // Labels come back alphabetical.
  let tag_names: Vec<_> = view.tags.iter().map(|t| t.name.as_str()).collect();
  assert_eq!(tag_names, ["docs", "intro"]);
  let author_names: Vec<_> =
    view.authors.iter().map(|a| a.name.as_str()).collect();
  assert_eq!(author_names, ["Ada"]);
}

#[tokio::test]
async fn get_page_is_exact_match_only() {
  let s = store().await;
  s.create_page(new_page("Home", "x")).await.unwrap();

  assert!(s.get_page("home").await.unwrap().is_none());
  assert!(s.get_page("Hom").await.unwrap().is_none());
  assert!(s.get_page("Home").await.unwrap().is_some());
}

#[tokio::test]
async fn get_page_missing_returns_none() {
  let s = store().await;
  assert!(s.get_page("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn get_page_by_id() {
  let s = store().await;
  let page = s.create_page(new_page("Home", "x")).await.unwrap();

  let view = s.get_page_by_id(page.id).await.unwrap().unwrap();
  assert_eq!(view.page.title, "Home");
  assert!(s.get_page_by_id(page.id + 100).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_title_is_a_named_conflict() {
  let s = store().await;
  s.create_page(new_page("Home", "first")).await.unwrap();

  let err = s.create_page(new_page("Home", "second")).await.unwrap_err();
  assert!(matches!(err, crate::Error::DuplicateTitle(ref t) if t == "Home"));

  // Exactly one page made it in.
  assert_eq!(s.list_titles().await.unwrap(), ["Home"]);
  let view = s.get_page("Home").await.unwrap().unwrap();
  assert_eq!(view.page.content, "first");
}

#[tokio::test]
async fn create_skips_blank_label_names() {
  let s = store().await;
  let mut input = new_page("Home", "x");
  input.tags = vec!["  ".into(), "rust".into(), String::new()];
  let page = s.create_page(input).await.unwrap();

  let tags = s.labels_for_page(page.id, LabelKind::Tag).await.unwrap();
  assert_eq!(tags.len(), 1);
  assert_eq!(tags[0].name, "rust");
}

#[tokio::test]
async fn update_missing_page_errors() {
  let s = store().await;
  let err = s.update_content(42, "x", None).await.unwrap_err();
  assert!(matches!(err, crate::Error::PageNotFound(42)));
}

#[tokio::test]
async fn delete_missing_page_errors() {
  let s = store().await;
  let err = s.delete_page(42).await.unwrap_err();
  assert!(matches!(err, crate::Error::PageNotFound(42)));
}

// ─── Revision capture ────────────────────────────────────────────────────────

#[tokio::test]
async fn revision_captured_before_every_write() {
  let s = store().await;
  let page = s.create_page(new_page("Home", "A")).await.unwrap();

  s.update_content(page.id, "B", None).await.unwrap();
  s.update_content(page.id, "C", None).await.unwrap();

  let view = s.get_page("Home").await.unwrap().unwrap();
  assert_eq!(view.page.content, "C");

  // Newest first: the pre-"C" snapshot, the pre-"B" snapshot, and the
  // initial capture from create. History never contains the live content.
  let revisions = s.list_revisions(page.id).await.unwrap();
  let contents: Vec<_> =
    revisions.iter().map(|r| r.content.as_str()).collect();
  assert_eq!(contents, ["B", "A", "A"]);
}

#[tokio::test]
async fn update_bumps_updated_at() {
  let s = store().await;
  let page = s.create_page(new_page("Home", "A")).await.unwrap();

  s.update_content(page.id, "B", None).await.unwrap();
  let view = s.get_page("Home").await.unwrap().unwrap();
  assert!(view.page.updated_at > page.updated_at);
  assert_eq!(view.page.created_at, page.created_at);
}

#[tokio::test]
async fn capture_revision_standalone() {
  let s = store().await;
  let page = s.create_page(new_page("Home", "A")).await.unwrap();

  let rev_id = s.capture_revision(page.id, "", Some(9)).await.unwrap();
  let rev = s.get_revision(rev_id).await.unwrap().unwrap();
  assert_eq!(rev.page_id, page.id);
  assert_eq!(rev.content, "");
  assert_eq!(rev.author_id, Some(9));
}

#[tokio::test]
async fn get_revision_missing_returns_none() {
  let s = store().await;
  assert!(s.get_revision(42).await.unwrap().is_none());
}

// ─── Restore ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn restore_overwrites_content_and_preserves_history() {
  let s = store().await;
  let page = s.create_page(new_page("Home", "A")).await.unwrap();
  s.update_content(page.id, "B", None).await.unwrap();
  s.update_content(page.id, "C", None).await.unwrap();

  let before = s.list_revisions(page.id).await.unwrap();
  // Oldest entry is the initial "A" capture.
  let target = before.last().unwrap().clone();
  assert_eq!(target.content, "A");

  s.restore_revision(target.id, None).await.unwrap();

  let view = s.get_page("Home").await.unwrap().unwrap();
  assert_eq!(view.page.content, "A");

  // One new entry (the pre-restore "C" snapshot) and nothing removed.
  let after = s.list_revisions(page.id).await.unwrap();
  assert_eq!(after.len(), before.len() + 1);
  assert_eq!(after[0].content, "C");
  assert!(before.iter().all(|r| after.iter().any(|a| a.id == r.id)));
}

#[tokio::test]
async fn restore_missing_revision_errors() {
  let s = store().await;
  let err = s.restore_revision(42, None).await.unwrap_err();
  assert!(matches!(err, crate::Error::RevisionNotFound(42)));
}

// ─── Cascade delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_revisions_but_keeps_shared_tags() {
  let s = store().await;

  let mut first = new_page("First", "x");
  first.tags = vec!["shared".into(), "only-first".into()];
  let first = s.create_page(first).await.unwrap();

  let mut second = new_page("Second", "y");
  second.tags = vec!["shared".into()];
  let second = s.create_page(second).await.unwrap();

  s.update_content(first.id, "x2", None).await.unwrap();
  s.delete_page(first.id).await.unwrap();

  assert!(s.get_page("First").await.unwrap().is_none());
  assert!(s.list_revisions(first.id).await.unwrap().is_empty());

  // Label rows are never garbage-collected, even when orphaned.
  let all: Vec<_> = s
    .all_labels(LabelKind::Tag)
    .await
    .unwrap()
    .into_iter()
    .map(|l| l.name)
    .collect();
  assert_eq!(all, ["only-first", "shared"]);

  let second_tags = s.labels_for_page(second.id, LabelKind::Tag).await.unwrap();
  assert_eq!(second_tags.len(), 1);
  assert_eq!(second_tags[0].name, "shared");
}

// ─── Labels ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_or_create_label_is_stable() {
  let s = store().await;
  let a = s.get_or_create_label(LabelKind::Tag, "rust").await.unwrap();
  let b = s.get_or_create_label(LabelKind::Tag, "rust").await.unwrap();
  assert_eq!(a, b);

  // Case-sensitive exact match: different case is a different label.
  let c = s.get_or_create_label(LabelKind::Tag, "Rust").await.unwrap();
  assert_ne!(a, c);
}

#[tokio::test]
async fn tag_and_author_namespaces_are_separate() {
  let s = store().await;
  let tag = s.get_or_create_label(LabelKind::Tag, "Ada").await.unwrap();
  let author = s.get_or_create_label(LabelKind::Author, "Ada").await.unwrap();

  // Same name, distinct relations; ids are unrelated.
  assert_eq!(s.all_labels(LabelKind::Tag).await.unwrap().len(), 1);
  assert_eq!(s.all_labels(LabelKind::Author).await.unwrap().len(), 1);
  let _ = (tag, author);
}

#[tokio::test]
async fn attach_is_idempotent() {
  let s = store().await;
  let page = s.create_page(new_page("Home", "x")).await.unwrap();
  let label = s.get_or_create_label(LabelKind::Tag, "rust").await.unwrap();

  s.attach_label(page.id, LabelKind::Tag, label).await.unwrap();
  s.attach_label(page.id, LabelKind::Tag, label).await.unwrap();

  let tags = s.labels_for_page(page.id, LabelKind::Tag).await.unwrap();
  assert_eq!(tags.len(), 1);
}

#[tokio::test]
async fn detach_removes_association() {
  let s = store().await;
  let page = s.create_page(new_page("Home", "x")).await.unwrap();
  let label = s.get_or_create_label(LabelKind::Tag, "rust").await.unwrap();
  s.attach_label(page.id, LabelKind::Tag, label).await.unwrap();

  s.detach_label(page.id, LabelKind::Tag, label).await.unwrap();
  assert!(s.labels_for_page(page.id, LabelKind::Tag).await.unwrap().is_empty());

  // The label row itself survives.
  assert_eq!(s.all_labels(LabelKind::Tag).await.unwrap().len(), 1);
}

#[tokio::test]
async fn replace_labels_trims_and_dedups() {
  let s = store().await;
  let page = s.create_page(new_page("Home", "x")).await.unwrap();

  let names = vec!["x".to_owned(), "x".to_owned(), " x ".to_owned()];
  s.replace_labels(page.id, LabelKind::Tag, &names).await.unwrap();

  let tags = s.labels_for_page(page.id, LabelKind::Tag).await.unwrap();
  assert_eq!(tags.len(), 1);
  assert_eq!(tags[0].name, "x");
}

#[tokio::test]
async fn replace_labels_is_a_full_replace() {
  let s = store().await;
  let mut input = new_page("Home", "x");
  input.tags = vec!["old-a".into(), "old-b".into()];
  let page = s.create_page(input).await.unwrap();

  let names = vec!["new".to_owned()];
  s.replace_labels(page.id, LabelKind::Tag, &names).await.unwrap();

  let tags = s.labels_for_page(page.id, LabelKind::Tag).await.unwrap();
  assert_eq!(tags.len(), 1);
  assert_eq!(tags[0].name, "new");
}

#[tokio::test]
async fn replace_labels_with_empty_list_clears() {
  let s = store().await;
  let mut input = new_page("Home", "x");
  input.tags = vec!["a".into()];
  let page = s.create_page(input).await.unwrap();

  s.replace_labels(page.id, LabelKind::Tag, &[]).await.unwrap();
  assert!(s.labels_for_page(page.id, LabelKind::Tag).await.unwrap().is_empty());
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_pages_filters_hidden_and_orders_by_recency() {
  let s = store().await;
  let a = s.create_page(new_page("Alpha", "x")).await.unwrap();
  let mut hidden = new_page("Hidden", "x");
  hidden.discoverable = false;
  s.create_page(hidden).await.unwrap();
  s.create_page(new_page("Beta", "x")).await.unwrap();

  // Touch Alpha so it becomes the most recent.
  s.update_content(a.id, "x2", None).await.unwrap();

  let listed = s.list_pages(50, 0).await.unwrap();
  let titles: Vec<_> = listed.iter().map(|p| p.title.as_str()).collect();
  assert_eq!(titles, ["Alpha", "Beta"]);
}

#[tokio::test]
async fn list_pages_respects_limit_and_offset() {
  let s = store().await;
  s.create_page(new_page("One", "x")).await.unwrap();
  s.create_page(new_page("Two", "x")).await.unwrap();
  s.create_page(new_page("Three", "x")).await.unwrap();

  let page1 = s.list_pages(2, 0).await.unwrap();
  let page2 = s.list_pages(2, 2).await.unwrap();
  assert_eq!(page1.len(), 2);
  assert_eq!(page2.len(), 1);
}

#[tokio::test]
async fn list_titles_is_alphabetical_and_includes_hidden() {
  let s = store().await;
  s.create_page(new_page("zebra", "x")).await.unwrap();
  let mut hidden = new_page("apple", "x");
  hidden.discoverable = false;
  s.create_page(hidden).await.unwrap();
  s.create_page(new_page("mango", "x")).await.unwrap();

  let titles = s.list_titles().await.unwrap();
  assert_eq!(titles, ["apple", "mango", "zebra"]);
}

#[tokio::test]
async fn list_pages_resolves_creator_username() {
  let s = store().await;
  seed_user(&s, 1, "alice").await;
  let mut input = new_page("Home", "x");
  input.created_by = Some(1);
  s.create_page(input).await.unwrap();

  let listed = s.list_pages(50, 0).await.unwrap();
  assert_eq!(listed[0].author.as_deref(), Some("alice"));
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_text_matches_title_or_content_case_insensitively() {
  let s = store().await;
  s.create_page(new_page("Rust Guide", "systems programming"))
    .await
    .unwrap();
  s.create_page(new_page("Cooking", "A pinch of RUST-colored paprika"))
    .await
    .unwrap();
  s.create_page(new_page("Gardening", "tomatoes")).await.unwrap();

  let query = PageQuery { text: Some("rust".into()), ..Default::default() };
  let hits = s.search(&query).await.unwrap();
  let titles: Vec<_> = hits.iter().map(|p| p.title.as_str()).collect();
  assert_eq!(hits.len(), 2);
  assert!(titles.contains(&"Rust Guide"));
  assert!(titles.contains(&"Cooking"));
}

#[tokio::test]
async fn search_tags_use_or_semantics() {
  let s = store().await;
  let mut p1 = new_page("P1", "x");
  p1.tags = vec!["a".into(), "b".into()];
  s.create_page(p1).await.unwrap();
  let mut p2 = new_page("P2", "x");
  p2.tags = vec!["b".into(), "c".into()];
  s.create_page(p2).await.unwrap();
  let mut p3 = new_page("P3", "x");
  p3.tags = vec!["c".into()];
  s.create_page(p3).await.unwrap();

  let query = PageQuery {
    tags: vec!["a".into(), "c".into()],
    ..Default::default()
  };
  let hits = s.search(&query).await.unwrap();
  assert_eq!(hits.len(), 3);
}

#[tokio::test]
async fn search_filter_groups_combine_with_and() {
  let s = store().await;
  seed_user(&s, 1, "alice").await;
  seed_user(&s, 2, "bob").await;

  let mut p1 = new_page("P1", "x");
  p1.tags = vec!["a".into(), "b".into()];
  p1.created_by = Some(1);
  s.create_page(p1).await.unwrap();
  let mut p2 = new_page("P2", "x");
  p2.tags = vec!["b".into(), "c".into()];
  p2.created_by = Some(2);
  s.create_page(p2).await.unwrap();
  let mut p3 = new_page("P3", "x");
  p3.tags = vec!["c".into()];
  p3.created_by = Some(2);
  s.create_page(p3).await.unwrap();

  // Tag-OR group AND exact creating-user match.
  let query = PageQuery {
    tags:   vec!["a".into(), "c".into()],
    author: Some("bob".into()),
    ..Default::default()
  };
  let hits = s.search(&query).await.unwrap();
  let titles: Vec<_> = hits.iter().map(|p| p.title.as_str()).collect();
  assert_eq!(hits.len(), 2);
  assert!(titles.contains(&"P2"));
  assert!(titles.contains(&"P3"));
}

#[tokio::test]
async fn search_author_matches_creating_user_not_display_authors() {
  let s = store().await;
  seed_user(&s, 1, "alice").await;

  let mut input = new_page("Paper", "x");
  input.created_by = Some(1);
  input.authors = vec!["Bob".into()];
  s.create_page(input).await.unwrap();

  let by_user = PageQuery { author: Some("alice".into()), ..Default::default() };
  assert_eq!(s.search(&by_user).await.unwrap().len(), 1);

  // "Bob" is a display author, not the creating account.
  let by_display = PageQuery { author: Some("Bob".into()), ..Default::default() };
  assert!(s.search(&by_display).await.unwrap().is_empty());
}

#[tokio::test]
async fn search_date_bounds_are_inclusive() {
  let s = store().await;
  let page = s.create_page(new_page("Home", "x")).await.unwrap();
  let at = s.get_page("Home").await.unwrap().unwrap().page.updated_at;
  let _ = page;

  let exact = PageQuery {
    text:         Some("x".into()),
    updated_from: Some(at),
    updated_to:   Some(at),
    ..Default::default()
  };
  assert_eq!(s.search(&exact).await.unwrap().len(), 1);

  let future = PageQuery {
    text:         Some("x".into()),
    updated_from: Some(at + chrono::Duration::seconds(1)),
    ..Default::default()
  };
  assert!(s.search(&future).await.unwrap().is_empty());
}

#[tokio::test]
async fn search_orders_newest_updated_first() {
  let s = store().await;
  let a = s.create_page(new_page("Older", "findme")).await.unwrap();
  s.create_page(new_page("Newer", "findme")).await.unwrap();
  s.update_content(a.id, "findme again", None).await.unwrap();

  let query = PageQuery { text: Some("findme".into()), ..Default::default() };
  let hits = s.search(&query).await.unwrap();
  let titles: Vec<_> = hits.iter().map(|p| p.title.as_str()).collect();
  assert_eq!(titles, ["Older", "Newer"]);
}

#[tokio::test]
async fn search_includes_hidden_pages() {
  // `discoverable` governs the default listing, not lookup or search.
  let s = store().await;
  let mut hidden = new_page("Secret", "findme");
  hidden.discoverable = false;
  s.create_page(hidden).await.unwrap();

  let query = PageQuery { text: Some("findme".into()), ..Default::default() };
  assert_eq!(s.search(&query).await.unwrap().len(), 1);
}

#[tokio::test]
async fn search_respects_limit() {
  let s = store().await;
  s.create_page(new_page("One", "findme")).await.unwrap();
  s.create_page(new_page("Two", "findme")).await.unwrap();
  s.create_page(new_page("Three", "findme")).await.unwrap();

  let query = PageQuery {
    text:  Some("findme".into()),
    limit: Some(2),
    ..Default::default()
  };
  assert_eq!(s.search(&query).await.unwrap().len(), 2);
}

// ─── Wiki repository ─────────────────────────────────────────────────────────

#[tokio::test]
async fn wiki_create_records_creator_and_labels() {
  let s = store().await;
  let wiki = Wiki::new(s.clone());

  let mut input = CreatePage::new("Home", "# hi");
  input.tags = vec!["intro".into()];
  input.authors = vec!["Ada".into()];
  let id = wiki.create_page(&alice(), input).await.unwrap();

  let view = wiki.get_page("Home").await.unwrap().unwrap();
  assert_eq!(view.page.id, id);
  assert_eq!(view.page.created_by, Some(1));
  assert_eq!(view.tags[0].name, "intro");
  assert_eq!(view.authors[0].name, "Ada");

  // The initial revision is attributed to the creator.
  let revisions = wiki.revisions("Home").await.unwrap();
  assert_eq!(revisions.len(), 1);
  assert_eq!(revisions[0].author_id, Some(1));
}

#[tokio::test]
async fn wiki_rejects_blank_title() {
  let s = store().await;
  let wiki = Wiki::new(s);

  let err = wiki
    .create_page(&alice(), CreatePage::new("   ", "x"))
    .await
    .unwrap_err();
  assert!(matches!(err, quill_core::Error::Validation(_)));
}

#[tokio::test]
async fn wiki_duplicate_title_is_structured() {
  let s = store().await;
  let wiki = Wiki::new(s);
  wiki.create_page(&alice(), CreatePage::new("Home", "x")).await.unwrap();

  let err = wiki
    .create_page(&alice(), CreatePage::new("Home", "y"))
    .await
    .unwrap_err();
  assert!(matches!(err, quill_core::Error::DuplicateTitle(ref t) if t == "Home"));
}

#[tokio::test]
async fn wiki_update_and_delete_resolve_titles() {
  let s = store().await;
  let wiki = Wiki::new(s);
  wiki.create_page(&alice(), CreatePage::new("Home", "A")).await.unwrap();

  wiki.update_page(&alice(), "Home", "B").await.unwrap();
  let view = wiki.get_page("Home").await.unwrap().unwrap();
  assert_eq!(view.page.content, "B");

  let err = wiki.update_page(&alice(), "Nope", "x").await.unwrap_err();
  assert!(matches!(err, quill_core::Error::PageNotFound(_)));

  wiki.delete_page(&alice(), "Home").await.unwrap();
  assert!(wiki.get_page("Home").await.unwrap().is_none());

  let err = wiki.delete_page(&alice(), "Home").await.unwrap_err();
  assert!(matches!(err, quill_core::Error::PageNotFound(_)));
}

#[tokio::test]
async fn wiki_restore_round_trip() {
  let s = store().await;
  let wiki = Wiki::new(s);
  wiki.create_page(&alice(), CreatePage::new("Home", "A")).await.unwrap();
  wiki.update_page(&alice(), "Home", "B").await.unwrap();

  let revisions = wiki.revisions("Home").await.unwrap();
  let initial = revisions.last().unwrap().clone();
  wiki.restore_revision(&alice(), initial.id).await.unwrap();

  let view = wiki.get_page("Home").await.unwrap().unwrap();
  assert_eq!(view.page.content, "A");

  let err = wiki.restore_revision(&alice(), 9999).await.unwrap_err();
  assert!(matches!(err, quill_core::Error::RevisionNotFound(9999)));
}

#[tokio::test]
async fn wiki_replaces_tags_and_authors() {
  let s = store().await;
  let wiki = Wiki::new(s);
  let mut input = CreatePage::new("Home", "x");
  input.tags = vec!["old".into()];
  wiki.create_page(&alice(), input).await.unwrap();

  wiki
    .update_tags(&alice(), "Home", &["fresh".to_owned()])
    .await
    .unwrap();
  wiki
    .update_authors(&alice(), "Home", &["Ada".to_owned()])
    .await
    .unwrap();

  let view = wiki.get_page("Home").await.unwrap().unwrap();
  assert_eq!(view.tags.len(), 1);
  assert_eq!(view.tags[0].name, "fresh");
  assert_eq!(view.authors[0].name, "Ada");

  // The orphaned "old" tag row is still known.
  let all: Vec<_> =
    wiki.tags().await.unwrap().into_iter().map(|l| l.name).collect();
  assert_eq!(all, ["fresh", "old"]);
}

#[tokio::test]
async fn wiki_search_with_no_criteria_returns_nothing() {
  let s = store().await;
  let wiki = Wiki::new(s);
  wiki.create_page(&alice(), CreatePage::new("Home", "x")).await.unwrap();

  let hits = wiki.search(&PageQuery::default()).await.unwrap();
  assert!(hits.is_empty());

  // Limit/offset alone do not make a query.
  let paged = PageQuery { limit: Some(10), ..Default::default() };
  assert!(wiki.search(&paged).await.unwrap().is_empty());
}

// ─── Authorization gate ──────────────────────────────────────────────────────

#[tokio::test]
async fn anonymous_mutations_are_rejected_without_side_effects() {
  let s = store().await;
  let wiki = Wiki::new(s.clone());
  wiki.create_page(&alice(), CreatePage::new("Home", "A")).await.unwrap();

  let err = wiki
    .create_page(&Anonymous, CreatePage::new("Other", "x"))
    .await
    .unwrap_err();
  assert!(matches!(err, quill_core::Error::Unauthorized));

  let err = wiki.update_page(&Anonymous, "Home", "B").await.unwrap_err();
  assert!(matches!(err, quill_core::Error::Unauthorized));

  let err = wiki.delete_page(&Anonymous, "Home").await.unwrap_err();
  assert!(matches!(err, quill_core::Error::Unauthorized));

  let err = wiki
    .update_tags(&Anonymous, "Home", &["t".to_owned()])
    .await
    .unwrap_err();
  assert!(matches!(err, quill_core::Error::Unauthorized));

  let revisions = wiki.revisions("Home").await.unwrap();
  let err = wiki
    .restore_revision(&Anonymous, revisions[0].id)
    .await
    .unwrap_err();
  assert!(matches!(err, quill_core::Error::Unauthorized));

  // Nothing changed: one page, original content, one revision, no tags.
  assert_eq!(s.list_titles().await.unwrap(), ["Home"]);
  let view = wiki.get_page("Home").await.unwrap().unwrap();
  assert_eq!(view.page.content, "A");
  assert!(view.tags.is_empty());
  assert_eq!(wiki.revisions("Home").await.unwrap().len(), 1);
}

#[tokio::test]
async fn anonymous_gate_fires_before_lookup() {
  // A missing page must not leak past the auth check.
  let s = store().await;
  let wiki = Wiki::new(s);

  let err = wiki.update_page(&Anonymous, "Nope", "x").await.unwrap_err();
  assert!(matches!(err, quill_core::Error::Unauthorized));
}

#[tokio::test]
async fn reads_are_ungated() {
  let s = store().await;
  let wiki = Wiki::new(s);
  wiki.create_page(&alice(), CreatePage::new("Home", "x")).await.unwrap();

  // No auth context involved in any read path.
  assert!(wiki.get_page("Home").await.unwrap().is_some());
  assert_eq!(wiki.list_pages(10, 0).await.unwrap().len(), 1);
  assert_eq!(wiki.list_titles().await.unwrap().len(), 1);
  assert_eq!(wiki.revisions("Home").await.unwrap().len(), 1);
}
