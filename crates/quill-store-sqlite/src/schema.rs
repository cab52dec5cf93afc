//! SQL schema for the Quill SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// User ids are assigned by the external account layer, which owns the
/// `users` table; `created_by`/`author_id` columns deliberately carry no
/// REFERENCES clause so page writes never depend on that layer's state.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role          TEXT NOT NULL DEFAULT 'user',
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS pages (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    title        TEXT NOT NULL UNIQUE,
    content      TEXT NOT NULL DEFAULT '',
    created_at   TEXT NOT NULL,    -- ISO 8601 UTC; store-assigned
    updated_at   TEXT NOT NULL,
    created_by   INTEGER,
    discoverable INTEGER NOT NULL DEFAULT 1
);

-- Revisions are strictly append-only.
-- No UPDATE is ever issued against this table; DELETE only on page deletion.
CREATE TABLE IF NOT EXISTS revisions (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    page_id    INTEGER NOT NULL REFERENCES pages(id),
    content    TEXT NOT NULL,
    author_id  INTEGER,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tags (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS page_tags (
    page_id INTEGER NOT NULL REFERENCES pages(id) ON DELETE CASCADE,
    tag_id  INTEGER NOT NULL REFERENCES tags(id)  ON DELETE CASCADE,
    PRIMARY KEY (page_id, tag_id)
);

CREATE TABLE IF NOT EXISTS authors (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS page_authors (
    page_id   INTEGER NOT NULL REFERENCES pages(id)   ON DELETE CASCADE,
    author_id INTEGER NOT NULL REFERENCES authors(id) ON DELETE CASCADE,
    PRIMARY KEY (page_id, author_id)
);

CREATE INDEX IF NOT EXISTS revisions_page_idx ON revisions(page_id);
CREATE INDEX IF NOT EXISTS pages_updated_idx  ON pages(updated_at);

PRAGMA user_version = 1;
";
