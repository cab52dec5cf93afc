//! JSON REST API for Quill.
//!
//! Exposes an axum [`Router`] backed by any [`quill_core::store::PageStore`]
//! through the [`Wiki`] repository. This layer does no session management of
//! its own: the embedding application supplies the [`AuthContext`] the
//! mutation gate consults (the bundled `server` binary asserts a single
//! identity from its configuration, for deployments behind an authenticating
//! proxy). TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", quill_api::api_router(state))
//! ```

pub mod error;
pub mod labels;
pub mod pages;
pub mod revisions;
pub mod search;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post, put},
};
use serde::Deserialize;

use quill_core::{
  auth::{AuthContext, Role, UserId},
  store::PageStore,
  wiki::Wiki,
};

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:     String,
  pub port:     u16,
  pub db_path:  PathBuf,
  /// Identity asserted for every request. Absent means the server is
  /// anonymous and read-only.
  pub identity: Option<IdentityConfig>,
}

/// The account the external session layer has authenticated ahead of us.
#[derive(Deserialize, Clone)]
pub struct IdentityConfig {
  pub user_id:  UserId,
  pub username: String,
  pub role:     Role,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub wiki: Arc<Wiki<S>>,
  pub auth: Arc<dyn AuthContext>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { wiki: self.wiki.clone(), auth: self.auth.clone() }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router
where
  S: PageStore + 'static,
{
  Router::new()
    // Pages
    .route("/pages", get(pages::list::<S>).post(pages::create::<S>))
    .route(
      "/pages/{title}",
      get(pages::get_one::<S>)
        .put(pages::update::<S>)
        .delete(pages::delete::<S>),
    )
    .route("/pages/{title}/tags", put(pages::update_tags::<S>))
    .route("/pages/{title}/authors", put(pages::update_authors::<S>))
    .route("/pages/{title}/revisions", get(revisions::list::<S>))
    .route("/titles", get(pages::titles::<S>))
    // Revisions
    .route("/revisions/{id}", get(revisions::get_one::<S>))
    .route("/revisions/{id}/restore", post(revisions::restore::<S>))
    // Labels
    .route("/tags", get(labels::tags::<S>))
    .route("/authors", get(labels::authors::<S>))
    // Search
    .route("/search", get(search::handler::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
