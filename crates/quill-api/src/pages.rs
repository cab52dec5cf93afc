//! Handlers for `/pages` and `/titles` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/pages` | Discoverable pages only; `?limit&offset` |
//! | `POST`   | `/pages` | Body: [`CreatePageBody`]; 201 + `{"page_id": ...}` |
//! | `GET`    | `/pages/:title` | 404 if not found |
//! | `PUT`    | `/pages/:title` | Body: `{"content":"..."}` |
//! | `DELETE` | `/pages/:title` | Deletes the page and its history |
//! | `PUT`    | `/pages/:title/tags` | Body: `{"tags":[...]}` — full replace |
//! | `PUT`    | `/pages/:title/authors` | Body: `{"authors":[...]}` — full replace |
//! | `GET`    | `/titles` | Every title alphabetically, hidden included |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use quill_core::{
  page::{PageSummary, PageView},
  store::PageStore,
  wiki::CreatePage,
};

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

/// `GET /pages[?limit=<n>][&offset=<n>]`
pub async fn list<S: PageStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<PageSummary>>, ApiError> {
  let pages = state
    .wiki
    .list_pages(params.limit.unwrap_or(50), params.offset.unwrap_or(0))
    .await?;
  Ok(Json(pages))
}

/// `GET /titles`
pub async fn titles<S: PageStore>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<String>>, ApiError> {
  Ok(Json(state.wiki.list_titles().await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

fn default_discoverable() -> bool { true }

/// JSON body accepted by `POST /pages`.
#[derive(Debug, Deserialize)]
pub struct CreatePageBody {
  pub title:        String,
  #[serde(default)]
  pub content:      String,
  #[serde(default)]
  pub tags:         Vec<String>,
  #[serde(default)]
  pub authors:      Vec<String>,
  #[serde(default = "default_discoverable")]
  pub discoverable: bool,
}

impl From<CreatePageBody> for CreatePage {
  fn from(b: CreatePageBody) -> Self {
    CreatePage {
      title:        b.title,
      content:      b.content,
      tags:         b.tags,
      authors:      b.authors,
      discoverable: b.discoverable,
    }
  }
}

/// `POST /pages` — returns 201 + `{"page_id": <id>}`.
pub async fn create<S: PageStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<CreatePageBody>,
) -> Result<impl IntoResponse, ApiError> {
  let id = state
    .wiki
    .create_page(state.auth.as_ref(), CreatePage::from(body))
    .await?;
  Ok((StatusCode::CREATED, Json(json!({ "page_id": id }))))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /pages/:title`
pub async fn get_one<S: PageStore>(
  State(state): State<AppState<S>>,
  Path(title): Path<String>,
) -> Result<Json<PageView>, ApiError> {
  let view = state
    .wiki
    .get_page(&title)
    .await?
    .ok_or(ApiError(quill_core::Error::PageNotFound(title)))?;
  Ok(Json(view))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdatePageBody {
  pub content: String,
}

/// `PUT /pages/:title` — body: `{"content":"..."}`
pub async fn update<S: PageStore>(
  State(state): State<AppState<S>>,
  Path(title): Path<String>,
  Json(body): Json<UpdatePageBody>,
) -> Result<StatusCode, ApiError> {
  state
    .wiki
    .update_page(state.auth.as_ref(), &title, &body.content)
    .await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /pages/:title`
pub async fn delete<S: PageStore>(
  State(state): State<AppState<S>>,
  Path(title): Path<String>,
) -> Result<StatusCode, ApiError> {
  state.wiki.delete_page(state.auth.as_ref(), &title).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Label replacement ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TagsBody {
  pub tags: Vec<String>,
}

/// `PUT /pages/:title/tags` — body: `{"tags":[...]}`
pub async fn update_tags<S: PageStore>(
  State(state): State<AppState<S>>,
  Path(title): Path<String>,
  Json(body): Json<TagsBody>,
) -> Result<StatusCode, ApiError> {
  state
    .wiki
    .update_tags(state.auth.as_ref(), &title, &body.tags)
    .await?;
  Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct AuthorsBody {
  pub authors: Vec<String>,
}

/// `PUT /pages/:title/authors` — body: `{"authors":[...]}`
pub async fn update_authors<S: PageStore>(
  State(state): State<AppState<S>>,
  Path(title): Path<String>,
  Json(body): Json<AuthorsBody>,
) -> Result<StatusCode, ApiError> {
  state
    .wiki
    .update_authors(state.auth.as_ref(), &title, &body.authors)
    .await?;
  Ok(StatusCode::NO_CONTENT)
}
