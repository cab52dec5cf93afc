//! Handler for `GET /search`.
//!
//! Query params map directly to [`PageQuery`] fields. `tags` is accepted as
//! a comma-separated string; all supplied predicate groups AND together.

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use quill_core::{
  page::PageSummary,
  store::{PageQuery, PageStore},
};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Case-insensitive substring match against title OR content.
  pub text:         Option<String>,
  /// Comma-separated tag names; a page matches if it carries ANY of them.
  pub tags:         Option<String>,
  /// Exact match against the creating user's username.
  pub author:       Option<String>,
  pub updated_from: Option<DateTime<Utc>>,
  pub updated_to:   Option<DateTime<Utc>>,
  pub limit:        Option<usize>,
  pub offset:       Option<usize>,
}

/// `GET /search[?text=...][&tags=a,b][&author=...][&updated_from=...][&updated_to=...]`
///
/// A request with no criteria does not search; it returns an empty list.
pub async fn handler<S: PageStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PageSummary>>, ApiError> {
  let query = PageQuery {
    text:         params.text,
    tags:         params
      .tags
      .map(|s| {
        s.split(',')
          .map(str::trim)
          .filter(|t| !t.is_empty())
          .map(str::to_owned)
          .collect()
      })
      .unwrap_or_default(),
    author:       params.author,
    updated_from: params.updated_from,
    updated_to:   params.updated_to,
    limit:        params.limit,
    offset:       params.offset,
  };

  Ok(Json(state.wiki.search(&query).await?))
}
