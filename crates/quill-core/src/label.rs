//! Labels — free-form classification (tags) and attribution (display
//! authors) names, many-to-many with pages.
//!
//! Both kinds share the same semantics: unique names, created lazily on
//! first reference, never garbage-collected when orphaned. Display authors
//! are distinct from the `User` identity model in [`crate::auth`].

use serde::{Deserialize, Serialize};

pub type LabelId = i64;

/// Which association table a label lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
  Tag,
  Author,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
  pub id:   LabelId,
  pub name: String,
}
