//! The authentication capability consumed by the [`Wiki`](crate::wiki::Wiki)
//! repository.
//!
//! Credentials, sessions, and cookies are owned by an external collaborator.
//! The core only ever asks whether the caller is logged in and who they are,
//! through a context passed into each mutating operation, never read from
//! ambient global state.

use serde::{Deserialize, Serialize};

/// Users are rows in an account table this crate never writes; their ids
/// appear here only as `created_by`/`author_id` references.
pub type UserId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  User,
  Admin,
}

/// The identity the auth collaborator resolved for the current caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
  pub id:       UserId,
  pub username: String,
  pub role:     Role,
}

/// Capability handed to every mutating repository operation.
pub trait AuthContext: Send + Sync {
  /// The authenticated caller, or `None` for anonymous requests.
  fn current_user(&self) -> Option<CurrentUser>;

  fn is_logged_in(&self) -> bool { self.current_user().is_some() }
}

/// An unauthenticated caller. Every mutating operation refuses it.
pub struct Anonymous;

impl AuthContext for Anonymous {
  fn current_user(&self) -> Option<CurrentUser> { None }
}

/// A resolved identity is itself a usable context — convenient for tests and
/// for servers that assert a fixed identity (e.g. behind a session proxy).
impl AuthContext for CurrentUser {
  fn current_user(&self) -> Option<CurrentUser> { Some(self.clone()) }
}
