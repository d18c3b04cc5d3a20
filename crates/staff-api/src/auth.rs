//! Caller identity and the admin role gate.
//!
//! Callers authenticate with HTTP Basic against the configured
//! [`Principal`]s. Managing staff accounts additionally needs
//! [`Role::Admin`]: bad or missing credentials are a 401, a known caller
//! without the role is a 403.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use serde::Deserialize;
use staff_core::store::AccountStore;
use tracing::warn;

use crate::{AppState, error::ApiError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
  /// May create, edit and delete staff accounts and reset their passwords.
  Admin,
  Employee,
}

/// A caller the server knows about, as listed under `[[principals]]`.
#[derive(Debug, Clone, Deserialize)]
pub struct Principal {
  pub username:      String,
  /// argon2 PHC string, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  #[serde(default)]
  pub roles:         Vec<Role>,
}

impl Principal {
  pub fn has_role(&self, role: Role) -> bool { self.roles.contains(&role) }

  fn accepts(&self, password: &str) -> bool {
    PasswordHash::new(&self.password_hash).is_ok_and(|hash| {
      Argon2::default()
        .verify_password(password.as_bytes(), &hash)
        .is_ok()
    })
  }
}

/// User name and password from a `Basic` authorization header.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
  let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
  let decoded = B64.decode(value.strip_prefix("Basic ")?).ok()?;
  let (username, password) = std::str::from_utf8(&decoded).ok()?.split_once(':')?;
  Some((username.to_owned(), password.to_owned()))
}

/// The principal the request's credentials belong to.
pub fn authenticate<'a>(
  headers: &HeaderMap,
  principals: &'a [Principal],
) -> Result<&'a Principal, ApiError> {
  let (username, password) = basic_credentials(headers).ok_or(ApiError::Unauthorized)?;
  principals
    .iter()
    .find(|p| p.username == username)
    .filter(|p| p.accepts(&password))
    .ok_or(ApiError::Unauthorized)
}

/// An authenticated caller holding [`Role::Admin`].
#[derive(Debug, Clone)]
pub struct Admin {
  pub username: String,
}

impl<S> FromRequestParts<AppState<S>> for Admin
where
  S: AccountStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let principal = authenticate(&parts.headers, &state.principals)?;
    if !principal.has_role(Role::Admin) {
      warn!(username = %principal.username, uri = %parts.uri, "caller lacks the admin role");
      return Err(ApiError::Forbidden);
    }
    Ok(Admin { username: principal.username.clone() })
  }
}
