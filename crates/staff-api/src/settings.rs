//! Server configuration, read from `config.toml` and `STAFF_*` environment
//! variables, and the checks it has to pass before the server starts.

use std::{collections::HashSet, path::PathBuf};

use argon2::PasswordHash;
use serde::Deserialize;
use staff_store_sqlite::PasswordPolicy;
use thiserror::Error;

use crate::auth::{Principal, Role};

#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  pub store_path:      PathBuf,
  #[serde(default)]
  pub principals:      Vec<Principal>,
  #[serde(default)]
  pub password_policy: PasswordPolicy,
}

/// A configuration the server refuses to start with.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("no principal has the admin role, so staff accounts could not be managed")]
  NoAdmin,

  #[error("principal '{0}' is listed more than once")]
  DuplicatePrincipal(String),

  #[error("principal '{username}' has an unusable password hash: {reason}")]
  BadHash { username: String, reason: String },

  #[error("password_policy.required_length must be at least 1")]
  EmptyPasswordLength,
}

impl ServerConfig {
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.password_policy.required_length == 0 {
      return Err(ConfigError::EmptyPasswordLength);
    }

    let mut seen = HashSet::new();
    for principal in &self.principals {
      if !seen.insert(principal.username.as_str()) {
        return Err(ConfigError::DuplicatePrincipal(principal.username.clone()));
      }
      PasswordHash::new(&principal.password_hash).map_err(|e| ConfigError::BadHash {
        username: principal.username.clone(),
        reason:   e.to_string(),
      })?;
    }

    if !self.principals.iter().any(|p| p.has_role(Role::Admin)) {
      return Err(ConfigError::NoAdmin);
    }
    Ok(())
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}
