//! Error types for `staff-core`.

use thiserror::Error;

use crate::staff::NationalId;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed or missing input, caught before the store is touched.
  #[error("validation failed: {}", .0.join("; "))]
  Validation(Vec<String>),

  #[error("not found: {0}")]
  NotFound(String),

  /// The store saw a concurrent modification and the record still exists.
  #[error("staff record {0} was modified concurrently")]
  Conflict(NationalId),

  /// The account store refused the operation; carries its descriptions.
  #[error("account store rejected the operation: {}", .0.join("; "))]
  AccountStore(Vec<String>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  /// Human-readable messages for redisplay next to a submitted form.
  pub fn messages(&self) -> Vec<String> {
    match self {
      Self::Validation(errors) | Self::AccountStore(errors) => errors.clone(),
      other => vec![other.to_string()],
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
