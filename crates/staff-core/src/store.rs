//! The `AccountStore` trait and its outcome types.
//!
//! The trait is implemented by storage backends (e.g. `staff-store-sqlite`).
//! [`crate::StaffManager`] depends on this abstraction, not on any concrete
//! backend.
//!
//! Two kinds of failure are kept apart. A store that *refuses* an operation
//! (duplicate user name, weak password) reports it as an outcome carrying
//! human-readable descriptions. A store that *cannot* perform it (I/O, corrupt
//! row) returns its associated `Error`.

use std::future::Future;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::staff::{NationalId, StaffUser};

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// The outcome of a write the store may refuse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "errors", rename_all = "snake_case")]
pub enum StoreOutcome {
  Succeeded,
  Failed(Vec<String>),
}

impl StoreOutcome {
  pub fn failed(description: impl Into<String>) -> Self {
    Self::Failed(vec![description.into()])
  }

  pub fn succeeded(&self) -> bool { matches!(self, Self::Succeeded) }
}

/// The outcome of [`AccountStore::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
  /// The stored record, including its fresh concurrency stamp.
  Updated(StaffUser),
  Failed(Vec<String>),
  /// The record's concurrency stamp no longer matches: someone else wrote
  /// it first, or it was deleted.
  ConcurrencyConflict,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the identity/credential store for staff accounts.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait AccountStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All accounts, in store-defined order.
  fn list(
    &self,
  ) -> impl Future<Output = Result<Vec<StaffUser>, Self::Error>> + Send + '_;

  /// Look up an account by its national id. Returns `None` if not found.
  fn find(
    &self,
    national_id: NationalId,
  ) -> impl Future<Output = Result<Option<StaffUser>, Self::Error>> + Send + '_;

  /// Look up an account by its internal id. Returns `None` if not found.
  fn find_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<StaffUser>, Self::Error>> + Send + '_;

  /// Persist a new account with an initial password.
  fn create(
    &self,
    user: StaffUser,
    password: String,
  ) -> impl Future<Output = Result<StoreOutcome, Self::Error>> + Send + '_;

  /// Overwrite an existing account, guarded by its concurrency stamp.
  fn update(
    &self,
    user: StaffUser,
  ) -> impl Future<Output = Result<UpdateOutcome, Self::Error>> + Send + '_;

  /// Permanently remove an account.
  fn delete<'a>(
    &'a self,
    user: &'a StaffUser,
  ) -> impl Future<Output = Result<StoreOutcome, Self::Error>> + Send + 'a;

  /// Clear the account's password, leaving it unable to sign in.
  fn remove_credential<'a>(
    &'a self,
    user: &'a StaffUser,
  ) -> impl Future<Output = Result<StoreOutcome, Self::Error>> + Send + 'a;

  /// Set a password on an account that currently has none.
  fn add_credential<'a>(
    &'a self,
    user: &'a StaffUser,
    password: String,
  ) -> impl Future<Output = Result<StoreOutcome, Self::Error>> + Send + 'a;
}
