//! Employment status transitions.
//!
//! A staff record is either active or inactive. The release date follows the
//! status: it is stamped when someone is released, cleared when they are
//! reinstated, and otherwise taken from whatever the editor submitted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::staff::StaffUser;

/// The status change implied by an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
  /// Active → inactive.
  Released,
  /// Inactive → active.
  Reinstated,
  Unchanged,
}

impl Transition {
  pub fn between(stored_active: bool, submitted_active: bool) -> Self {
    match (stored_active, submitted_active) {
      (true, false) => Self::Released,
      (false, true) => Self::Reinstated,
      _ => Self::Unchanged,
    }
  }

  /// Whether the submitted pair can be stored after this transition.
  ///
  /// Only an edit that keeps a record active while submitting a release date
  /// is refused; released and reinstated records get their date from
  /// [`Self::resolve`] whatever was submitted.
  pub fn admits(self, submitted_active: bool, submitted_release: Option<NaiveDate>) -> bool {
    !(self == Self::Unchanged && submitted_active && submitted_release.is_some())
  }

  /// The `(active, release_date)` pair that results from this transition.
  ///
  /// `today` is only consulted when someone is released without an explicit
  /// release date.
  pub fn resolve(
    self,
    submitted_active: bool,
    submitted_release: Option<NaiveDate>,
    today: NaiveDate,
  ) -> (bool, Option<NaiveDate>) {
    match self {
      Self::Released => (false, Some(submitted_release.unwrap_or(today))),
      Self::Reinstated => (true, None),
      Self::Unchanged => (submitted_active, submitted_release),
    }
  }
}

impl StaffUser {
  /// Apply a submitted status to this record and report what changed.
  pub fn apply_status(
    &mut self,
    submitted_active: bool,
    submitted_release: Option<NaiveDate>,
    today: NaiveDate,
  ) -> Transition {
    let transition = Transition::between(self.active, submitted_active);
    let (active, release_date) =
      transition.resolve(submitted_active, submitted_release, today);
    self.active = active;
    self.release_date = release_date;
    transition
  }
}
