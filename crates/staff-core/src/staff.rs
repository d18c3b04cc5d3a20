//! Staff records and the submitted form they are edited through.
//!
//! A staff member has two identities: the opaque `id` generated on creation,
//! and the externally assigned national id (EGN) that people look them up by.
//! The two are never interchangeable.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::NATIONAL_ID_LEN;

// ─── NationalId ──────────────────────────────────────────────────────────────

/// A national personal identifier (EGN): exactly ten characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NationalId(String);

impl NationalId {
  /// Parse a raw identifier, returning the validation message on failure.
  pub fn parse(raw: &str) -> Result<Self, String> {
    if raw.trim().is_empty() {
      return Err("national id is required".to_owned());
    }
    if raw.chars().count() != NATIONAL_ID_LEN {
      return Err(format!(
        "national id must be exactly {NATIONAL_ID_LEN} characters"
      ));
    }
    Ok(Self(raw.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for NationalId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl AsRef<str> for NationalId {
  fn as_ref(&self) -> &str { &self.0 }
}

// ─── StaffUser ───────────────────────────────────────────────────────────────

/// A persisted staff account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffUser {
  /// Generated on creation; never changes.
  pub id:                Uuid,
  pub national_id:       NationalId,
  pub first_name:        String,
  pub middle_name:       String,
  pub last_name:         String,
  pub hire_date:         NaiveDate,
  pub active:            bool,
  /// Set only while `active` is false.
  pub release_date:      Option<NaiveDate>,
  pub email:             Option<String>,
  pub phone_number:      Option<String>,
  /// Login name; the account store keeps it unique.
  pub display_name:      String,
  /// Rotated by the store on every successful update.
  pub concurrency_stamp: Uuid,
}

impl StaffUser {
  /// "First Last", as shown on the password reset screen.
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

// ─── StaffForm ───────────────────────────────────────────────────────────────

/// A record as submitted by the presentation layer, before validation.
///
/// `hire_date` is optional here so that a missing date is reported alongside
/// the other validation messages instead of failing to decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffForm {
  pub national_id:  String,
  pub first_name:   String,
  pub middle_name:  String,
  pub last_name:    String,
  pub hire_date:    Option<NaiveDate>,
  #[serde(default)]
  pub active:       bool,
  pub release_date: Option<NaiveDate>,
  pub email:        Option<String>,
  pub phone_number: Option<String>,
  #[serde(default)]
  pub display_name: String,
}

impl From<&StaffUser> for StaffForm {
  fn from(user: &StaffUser) -> Self {
    Self {
      national_id:  user.national_id.to_string(),
      first_name:   user.first_name.clone(),
      middle_name:  user.middle_name.clone(),
      last_name:    user.last_name.clone(),
      hire_date:    Some(user.hire_date),
      active:       user.active,
      release_date: user.release_date,
      email:        user.email.clone(),
      phone_number: user.phone_number.clone(),
      display_name: user.display_name.clone(),
    }
  }
}

// ─── Operation results ───────────────────────────────────────────────────────

/// What the password reset screen needs to show about its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordTarget {
  pub user_id:   Uuid,
  pub full_name: String,
}

/// A transient message for the caller to display after a successful action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
  pub message: String,
}

impl Notice {
  pub fn new(message: impl Into<String>) -> Self {
    Self { message: message.into() }
  }
}

/// Result of a delete; deleting an absent record is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deletion {
  Deleted,
  Absent,
}
