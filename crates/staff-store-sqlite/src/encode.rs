//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Calendar dates are stored as `YYYY-MM-DD`. UUIDs are stored as hyphenated
//! lowercase strings. Booleans are stored as 0/1 integers.

use chrono::NaiveDate;
use staff_core::staff::{NationalId, StaffUser};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── NaiveDate ────────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Display name ─────────────────────────────────────────────────────────────

/// The key used for case-insensitive user name uniqueness.
pub fn normalize_name(name: &str) -> String { name.trim().to_uppercase() }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `staff_users` row.
pub struct RawStaffUser {
  pub id:                String,
  pub national_id:       String,
  pub first_name:        String,
  pub middle_name:       String,
  pub last_name:         String,
  pub hire_date:         String,
  pub active:            bool,
  pub release_date:      Option<String>,
  pub email:             Option<String>,
  pub phone_number:      Option<String>,
  pub display_name:      String,
  pub concurrency_stamp: String,
}

impl RawStaffUser {
  /// Read a row whose columns run `id, national_id, first_name, middle_name,
  /// last_name, hire_date, active, release_date, email, phone_number,
  /// display_name, concurrency_stamp`.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      national_id:       row.get(1)?,
      first_name:        row.get(2)?,
      middle_name:       row.get(3)?,
      last_name:         row.get(4)?,
      hire_date:         row.get(5)?,
      active:            row.get(6)?,
      release_date:      row.get(7)?,
      email:             row.get(8)?,
      phone_number:      row.get(9)?,
      display_name:      row.get(10)?,
      concurrency_stamp: row.get(11)?,
    })
  }

  pub fn into_user(self) -> Result<StaffUser> {
    let id = decode_uuid(&self.id)?;
    let national_id = NationalId::parse(&self.national_id)
      .map_err(|e| Error::NationalId(id, e))?;

    Ok(StaffUser {
      id,
      national_id,
      first_name: self.first_name,
      middle_name: self.middle_name,
      last_name: self.last_name,
      hire_date: decode_date(&self.hire_date)?,
      active: self.active,
      release_date: self.release_date.as_deref().map(decode_date).transpose()?,
      email: self.email,
      phone_number: self.phone_number,
      display_name: self.display_name,
      concurrency_stamp: decode_uuid(&self.concurrency_stamp)?,
    })
  }
}
