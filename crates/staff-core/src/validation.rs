//! Form validation. Every violated rule contributes one message; nothing
//! short-circuits.

use chrono::NaiveDate;

use crate::{
  Error, Result,
  staff::{NationalId, StaffForm},
};

pub const NATIONAL_ID_LEN: usize = 10;
pub const NAME_MAX_LEN: usize = 50;

/// The parts of a form that passed validation, in typed form.
#[derive(Debug, Clone)]
pub struct ValidForm {
  pub national_id: NationalId,
  pub hire_date:   NaiveDate,
}

impl StaffForm {
  /// Check every field rule and return the typed key fields on success.
  pub fn validate(&self) -> Result<ValidForm> {
    let mut errors = Vec::new();

    let national_id = NationalId::parse(&self.national_id)
      .map_err(|e| errors.push(e))
      .ok();

    check_name(&mut errors, "first name", &self.first_name);
    check_name(&mut errors, "middle name", &self.middle_name);
    check_name(&mut errors, "last name", &self.last_name);

    if self.hire_date.is_none() {
      errors.push("hire date is required".to_owned());
    }

    match (national_id, self.hire_date) {
      (Some(national_id), Some(hire_date)) if errors.is_empty() => {
        Ok(ValidForm { national_id, hire_date })
      }
      _ => Err(Error::Validation(errors)),
    }
  }
}

fn check_name(errors: &mut Vec<String>, field: &str, value: &str) {
  if value.trim().is_empty() {
    errors.push(format!("{field} is required"));
  } else if value.chars().count() > NAME_MAX_LEN {
    errors.push(format!("{field} must be at most {NAME_MAX_LEN} characters"));
  }
}

/// A search term must contain something other than whitespace.
pub fn search_term(raw: &str) -> Result<&str> {
  let term = raw.trim();
  if term.is_empty() {
    return Err(Error::Validation(vec![
      "please enter a national id to search".to_owned(),
    ]));
  }
  Ok(term)
}
