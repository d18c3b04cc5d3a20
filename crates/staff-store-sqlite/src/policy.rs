//! Password strength rules applied before a credential is stored.

use serde::Deserialize;

/// Which character classes a password needs, and how long it must be.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PasswordPolicy {
  pub required_length:          usize,
  pub require_digit:            bool,
  pub require_lowercase:        bool,
  pub require_uppercase:        bool,
  pub require_non_alphanumeric: bool,
}

impl Default for PasswordPolicy {
  fn default() -> Self {
    Self {
      required_length:          6,
      require_digit:            true,
      require_lowercase:        true,
      require_uppercase:        true,
      require_non_alphanumeric: true,
    }
  }
}

impl PasswordPolicy {
  /// One description per rule the password breaks; empty if it passes.
  pub fn check(&self, password: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if password.chars().count() < self.required_length {
      errors.push(format!(
        "Passwords must be at least {} characters.",
        self.required_length
      ));
    }
    if self.require_non_alphanumeric
      && password.chars().all(char::is_alphanumeric)
    {
      errors.push(
        "Passwords must have at least one non alphanumeric character.".into(),
      );
    }
    if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
      errors.push("Passwords must have at least one digit ('0'-'9').".into());
    }
    if self.require_lowercase && !password.chars().any(|c| c.is_lowercase()) {
      errors.push("Passwords must have at least one lowercase ('a'-'z').".into());
    }
    if self.require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
      errors.push("Passwords must have at least one uppercase ('A'-'Z').".into());
    }
    errors
  }
}
