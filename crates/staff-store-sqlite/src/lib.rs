//! SQLite backend for staff accounts.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Passwords are stored as argon2 PHC
//! strings and checked against a [`PasswordPolicy`] before hashing.

mod encode;
mod schema;
mod store;

pub mod error;
pub mod policy;

pub use error::{Error, Result};
pub use policy::PasswordPolicy;
pub use store::SqliteStore;
