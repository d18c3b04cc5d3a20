//! Core types and the record manager for hotel staff accounts.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! lives behind [`store::AccountStore`]; the lifecycle and validation rules
//! live here.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod clock;
pub mod error;
pub mod lifecycle;
pub mod manager;
pub mod staff;
pub mod store;
pub mod validation;

pub use error::{Error, Result};
pub use manager::StaffManager;

#[cfg(test)]
mod tests;
