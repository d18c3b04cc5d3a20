//! JSON HTTP API for staff account management.
//!
//! Exposes an axum [`Router`] over a [`StaffManager`] backed by any
//! [`AccountStore`]. Every route sits behind the [`auth::Admin`] gate, so
//! the caller must be a configured principal holding the admin role.
//!
//! | Method   | Path | Operation |
//! |----------|------|-----------|
//! | `GET`    | `/users` | list |
//! | `POST`   | `/users` | create; body: form fields + `password` |
//! | `GET`    | `/users/new` | blank form for a new hire |
//! | `GET`    | `/users/search?national_id=` | search |
//! | `GET`    | `/users/{national_id}` | details |
//! | `PUT`    | `/users/{national_id}` | edit |
//! | `DELETE` | `/users/{national_id}` | delete (204 even if absent) |
//! | `GET`    | `/accounts/{id}/password` | password reset target |
//! | `PUT`    | `/accounts/{id}/password` | change password |

pub mod auth;
pub mod error;
pub mod passwords;
pub mod settings;
pub mod users;

pub use error::ApiError;
pub use settings::{ConfigError, ServerConfig};

use std::sync::Arc;

use axum::{Router, routing::get};
use staff_core::{StaffManager, store::AccountStore};
use tower_http::trace::TraceLayer;

use auth::Principal;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: AccountStore> {
  pub manager:    Arc<StaffManager<S>>,
  pub principals: Arc<Vec<Principal>>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the staff management router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: AccountStore + Clone + 'static,
{
  Router::new()
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route("/users/new", get(users::draft::<S>))
    .route("/users/search", get(users::search::<S>))
    .route(
      "/users/{national_id}",
      get(users::get_one::<S>)
        .put(users::edit::<S>)
        .delete(users::delete::<S>),
    )
    .route(
      "/accounts/{id}/password",
      get(passwords::target::<S>).put(passwords::change::<S>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
