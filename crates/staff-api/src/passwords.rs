//! Handlers for `/accounts/{id}/password`. Accounts are addressed by their
//! internal id here, not by national id.

use axum::{
  Json,
  extract::{Path, State},
};
use serde::Deserialize;
use staff_core::{
  staff::{Notice, PasswordTarget},
  store::AccountStore,
};
use tracing::info;
use uuid::Uuid;

use crate::{AppState, auth::Admin, error::ApiError};

/// `GET /accounts/{id}/password`
pub async fn target<S>(
  _: Admin,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<PasswordTarget>, ApiError>
where
  S: AccountStore + Clone + 'static,
{
  Ok(Json(state.manager.password_target(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct ChangeBody {
  #[serde(default)]
  pub new_password: String,
}

/// `PUT /accounts/{id}/password` — body: `{"new_password":"..."}`.
pub async fn change<S>(
  admin: Admin,
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ChangeBody>,
) -> Result<Json<Notice>, ApiError>
where
  S: AccountStore + Clone + 'static,
{
  info!(by = %admin.username, %id, "password change requested");
  Ok(Json(state.manager.change_password(id, &body.new_password).await?))
}
