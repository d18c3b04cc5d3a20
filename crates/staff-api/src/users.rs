//! Handlers for `/users` endpoints. Records are addressed by national id.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use staff_core::{
  staff::{StaffForm, StaffUser},
  store::AccountStore,
};
use tracing::info;

use crate::{AppState, auth::Admin, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S>(
  _: Admin,
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<StaffUser>>, ApiError>
where
  S: AccountStore + Clone + 'static,
{
  Ok(Json(state.manager.list().await?))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/{national_id}`
pub async fn get_one<S>(
  _: Admin,
  State(state): State<AppState<S>>,
  Path(national_id): Path<String>,
) -> Result<Json<StaffUser>, ApiError>
where
  S: AccountStore + Clone + 'static,
{
  Ok(Json(state.manager.get_by_national_id(&national_id).await?))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  #[serde(default)]
  pub national_id: String,
}

/// `GET /users/search?national_id=...` — 422 for a blank term, 404 for a miss.
pub async fn search<S>(
  _: Admin,
  State(state): State<AppState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<StaffUser>, ApiError>
where
  S: AccountStore + Clone + 'static,
{
  Ok(Json(state.manager.search_by_national_id(&params.national_id).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `GET /users/new` — defaults for the create form.
pub async fn draft<S>(_: Admin, State(state): State<AppState<S>>) -> Json<StaffForm>
where
  S: AccountStore + Clone + 'static,
{
  Json(state.manager.draft())
}

/// JSON body accepted by `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  #[serde(flatten)]
  pub user:     StaffForm,
  #[serde(default)]
  pub password: String,
}

/// `POST /users` — returns 201 + the stored record.
pub async fn create<S>(
  admin: Admin,
  State(state): State<AppState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AccountStore + Clone + 'static,
{
  info!(by = %admin.username, national_id = %body.user.national_id, "create requested");
  let user = state.manager.create(body.user, &body.password).await?;
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Edit ─────────────────────────────────────────────────────────────────────

/// `PUT /users/{national_id}` — body: the full submitted [`StaffForm`].
pub async fn edit<S>(
  admin: Admin,
  State(state): State<AppState<S>>,
  Path(national_id): Path<String>,
  Json(form): Json<StaffForm>,
) -> Result<Json<StaffUser>, ApiError>
where
  S: AccountStore + Clone + 'static,
{
  info!(by = %admin.username, %national_id, "edit requested");
  Ok(Json(state.manager.edit(&national_id, form).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /users/{national_id}` — 204 whether or not the record existed.
pub async fn delete<S>(
  admin: Admin,
  State(state): State<AppState<S>>,
  Path(national_id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: AccountStore + Clone + 'static,
{
  info!(by = %admin.username, %national_id, "delete requested");
  state.manager.delete(&national_id).await?;
  Ok(StatusCode::NO_CONTENT)
}
