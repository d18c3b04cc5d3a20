//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use staff_core::Error as CoreError;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  /// Authenticated, but without the role the route needs.
  #[error("forbidden")]
  Forbidden,

  #[error(transparent)]
  Manager(#[from] CoreError),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let error = match self {
      ApiError::Unauthorized => {
        let mut res = (
          StatusCode::UNAUTHORIZED,
          Json(json!({ "error": "unauthorized" })),
        )
          .into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"staff\""),
        );
        return res;
      }
      ApiError::Forbidden => {
        return (StatusCode::FORBIDDEN, Json(json!({ "error": "forbidden" })))
          .into_response();
      }
      ApiError::Manager(e) => e,
    };

    match error {
      // Both carry a list meant to be shown next to the submitted form.
      e @ (CoreError::Validation(_) | CoreError::AccountStore(_)) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "errors": e.messages() })),
      )
        .into_response(),
      CoreError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
      }
      e @ CoreError::Conflict(_) => {
        (StatusCode::CONFLICT, Json(json!({ "error": e.to_string() })))
          .into_response()
      }
      e @ CoreError::Store(_) => {
        tracing::error!(error = %e, "account store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": e.to_string() })),
        )
          .into_response()
      }
    }
  }
}
