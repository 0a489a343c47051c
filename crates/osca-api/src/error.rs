//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders as the failed [`ActionOutcome`] shape,
//! `{"ok": false, "error": "..."}`.

use std::error::Error as StdError;

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use osca_core::ActionOutcome;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  Unauthorized(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn StdError + Send + Sync>),
}

impl ApiError {
  /// Wrap a store failure. Validation errors anywhere in the source chain
  /// become `400 Bad Request`; everything else is a server error.
  pub fn store<E>(e: E) -> Self
  where
    E: StdError + Send + Sync + 'static,
  {
    let validation = std::iter::successors(
      Some(&e as &(dyn StdError + 'static)),
      |e: &&(dyn StdError + 'static)| (*e).source(),
    )
    .any(|e| {
      matches!(
        e.downcast_ref::<osca_core::Error>(),
        Some(osca_core::Error::InvalidIdStatus(_))
      )
    });

    if validation {
      ApiError::BadRequest(e.to_string())
    } else {
      ApiError::Store(Box::new(e))
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ActionOutcome::failure(self.to_string()))).into_response()
  }
}
