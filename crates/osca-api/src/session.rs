//! Handlers for `/session`, the shared action-error slot, and OTP requests.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/session` | Current user, or `null` |
//! | `POST`   | `/session/login` | Body: `{"username":"...","password":"..."}`; 401 on mismatch |
//! | `POST`   | `/session/logout` | Clears the session |
//! | `GET`    | `/action-error` | Last validation message, or `null` |
//! | `DELETE` | `/action-error` | Clears the message |
//! | `POST`   | `/otp` | Body: `{"to":"..."}`; returns the generated code |

use std::sync::Arc;

use axum::{Json, extract::State};
use osca_core::{ActionOutcome, store::PortalStore, user::User};
use serde::Deserialize;

use crate::{
  error::ApiError,
  notify,
  outcome::{Outcome, done},
};

// ─── Login / logout ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub username: String,
  pub password: String,
}

/// `POST /session/login`
pub async fn login<S: PortalStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<Outcome<User>>, ApiError> {
  let user = store
    .login(&body.username, &body.password)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::Unauthorized("invalid username or password".into()))?;
  Ok(Outcome::with(user))
}

/// `POST /session/logout`
pub async fn logout<S: PortalStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<ActionOutcome>, ApiError> {
  store.logout().await.map_err(ApiError::store)?;
  Ok(done())
}

/// `GET /session`
pub async fn current<S: PortalStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Option<User>>, ApiError> {
  let user = store.current_user().await.map_err(ApiError::store)?;
  Ok(Json(user))
}

// ─── Action error ────────────────────────────────────────────────────────────

/// `GET /action-error`
pub async fn action_error<S: PortalStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Option<String>>, ApiError> {
  let message = store.action_error().await.map_err(ApiError::store)?;
  Ok(Json(message))
}

/// `DELETE /action-error`
pub async fn clear_action_error<S: PortalStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<ActionOutcome>, ApiError> {
  store.set_action_error(None).await.map_err(ApiError::store)?;
  Ok(done())
}

// ─── OTP ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OtpBody {
  pub to: String,
}

/// `POST /otp`
pub async fn otp(Json(body): Json<OtpBody>) -> Result<Json<Outcome<String>>, ApiError> {
  if body.to.trim().is_empty() {
    return Err(ApiError::BadRequest("recipient is required".into()));
  }
  Ok(Outcome::with(notify::send_otp(body.to.trim())))
}
