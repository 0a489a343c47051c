//! Handlers for `/users`.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/users` | Administrative users |
//! | `PATCH` | `/users/{id}` | Body: [`UserPatch`]; also refreshes the session user |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use osca_core::{
  store::PortalStore,
  user::{User, UserPatch},
};

use crate::{error::ApiError, outcome::Outcome};

/// `GET /users`
pub async fn list<S: PortalStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<User>>, ApiError> {
  let users = store.users().await.map_err(ApiError::store)?;
  Ok(Json(users))
}

/// `PATCH /users/{id}`
pub async fn update<S: PortalStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(patch): Json<UserPatch>,
) -> Result<Json<Outcome<User>>, ApiError> {
  let user = store
    .update_user(&id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))?;
  Ok(Outcome::with(user))
}
