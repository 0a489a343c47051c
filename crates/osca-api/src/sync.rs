//! Handler for `POST /sync`.

use std::sync::Arc;

use axum::{Json, extract::State};
use osca_core::{ActionOutcome, store::PortalStore};

use crate::{error::ApiError, outcome::done};

/// `POST /sync`: refresh every collection from the backing source.
pub async fn handler<S: PortalStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<ActionOutcome>, ApiError> {
  store.sync_applications().await.map_err(ApiError::store)?;
  store.sync_id_issuances().await.map_err(ApiError::store)?;
  store.fetch_masterlist().await.map_err(ApiError::store)?;
  Ok(done())
}
