//! Handler for `GET /masterlist`.

use std::sync::Arc;

use axum::{Json, extract::State};
use osca_core::{masterlist::MasterlistRecord, store::PortalStore};

use crate::error::ApiError;

/// `GET /masterlist`
pub async fn list<S: PortalStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<MasterlistRecord>>, ApiError> {
  let records = store.masterlist().await.map_err(ApiError::store)?;
  Ok(Json(records))
}
