//! Handlers for `/registry`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/registry` | Optional `?senior_only=true[&reference=YYYY-MM-DD]` |
//! | `GET`  | `/registry/{id}` | Identity verification; 404 if unknown |
//! | `GET`  | `/registry/{id}/draft` | Registration form prefilled from the row |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::{NaiveDate, Utc};
use osca_core::{
  application::FormData,
  registry::{RegistrationDraft, RegistryRecord},
  store::PortalStore,
};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  /// Only unregistered civil-registry rows aged 60 or over.
  #[serde(default)]
  pub senior_only: bool,
  /// Date ages are computed on. Defaults to today (UTC).
  pub reference:   Option<NaiveDate>,
}

/// `GET /registry[?senior_only=true][&reference=...]`
pub async fn list<S: PortalStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<RegistryRecord>>, ApiError> {
  let records = if params.senior_only {
    let reference = params
      .reference
      .unwrap_or_else(|| Utc::now().date_naive());
    store.senior_registry_candidates(reference).await
  } else {
    store.registry_records().await
  }
  .map_err(ApiError::store)?;
  Ok(Json(records))
}

async fn lookup<S: PortalStore>(store: &S, id: &str) -> Result<RegistryRecord, ApiError> {
  store
    .verify_identity(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("registry record {id} not found")))
}

/// `GET /registry/{id}`
pub async fn verify<S: PortalStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<RegistryRecord>, ApiError> {
  Ok(Json(lookup(store.as_ref(), &id).await?))
}

/// `GET /registry/{id}/draft`
pub async fn draft<S: PortalStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<FormData>, ApiError> {
  let record = lookup(store.as_ref(), &id).await?;
  Ok(Json(RegistrationDraft::from_registry(&record).into_form()))
}
