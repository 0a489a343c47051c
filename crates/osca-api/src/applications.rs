//! Handlers for `/applications` and `/id-issuances`.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/applications` | General applications, newest first |
//! | `POST`  | `/applications` | Body: [`NewApplication`]; returns 201 |
//! | `PATCH` | `/applications/{id}` | Body: [`ApplicationPatch`]; 400 on a bad `id_status` |
//! | `POST`  | `/applications/{id}/status` | Body: `{"status":"Approved","reason":"..."}` |
//! | `POST`  | `/applications/{id}/issue` | Marks the application released |
//! | `GET`   | `/id-issuances` | ID issuance requests, newest first |
//! | `POST`  | `/id-issuances` | Body: [`NewApplication`]; returns 201 |
//!
//! The `{id}` routes address either collection.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use osca_core::{
  application::{
    Application, ApplicationPatch, ApplicationStatus, ApplicationType, NewApplication,
  },
  store::PortalStore,
};
use serde::Deserialize;

use crate::{error::ApiError, notify, outcome::Outcome};

fn not_found(id: &str) -> ApiError { ApiError::NotFound(format!("application {id} not found")) }

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /applications`
pub async fn list<S: PortalStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Application>>, ApiError> {
  let apps = store.applications().await.map_err(ApiError::store)?;
  Ok(Json(apps))
}

/// `GET /id-issuances`
pub async fn list_issuances<S: PortalStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Application>>, ApiError> {
  let apps = store.id_issuances().await.map_err(ApiError::store)?;
  Ok(Json(apps))
}

// ─── Submit ──────────────────────────────────────────────────────────────────

/// `POST /applications`
pub async fn submit<S: PortalStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewApplication>,
) -> Result<impl IntoResponse, ApiError> {
  let app = store
    .submit_application(body)
    .await
    .map_err(ApiError::store)?;
  if app.kind == ApplicationType::Registration {
    notify::application_received(&app);
  }
  notify::application_reviewed(&app);
  Ok((StatusCode::CREATED, Outcome::with(app)))
}

/// `POST /id-issuances`
pub async fn submit_issuance<S: PortalStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewApplication>,
) -> Result<impl IntoResponse, ApiError> {
  let app = store
    .submit_id_issuance(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Outcome::with(app)))
}

// ─── Lifecycle ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TransitionBody {
  pub status: ApplicationStatus,
  pub reason: Option<String>,
}

/// `POST /applications/{id}/status`
pub async fn transition<S: PortalStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(body): Json<TransitionBody>,
) -> Result<Json<Outcome<Application>>, ApiError> {
  let app = store
    .transition_status(&id, body.status, body.reason)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(&id))?;
  notify::application_reviewed(&app);
  Ok(Outcome::with(app))
}

/// `PATCH /applications/{id}`
pub async fn edit<S: PortalStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(patch): Json<ApplicationPatch>,
) -> Result<Json<Outcome<Application>>, ApiError> {
  let app = store
    .edit_application(&id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(&id))?;
  Ok(Outcome::with(app))
}

/// `POST /applications/{id}/issue`
pub async fn issue<S: PortalStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Outcome<Application>>, ApiError> {
  let app = store
    .mark_issued(&id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(&id))?;
  Ok(Outcome::with(app))
}
