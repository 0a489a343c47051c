//! Handlers for `/complaints`.

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use osca_core::{
  complaint::{Complaint, NewComplaint},
  store::PortalStore,
};

use crate::{error::ApiError, outcome::Outcome};

/// `GET /complaints`
pub async fn list<S: PortalStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Complaint>>, ApiError> {
  let complaints = store.complaints().await.map_err(ApiError::store)?;
  Ok(Json(complaints))
}

/// `POST /complaints`: returns 201 + the stored complaint.
pub async fn create<S: PortalStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewComplaint>,
) -> Result<impl IntoResponse, ApiError> {
  if body.subject.trim().is_empty() {
    return Err(ApiError::BadRequest("subject is required".into()));
  }
  let complaint = store.add_complaint(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Outcome::with(complaint)))
}
