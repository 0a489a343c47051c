//! Response body for write endpoints: the [`ActionOutcome`] flag plus the
//! affected record.

use axum::Json;
use osca_core::ActionOutcome;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Outcome<T> {
  #[serde(flatten)]
  pub outcome: ActionOutcome,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data:    Option<T>,
}

impl<T: Serialize> Outcome<T> {
  /// `{"ok": true, "data": ...}`
  pub fn with(data: T) -> Json<Self> {
    Json(Self {
      outcome: ActionOutcome::success(),
      data:    Some(data),
    })
  }
}

/// `{"ok": true}`
pub fn done() -> Json<ActionOutcome> { Json(ActionOutcome::success()) }
