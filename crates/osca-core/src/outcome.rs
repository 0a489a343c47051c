//! The `{ ok, error? }` result shape returned to callers of write operations.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Boolean-flagged result of a mutation. Callers display `error` verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
  pub ok:    bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl ActionOutcome {
  pub fn success() -> Self { Self { ok: true, error: None } }

  pub fn failure(message: impl Into<String>) -> Self {
    Self {
      ok:    false,
      error: Some(message.into()),
    }
  }
}

impl<T, E: Display> From<&Result<T, E>> for ActionOutcome {
  fn from(result: &Result<T, E>) -> Self {
    match result {
      Ok(_) => Self::success(),
      Err(e) => Self::failure(e.to_string()),
    }
  }
}
