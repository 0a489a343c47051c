//! Citizen complaints. Read-mostly; only creation is modelled.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplaintStatus {
  Open,
  Resolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
  pub id:         String,
  pub user_id:    String,
  #[serde(default)]
  pub user_name:  String,
  pub date:       NaiveDate,
  pub subject:    String,
  #[serde(default)]
  pub details:    String,
  pub status:     ComplaintStatus,
  /// Optional enrichment produced outside this system.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ai_summary: Option<String>,
}

/// Input to [`crate::store::PortalStore::add_complaint`]. The store assigns
/// the id, date and `Open` status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComplaint {
  pub user_id:   String,
  #[serde(default)]
  pub user_name: String,
  pub subject:   String,
  #[serde(default)]
  pub details:   String,
}
