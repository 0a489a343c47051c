//! Masterlist records: the canonical, de-duplicated citizen registry.
//!
//! A record is created the first time an identity-bearing application is
//! approved and is merged field-by-field on every later transition. Its
//! `id_status` is the single source of truth for where the citizen sits in
//! the ID lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{
  Error, Result,
  application::{FormData, text},
  normalize::NormalizedIdentity,
};

/// Lifecycle of a citizen's ID card.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
pub enum IdStatus {
  New,
  Pending,
  Approved,
  Released,
  Rejected,
}

impl IdStatus {
  /// Parse a status label, rejecting anything outside the enum.
  pub fn parse_label(label: &str) -> Result<Self> {
    label
      .parse()
      .map_err(|_| Error::InvalidIdStatus(label.to_owned()))
  }
}

// ─── Match key ───────────────────────────────────────────────────────────────

/// Fallback identity key: `"LAST, FIRST MIDDLE"` (uppercased, trimmed) plus
/// the birth date exactly as captured.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey {
  pub full_name:  String,
  pub birth_date: String,
}

impl MatchKey {
  pub fn new(last: &str, first: &str, middle: &str, birth_date: &str) -> Self {
    Self {
      full_name:  compose_full_name(last, first, middle),
      birth_date: birth_date.to_owned(),
    }
  }
}

/// The display form stored in `MasterlistRecord::full_name`.
pub fn compose_full_name(last: &str, first: &str, middle: &str) -> String {
  format!("{last}, {first} {middle}").to_uppercase().trim().to_owned()
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A citizen in the masterlist. Text fields are stored uppercased for
/// printing on official documents; `email` is lowercased and credentials keep
/// their case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterlistRecord {
  pub id:                String,
  pub full_name:         String,
  pub first_name:        String,
  pub last_name:         String,
  pub middle_name:       String,
  pub birth_date:        String,
  #[serde(default)]
  pub birth_place:       String,
  /// Same value as `scid_number`; both keys are read by consumers.
  #[serde(default)]
  pub senior_id_number:  String,
  #[serde(default, rename = "scid_number")]
  pub scid_number:       String,
  #[serde(rename = "id_status")]
  pub id_status:         IdStatus,
  #[serde(default)]
  pub address:           String,
  #[serde(default, rename = "house_no")]
  pub house_no:          String,
  #[serde(default)]
  pub street:            String,
  #[serde(default)]
  pub barangay:          String,
  #[serde(default, rename = "city_municipality")]
  pub city_municipality: String,
  #[serde(default)]
  pub province:          String,
  #[serde(default)]
  pub district:          String,
  #[serde(default)]
  pub email:             String,
  #[serde(default, rename = "contact_number")]
  pub contact_number:    String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub sex:               Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub civil_status:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub username:          Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub password:          Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub released_date:     Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub form_data:         Option<FormData>,
}

impl MasterlistRecord {
  /// An empty record with the given id, used as the base for a first
  /// approval.
  pub fn blank(id: impl Into<String>, id_status: IdStatus) -> Self {
    Self {
      id: id.into(),
      full_name: String::new(),
      first_name: String::new(),
      last_name: String::new(),
      middle_name: String::new(),
      birth_date: String::new(),
      birth_place: String::new(),
      senior_id_number: String::new(),
      scid_number: String::new(),
      id_status,
      address: String::new(),
      house_no: String::new(),
      street: String::new(),
      barangay: String::new(),
      city_municipality: String::new(),
      province: String::new(),
      district: String::new(),
      email: String::new(),
      contact_number: String::new(),
      sex: None,
      civil_status: None,
      username: None,
      password: None,
      released_date: None,
      form_data: None,
    }
  }

  /// Build a record from a normalized storage row. Rows whose status is not
  /// an ID status (e.g. an application status) are treated as `Pending`.
  pub fn from_identity(id: impl Into<String>, identity: NormalizedIdentity) -> Self {
    let id_status =
      IdStatus::parse_label(&identity.status).unwrap_or(IdStatus::Pending);
    let mut record = Self::blank(id, id_status);
    record.scid_number = identity.senior_id_number.clone();
    record.senior_id_number = identity.senior_id_number;
    record.first_name = identity.first_name.to_uppercase();
    record.last_name = identity.last_name.to_uppercase();
    record.middle_name = identity.middle_name.to_uppercase();
    record.full_name = identity.full_name.to_uppercase();
    record.birth_date = identity.birth_date;

    let form = &identity.form_data;
    record.birth_place = text(&form.birth_place).to_uppercase();
    record.address = text(&form.address).to_uppercase();
    record.email = text(&form.email).trim().to_lowercase();
    record.contact_number = text(&form.contact_number).trim().to_owned();
    record.sex = form.sex.clone().filter(|s| !s.is_empty());
    record.civil_status = form.civil_status.clone().filter(|s| !s.is_empty());
    record.form_data = Some(identity.form_data);
    record
  }

  /// True if `scid_number` has been assigned.
  pub fn has_scid(&self) -> bool { !self.scid_number.is_empty() }

  /// This record's side of the fallback match.
  pub fn match_key(&self) -> MatchKey {
    MatchKey {
      full_name:  self.full_name.clone(),
      birth_date: self.birth_date.clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn full_name_is_last_comma_first_middle_upper() {
    assert_eq!(compose_full_name("Dela Cruz", "Juan", "Santos"), "DELA CRUZ, JUAN SANTOS");
    assert_eq!(compose_full_name("Dela Cruz", "Juan", ""), "DELA CRUZ, JUAN");
  }

  #[test]
  fn id_status_rejects_unknown_labels() {
    assert_eq!(IdStatus::parse_label("Released").unwrap(), IdStatus::Released);
    assert!(matches!(
      IdStatus::parse_label("Lost"),
      Err(Error::InvalidIdStatus(label)) if label == "Lost"
    ));
  }

  #[test]
  fn record_serialises_mixed_key_styles() {
    let mut record = MasterlistRecord::blank("u1", IdStatus::New);
    record.scid_number = "SCID-000001".into();
    record.senior_id_number = "SCID-000001".into();
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["scid_number"], "SCID-000001");
    assert_eq!(json["seniorIdNumber"], "SCID-000001");
    assert_eq!(json["id_status"], "New");
    assert!(json.get("city_municipality").is_some());
  }
}
