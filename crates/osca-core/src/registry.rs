//! External registry rows (civil registry births and PWD records) and the
//! registration prefill built from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  application::{FormData, text},
  dates::{SENIOR_AGE, age_on, parse_birth_date},
  normalize::split_optional_name,
};

/// Which external registry a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrySource {
  #[serde(rename = "LCR")]
  Lcr,
  #[serde(rename = "PWD")]
  Pwd,
}

/// A read-only row from an external registry. Used only as search input to
/// start a registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryRecord {
  pub id:            String,
  #[serde(rename = "type")]
  pub source:        RegistrySource,
  #[serde(default, alias = "first_name")]
  pub first_name:    String,
  #[serde(default, alias = "middle_name")]
  pub middle_name:   Option<String>,
  #[serde(default, alias = "last_name")]
  pub last_name:     String,
  #[serde(default, alias = "extension")]
  pub suffix:        Option<String>,
  /// Combined name for rows without structured name parts.
  #[serde(default, alias = "fullname", alias = "full_name", alias = "name")]
  pub full_name:     Option<String>,
  #[serde(default)]
  pub citizenship:   Option<String>,
  #[serde(default, alias = "birth_date", alias = "birthday")]
  pub birth_date:    String,
  #[serde(default, alias = "birth_place", alias = "birthplace")]
  pub birth_place:   Option<String>,
  #[serde(default, alias = "gender")]
  pub sex:           Option<String>,
  #[serde(default, alias = "civil_status")]
  pub civil_status:  Option<String>,
  #[serde(default)]
  pub province:      Option<String>,
  #[serde(default, alias = "city_municipality")]
  pub city:          Option<String>,
  #[serde(default)]
  pub district:      Option<String>,
  #[serde(default)]
  pub barangay:      Option<String>,
  #[serde(default)]
  pub street:        Option<String>,
  #[serde(default, alias = "house_no")]
  pub house_no:      Option<String>,
  #[serde(default)]
  pub address:       Option<String>,
  #[serde(default)]
  pub is_registered: bool,
  #[serde(default)]
  pub age:           Option<u32>,
  #[serde(default)]
  pub status:        Option<String>,
}

impl RegistryRecord {
  /// Civil-registry rows for people aged 60 or over on `reference` who are
  /// not registered yet.
  pub fn is_senior_candidate(&self, reference: NaiveDate) -> bool {
    self.source == RegistrySource::Lcr
      && !self.is_registered
      && age_on(&self.birth_date, reference) >= SENIOR_AGE
  }
}

fn text_or(value: &Option<String>, default: &str) -> String {
  match text(value) {
    "" => default.to_owned(),
    s => s.to_owned(),
  }
}

/// Normalise a birth date to `YYYY-MM-DD` where it parses; otherwise keep
/// the raw text.
fn iso_date(raw: &str) -> String {
  parse_birth_date(raw)
    .map(|d| d.format("%Y-%m-%d").to_string())
    .unwrap_or_else(|| raw.to_owned())
}

/// Registration form prefilled from a registry row.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationDraft(pub FormData);

impl RegistrationDraft {
  /// Uppercased name parts (split from the combined name when the row has
  /// no structured first or last name), address defaults for the home city.
  pub fn from_registry(record: &RegistryRecord) -> Self {
    let mut first = record.first_name.clone();
    let mut last = record.last_name.clone();
    let mut middle = record.middle_name.clone().unwrap_or_default();

    if first.is_empty() && last.is_empty() {
      let full = record.full_name.as_ref().map(|s| s.trim().to_uppercase());
      let parts = split_optional_name(&full);
      first = parts.first;
      middle = parts.middle;
      last = parts.last;
    }

    Self(FormData {
      first_name: Some(first.to_uppercase()),
      middle_name: Some(middle.to_uppercase()),
      last_name: Some(last.to_uppercase()),
      suffix: Some(text(&record.suffix).to_uppercase()),
      birth_date: Some(iso_date(&record.birth_date)),
      birth_place: Some(text(&record.birth_place).to_uppercase()),
      sex: Some(text(&record.sex).to_owned()),
      civil_status: Some(text(&record.civil_status).to_owned()),
      citizenship: Some(text_or(&record.citizenship, "Filipino")),
      house_no: Some(text(&record.house_no).to_owned()),
      street: Some(text(&record.street).to_owned()),
      barangay: Some(text(&record.barangay).to_owned()),
      district: Some(text(&record.district).to_owned()),
      city: Some(text_or(&record.city, "San Juan City")),
      province: Some(text_or(&record.province, "Metro Manila")),
      ..FormData::default()
    })
  }

  pub fn into_form(self) -> FormData { self.0 }
}
