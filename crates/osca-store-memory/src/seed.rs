//! Initial collections, loaded from a JSON document.
//!
//! Masterlist rows are accepted in any source shape and run through the
//! record normalizer on load.

use std::path::Path;

use osca_core::{
  application::Application,
  complaint::Complaint,
  normalize::SourceRecord,
  registry::RegistryRecord,
  user::User,
};
use serde::Deserialize;

use crate::Result;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Seed {
  pub users:            Vec<User>,
  pub applications:     Vec<Application>,
  pub id_issuances:     Vec<Application>,
  pub complaints:       Vec<Complaint>,
  pub registry_records: Vec<RegistryRecord>,
  pub masterlist:       Vec<SourceRecord>,
}

impl Seed {
  pub fn from_json(json: &str) -> Result<Self> { Ok(serde_json::from_str(json)?) }

  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let json = std::fs::read_to_string(path)?;
    Self::from_json(&json)
  }
}
