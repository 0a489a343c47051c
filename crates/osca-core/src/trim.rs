//! Recursive whitespace trimming for submitted payloads.
//!
//! Every string leaf, at any nesting depth, is trimmed before it is stored.
//! Trimming is idempotent.

use serde_json::{Map, Value};

use crate::application::{Application, FormData, NewApplication};

pub trait DeepTrim {
  fn deep_trim(&mut self);

  /// By-value convenience wrapper.
  fn trimmed(mut self) -> Self
  where
    Self: Sized,
  {
    self.deep_trim();
    self
  }
}

impl DeepTrim for String {
  fn deep_trim(&mut self) {
    let trimmed = self.trim();
    if trimmed.len() != self.len() {
      *self = trimmed.to_owned();
    }
  }
}

impl<T: DeepTrim> DeepTrim for Option<T> {
  fn deep_trim(&mut self) {
    if let Some(inner) = self {
      inner.deep_trim();
    }
  }
}

impl<T: DeepTrim> DeepTrim for Vec<T> {
  fn deep_trim(&mut self) { self.iter_mut().for_each(DeepTrim::deep_trim); }
}

impl DeepTrim for Value {
  fn deep_trim(&mut self) {
    match self {
      Value::String(s) => s.deep_trim(),
      Value::Array(items) => items.deep_trim(),
      Value::Object(map) => map.deep_trim(),
      Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
  }
}

impl DeepTrim for Map<String, Value> {
  fn deep_trim(&mut self) { self.values_mut().for_each(DeepTrim::deep_trim); }
}

impl DeepTrim for FormData {
  fn deep_trim(&mut self) {
    for field in [
      &mut self.first_name,
      &mut self.middle_name,
      &mut self.last_name,
      &mut self.suffix,
      &mut self.birth_date,
      &mut self.birth_place,
      &mut self.sex,
      &mut self.citizenship,
      &mut self.civil_status,
      &mut self.address,
      &mut self.house_no,
      &mut self.street,
      &mut self.barangay,
      &mut self.district,
      &mut self.city,
      &mut self.province,
      &mut self.contact_number,
      &mut self.email,
      &mut self.scid_number,
      &mut self.emergency_contact_person,
      &mut self.emergency_contact_number,
      &mut self.captured_image,
      &mut self.living_arrangement,
      &mut self.pension_source,
      &mut self.pension_amount,
      &mut self.illness_details,
      &mut self.benefit_program,
      &mut self.remarks,
    ] {
      field.deep_trim();
    }
    self.extra.deep_trim();
  }
}

impl DeepTrim for NewApplication {
  fn deep_trim(&mut self) {
    self.user_id.deep_trim();
    self.user_name.deep_trim();
    self.description.deep_trim();
    self.documents.deep_trim();
    self.form_data.deep_trim();
  }
}

impl DeepTrim for Application {
  fn deep_trim(&mut self) {
    self.id.deep_trim();
    self.user_id.deep_trim();
    self.user_name.deep_trim();
    self.description.deep_trim();
    self.documents.deep_trim();
    self.rejection_reason.deep_trim();
    self.form_data.deep_trim();
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn trims_nested_json_leaves() {
    let value = json!({
      "a": "  x ",
      "b": [" y", { "c": "z  " }],
      "n": 4,
      "t": true
    })
    .trimmed();
    assert_eq!(value, json!({ "a": "x", "b": ["y", { "c": "z" }], "n": 4, "t": true }));
  }

  #[test]
  fn trimming_twice_equals_trimming_once() {
    let form = FormData {
      first_name: Some("  Juan ".into()),
      extra: serde_json::from_value(json!({ "note": { "deep": " text " } })).unwrap(),
      ..FormData::default()
    };
    let once = form.clone().trimmed();
    let twice = once.clone().trimmed();
    assert_eq!(once, twice);
    assert_eq!(once.first_name.as_deref(), Some("Juan"));
    assert_eq!(once.extra["note"]["deep"], json!("text"));
  }
}
