//! Record normalizer.
//!
//! Inbound rows arrive in several shapes: database-style snake_case columns,
//! camelCase UI records, a nested form payload (`formData` or `form_data`,
//! possibly JSON-encoded as a string) and legacy flat aliases. A single row
//! may mix all of them. [`SourceRecord`] models each shape as its own typed
//! layer and [`normalize`] resolves every field with a fixed precedence:
//!
//!   column → ui → form payload → legacy alias → empty
//!
//! Storage columns are authoritative, so a snake_case value always wins over
//! a camelCase one.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::application::{FormData, text};

// ─── Source layers ───────────────────────────────────────────────────────────

/// Database-style snake_case columns.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColumnLayer {
  pub id:               Option<String>,
  pub first_name:       Option<String>,
  pub last_name:        Option<String>,
  pub middle_name:      Option<String>,
  pub suffix:           Option<String>,
  pub birthdate:        Option<String>,
  pub birth_date:       Option<String>,
  pub fullname:         Option<String>,
  pub full_name:        Option<String>,
  pub id_status:        Option<String>,
  #[serde(rename = "ID_Status")]
  pub id_status_upper:  Option<String>,
  pub scid_number:      Option<String>,
  #[serde(rename = "scid_Number")]
  pub scid_number_mixed: Option<String>,
  #[serde(rename = "SCID_Number")]
  pub scid_number_upper: Option<String>,
  pub senior_id_number: Option<String>,
  pub birth_place:      Option<String>,
  pub civil_status:     Option<String>,
  pub contact_number:   Option<String>,
  pub sex:              Option<String>,
  pub citizenship:      Option<String>,
  pub address:          Option<String>,
  pub email:            Option<String>,
  pub username:         Option<String>,
  pub password:         Option<String>,
}

/// camelCase fields as the UI writes them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiLayer {
  pub first_name:       Option<String>,
  pub last_name:        Option<String>,
  pub middle_name:      Option<String>,
  pub birth_date:       Option<String>,
  pub full_name:        Option<String>,
  pub status:           Option<String>,
  pub senior_id_number: Option<String>,
  pub birth_place:      Option<String>,
  pub civil_status:     Option<String>,
  pub contact_number:   Option<String>,
}

/// Flat aliases left over from older exports.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegacyLayer {
  pub firstname:          Option<String>,
  pub lastname:           Option<String>,
  pub middlename:         Option<String>,
  pub extension:          Option<String>,
  pub birthday:           Option<String>,
  pub dob:                Option<String>,
  pub name:               Option<String>,
  pub application_status: Option<String>,
  pub senior_id:          Option<String>,
  pub birthplace:         Option<String>,
  pub gender:             Option<String>,
}

/// An inbound row in any mix of the known shapes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceRecord {
  #[serde(flatten)]
  pub column:    ColumnLayer,
  #[serde(flatten)]
  pub ui:        UiLayer,
  #[serde(flatten)]
  pub legacy:    LegacyLayer,
  #[serde(default, rename = "formData", deserialize_with = "form_payload")]
  pub form_camel: Option<FormData>,
  #[serde(default, rename = "form_data", deserialize_with = "form_payload")]
  pub form_snake: Option<FormData>,
}

/// Accept a form payload either as an object or as a JSON-encoded string.
fn form_payload<'de, D>(deserializer: D) -> Result<Option<FormData>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = Option::<Value>::deserialize(deserializer)?;
  match value {
    None | Some(Value::Null) => Ok(None),
    Some(Value::String(encoded)) => serde_json::from_str(&encoded)
      .map(Some)
      .map_err(serde::de::Error::custom),
    Some(other) => serde_json::from_value(other)
      .map(Some)
      .map_err(serde::de::Error::custom),
  }
}

impl SourceRecord {
  /// The nested form payload, `formData` taking priority over `form_data`.
  pub fn form(&self) -> Option<&FormData> {
    self.form_camel.as_ref().or(self.form_snake.as_ref())
  }
}

// ─── Normalized output ───────────────────────────────────────────────────────

/// The canonical identity extracted from a [`SourceRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedIdentity {
  pub first_name:       String,
  pub last_name:        String,
  pub middle_name:      String,
  pub suffix:           String,
  pub birth_date:       String,
  pub full_name:        String,
  pub status:           String,
  pub senior_id_number: String,
  /// The form payload with canonical camelCase fields filled in, plus the
  /// snake_case display keys `last_name`, `first_name`, `birthdate` and
  /// `status` in `extra`. Both spellings are read downstream.
  pub form_data:        FormData,
}

/// First non-empty candidate, or the empty string.
fn first_of<'a>(candidates: &[Option<&'a str>]) -> &'a str {
  candidates
    .iter()
    .flatten()
    .copied()
    .find(|s| !s.is_empty())
    .unwrap_or("")
}

/// Resolve every canonical field of `record` by the fixed precedence chain.
pub fn normalize(record: &SourceRecord) -> NormalizedIdentity {
  let col = &record.column;
  let ui = &record.ui;
  let legacy = &record.legacy;
  let empty = FormData::default();
  let form = record.form().unwrap_or(&empty);

  let first_name = first_of(&[
    col.first_name.as_deref(),
    ui.first_name.as_deref(),
    form.first_name.as_deref(),
    legacy.firstname.as_deref(),
  ]);
  let last_name = first_of(&[
    col.last_name.as_deref(),
    ui.last_name.as_deref(),
    form.last_name.as_deref(),
    legacy.lastname.as_deref(),
  ]);
  let middle_name = first_of(&[
    col.middle_name.as_deref(),
    ui.middle_name.as_deref(),
    form.middle_name.as_deref(),
    legacy.middlename.as_deref(),
  ]);
  let suffix = first_of(&[
    col.suffix.as_deref(),
    form.suffix.as_deref(),
    legacy.extension.as_deref(),
  ]);
  let birth_date = first_of(&[
    col.birthdate.as_deref(),
    col.birth_date.as_deref(),
    ui.birth_date.as_deref(),
    form.birth_date.as_deref(),
    legacy.birthday.as_deref(),
    legacy.dob.as_deref(),
  ]);
  let status = match first_of(&[
    col.id_status.as_deref(),
    col.id_status_upper.as_deref(),
    ui.status.as_deref(),
    form.extra.get("status").and_then(Value::as_str),
    legacy.application_status.as_deref(),
  ]) {
    "" => "Pending",
    s => s,
  };
  let full_name = match first_of(&[
    col.fullname.as_deref(),
    col.full_name.as_deref(),
    ui.full_name.as_deref(),
    legacy.name.as_deref(),
  ]) {
    "" => format!("{first_name} {last_name}").trim().to_owned(),
    s => s.to_owned(),
  };
  let column_scid = first_of(&[
    col.scid_number.as_deref(),
    col.scid_number_mixed.as_deref(),
    col.scid_number_upper.as_deref(),
  ]);
  let senior_id_number = first_of(&[
    Some(column_scid),
    col.senior_id_number.as_deref(),
    ui.senior_id_number.as_deref(),
    form.scid_number.as_deref(),
    legacy.senior_id.as_deref(),
  ]);

  let mut form_data = form.clone();
  form_data.scid_number =
    Some(first_of(&[Some(column_scid), form.scid_number.as_deref()]).to_owned());
  for (key, value) in [
    ("last_name", last_name),
    ("first_name", first_name),
    ("birthdate", birth_date),
    ("status", status),
  ] {
    form_data.extra.insert(key.to_owned(), Value::String(value.to_owned()));
  }
  form_data.first_name = Some(first_name.to_owned());
  form_data.last_name = Some(last_name.to_owned());
  form_data.middle_name = Some(middle_name.to_owned());
  form_data.suffix = Some(suffix.to_owned());
  form_data.birth_date = Some(birth_date.to_owned());
  form_data.birth_place = Some(
    first_of(&[
      col.birth_place.as_deref(),
      ui.birth_place.as_deref(),
      form.birth_place.as_deref(),
      form.extra.get("birthplace").and_then(Value::as_str),
      legacy.birthplace.as_deref(),
    ])
    .to_owned(),
  );
  form_data.sex = Some(
    first_of(&[
      col.sex.as_deref(),
      form.sex.as_deref(),
      legacy.gender.as_deref(),
    ])
    .to_owned(),
  );
  form_data.civil_status = Some(
    first_of(&[
      col.civil_status.as_deref(),
      ui.civil_status.as_deref(),
      form.civil_status.as_deref(),
    ])
    .to_owned(),
  );
  form_data.citizenship = Some(
    match first_of(&[col.citizenship.as_deref(), form.citizenship.as_deref()]) {
      "" => "Filipino",
      s => s,
    }
    .to_owned(),
  );
  form_data.address =
    Some(first_of(&[col.address.as_deref(), form.address.as_deref()]).to_owned());
  form_data.contact_number = Some(
    first_of(&[
      col.contact_number.as_deref(),
      ui.contact_number.as_deref(),
      form.contact_number.as_deref(),
      form.extra.get("contact_number").and_then(Value::as_str),
    ])
    .to_owned(),
  );
  form_data.email =
    Some(first_of(&[col.email.as_deref(), form.email.as_deref()]).to_owned());

  NormalizedIdentity {
    first_name: first_name.to_owned(),
    last_name: last_name.to_owned(),
    middle_name: middle_name.to_owned(),
    suffix: suffix.to_owned(),
    birth_date: birth_date.to_owned(),
    full_name,
    status: status.to_owned(),
    senior_id_number: senior_id_number.to_owned(),
    form_data,
  }
}

// ─── Name splitting ──────────────────────────────────────────────────────────

/// First, middle and last name recovered from a single combined string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameParts {
  pub first:  String,
  pub middle: String,
  pub last:   String,
}

/// Best-effort split of a combined name. This is lossy and only used when no
/// structured name is available; it is not authoritative.
///
/// - `"LAST, A B C"`: 3+ given tokens → first = `A B`, middle = `C`;
///   2 tokens → first, middle; 1 token → first only.
/// - `"A B C D..."`: 4+ tokens → first = `A B`, middle = `C`, last = rest;
///   3 → first, middle, last; 2 → first, last; 1 → first only.
pub fn split_full_name(full: &str) -> NameParts {
  let full = full.trim();
  if let Some((last, rest)) = full.split_once(',') {
    // Anything after a second comma is ignored.
    let rest = rest.split(',').next().unwrap_or("");
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let (first, middle) = match tokens.as_slice() {
      [a, b, c, ..] => (format!("{a} {b}"), (*c).to_owned()),
      [a, b] => ((*a).to_owned(), (*b).to_owned()),
      [a] => ((*a).to_owned(), String::new()),
      [] => (String::new(), String::new()),
    };
    return NameParts {
      first,
      middle,
      last: last.trim().to_owned(),
    };
  }

  let tokens: Vec<&str> = full.split_whitespace().collect();
  match tokens.as_slice() {
    [a, b, c, d, rest @ ..] => NameParts {
      first:  format!("{a} {b}"),
      middle: (*c).to_owned(),
      last:   std::iter::once(d).chain(rest).copied().collect::<Vec<_>>().join(" "),
    },
    [a, b, c] => NameParts {
      first:  (*a).to_owned(),
      middle: (*b).to_owned(),
      last:   (*c).to_owned(),
    },
    [a, b] => NameParts {
      first:  (*a).to_owned(),
      middle: String::new(),
      last:   (*b).to_owned(),
    },
    [a] => NameParts {
      first: (*a).to_owned(),
      ..NameParts::default()
    },
    [] => NameParts::default(),
  }
}

/// Split helper for callers holding an optional combined name.
pub fn split_optional_name(full: &Option<String>) -> NameParts {
  split_full_name(text(full))
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn source(value: Value) -> SourceRecord { serde_json::from_value(value).unwrap() }

  // ── Precedence ──────────────────────────────────────────────────────────

  #[test]
  fn snake_case_column_wins_over_camel_case() {
    let identity = normalize(&source(json!({
      "last_name": "Cruz",
      "lastName": "cruz2"
    })));
    assert_eq!(identity.last_name, "Cruz");
  }

  #[test]
  fn camel_case_wins_over_form_payload_and_legacy() {
    let identity = normalize(&source(json!({
      "firstName": "Ana",
      "firstname": "Legacy",
      "formData": { "firstName": "Nested" }
    })));
    assert_eq!(identity.first_name, "Ana");
  }

  #[test]
  fn empty_strings_fall_through_the_chain() {
    let identity = normalize(&source(json!({
      "first_name": "",
      "firstName": "",
      "form_data": { "firstName": "Nested" }
    })));
    assert_eq!(identity.first_name, "Nested");
  }

  #[test]
  fn legacy_aliases_are_last_resort() {
    let identity = normalize(&source(json!({
      "firstname": "Pedro",
      "lastname": "Reyes",
      "dob": "1948-07-04",
      "senior_id": "SCID-000010"
    })));
    assert_eq!(identity.first_name, "Pedro");
    assert_eq!(identity.birth_date, "1948-07-04");
    assert_eq!(identity.senior_id_number, "SCID-000010");
    assert_eq!(identity.full_name, "Pedro Reyes");
  }

  #[test]
  fn string_encoded_form_payload_is_decoded() {
    let identity = normalize(&source(json!({
      "formData": "{\"firstName\":\"Rosa\",\"lastName\":\"Lim\"}"
    })));
    assert_eq!(identity.first_name, "Rosa");
    assert_eq!(identity.last_name, "Lim");
  }

  #[test]
  fn explicit_full_name_beats_synthesis() {
    let identity = normalize(&source(json!({
      "fullname": "LIM, ROSA",
      "first_name": "Rosa",
      "last_name": "Lim"
    })));
    assert_eq!(identity.full_name, "LIM, ROSA");
  }

  #[test]
  fn defaults_status_and_citizenship() {
    let identity = normalize(&source(json!({ "first_name": "Rosa" })));
    assert_eq!(identity.status, "Pending");
    assert_eq!(identity.form_data.citizenship.as_deref(), Some("Filipino"));
  }

  #[test]
  fn form_data_is_dual_keyed() {
    let identity = normalize(&source(json!({
      "first_name": "Rosa",
      "last_name": "Lim",
      "birthdate": "1950-02-02",
      "id_status": "Approved",
      "scid_number": "SCID-000002"
    })));
    let form = serde_json::to_value(&identity.form_data).unwrap();
    assert_eq!(form["firstName"], "Rosa");
    assert_eq!(form["first_name"], "Rosa");
    assert_eq!(form["lastName"], "Lim");
    assert_eq!(form["last_name"], "Lim");
    assert_eq!(form["birthDate"], "1950-02-02");
    assert_eq!(form["birthdate"], "1950-02-02");
    assert_eq!(form["status"], "Approved");
    assert_eq!(form["scid_number"], "SCID-000002");
  }

  // ── Name splitting ──────────────────────────────────────────────────────

  #[test]
  fn comma_form_with_three_given_tokens() {
    let parts = split_full_name("DELA CRUZ, MARIA LUISA SANTOS");
    assert_eq!(parts.last, "DELA CRUZ");
    assert_eq!(parts.first, "MARIA LUISA");
    assert_eq!(parts.middle, "SANTOS");
  }

  #[test]
  fn comma_form_with_two_and_one_given_tokens() {
    let two = split_full_name("REYES, PEDRO GARCIA");
    assert_eq!((two.first.as_str(), two.middle.as_str()), ("PEDRO", "GARCIA"));
    let one = split_full_name("REYES, PEDRO");
    assert_eq!((one.first.as_str(), one.middle.as_str()), ("PEDRO", ""));
  }

  #[test]
  fn spaced_form_by_token_count() {
    let five = split_full_name("MARIA LUISA SANTOS DELA CRUZ");
    assert_eq!(five.first, "MARIA LUISA");
    assert_eq!(five.middle, "SANTOS");
    assert_eq!(five.last, "DELA CRUZ");

    let four = split_full_name("MARIA LUISA SANTOS CRUZ");
    assert_eq!(
      (four.first.as_str(), four.middle.as_str(), four.last.as_str()),
      ("MARIA LUISA", "SANTOS", "CRUZ")
    );

    let three = split_full_name("JUAN SANTOS CRUZ");
    assert_eq!(
      (three.first.as_str(), three.middle.as_str(), three.last.as_str()),
      ("JUAN", "SANTOS", "CRUZ")
    );

    let two = split_full_name("JUAN CRUZ");
    assert_eq!((two.first.as_str(), two.middle.as_str(), two.last.as_str()), ("JUAN", "", "CRUZ"));

    let one = split_full_name("JUAN");
    assert_eq!(one, NameParts { first: "JUAN".into(), ..NameParts::default() });
  }
}
