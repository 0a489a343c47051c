//! Masterlist projection.
//!
//! Keeps the masterlist in step with application transitions. A transition
//! is matched to a record by the application's `user_id` first, then by the
//! `(full name, birth date)` composite. No fuzzier fallback is attempted.
//!
//! Approvals create or merge; every other trigger only touches a record that
//! already exists. Text written to the masterlist is uppercased and trimmed,
//! except `email` (lowercased), `contact_number` (trimmed only) and the
//! credentials (untouched).

use chrono::{DateTime, Utc};

use crate::{
  application::{Collection, FormData, text},
  ident::{CredentialGenerator, generate_username},
  masterlist::{IdStatus, MasterlistRecord, MatchKey},
};

pub const DEFAULT_CITY: &str = "SAN JUAN CITY";
pub const DEFAULT_PROVINCE: &str = "METRO MANILA";

// ─── Triggers ────────────────────────────────────────────────────────────────

/// An approval that may create a masterlist record.
#[derive(Debug, Clone)]
pub struct Approval {
  /// Which collection the approved application came from. ID issuances
  /// leave the citizen `Approved`; registrations leave them `New`.
  pub origin:        Collection,
  /// The SCID frozen into the application.
  pub scid:          String,
  /// Id for a record created by this approval.
  pub new_record_id: String,
}

/// The event being projected onto the masterlist.
#[derive(Debug, Clone)]
pub enum Trigger {
  Approved(Approval),
  Rejected,
  Released { at: DateTime<Utc> },
  /// A new ID issuance request was filed for the citizen.
  IssuanceRequested,
  /// An approved application's data was edited.
  Edited { id_status: Option<IdStatus> },
}

/// What the projection did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionEffect {
  Created(usize),
  Updated(usize),
  Unchanged,
}

// ─── Matching ────────────────────────────────────────────────────────────────

/// Index of the record for this applicant: exact id match first, then the
/// name + birth date composite. An empty birth date never matches.
pub fn find_match(
  records: &[MasterlistRecord],
  user_id: &str,
  key: &MatchKey,
) -> Option<usize> {
  if !user_id.is_empty()
    && let Some(idx) = records.iter().position(|r| r.id == user_id)
  {
    return Some(idx);
  }
  if key.birth_date.is_empty() {
    return None;
  }
  records
    .iter()
    .position(|r| r.full_name == key.full_name && r.birth_date == key.birth_date)
}

// ─── Projection ──────────────────────────────────────────────────────────────

/// Applies triggers to a masterlist collection.
pub struct MasterlistProjection<'a> {
  records:     &'a mut Vec<MasterlistRecord>,
  credentials: &'a dyn CredentialGenerator,
}

impl<'a> MasterlistProjection<'a> {
  pub fn new(
    records: &'a mut Vec<MasterlistRecord>,
    credentials: &'a dyn CredentialGenerator,
  ) -> Self {
    Self {
      records,
      credentials,
    }
  }

  /// Project `trigger` for the applicant described by `user_id` and `form`.
  pub fn merge(
    &mut self,
    user_id: &str,
    form: &FormData,
    trigger: Trigger,
  ) -> ProjectionEffect {
    let found = find_match(self.records.as_slice(), user_id, &form.match_key());

    match (trigger, found) {
      (Trigger::Approved(approval), Some(idx)) => {
        let record = &mut self.records[idx];
        apply_form(record, form, &approval.scid);
        record.id_status = approved_status(approval.origin);
        fill_credentials(record, form, self.credentials);
        ProjectionEffect::Updated(idx)
      }
      (Trigger::Approved(approval), None) => {
        let mut record = MasterlistRecord::blank(
          approval.new_record_id,
          approved_status(approval.origin),
        );
        apply_form(&mut record, form, &approval.scid);
        fill_credentials(&mut record, form, self.credentials);
        self.records.push(record);
        ProjectionEffect::Created(self.records.len() - 1)
      }
      (Trigger::Rejected, Some(idx)) => {
        self.records[idx].id_status = IdStatus::Rejected;
        ProjectionEffect::Updated(idx)
      }
      (Trigger::Released { at }, Some(idx)) => {
        let record = &mut self.records[idx];
        record.id_status = IdStatus::Released;
        record.released_date = Some(at);
        ProjectionEffect::Updated(idx)
      }
      (Trigger::IssuanceRequested, Some(idx)) => {
        self.records[idx].id_status = IdStatus::Pending;
        ProjectionEffect::Updated(idx)
      }
      (Trigger::Edited { id_status }, Some(idx)) => {
        let record = &mut self.records[idx];
        // An issued SCID is never replaced by an edit.
        let scid = if record.scid_number.is_empty() {
          form.scid().unwrap_or_default().to_owned()
        } else {
          record.scid_number.clone()
        };
        apply_form(record, form, &scid);
        if let Some(status) = id_status {
          record.id_status = status;
        }
        ProjectionEffect::Updated(idx)
      }
      (_, None) => ProjectionEffect::Unchanged,
    }
  }
}

fn approved_status(origin: Collection) -> IdStatus {
  match origin {
    Collection::IdIssuances => IdStatus::Approved,
    Collection::Applications => IdStatus::New,
  }
}

fn upper(value: &str) -> String { value.trim().to_uppercase() }

fn upper_or(value: &Option<String>, default: &str) -> String {
  match text(value).trim() {
    "" => default.to_owned(),
    s => s.to_uppercase(),
  }
}

/// `"<house> <street>, BRGY. <barangay>, <city>, <province>"`, uppercased.
pub fn compose_address(form: &FormData) -> String {
  format!(
    "{} {}, BRGY. {}, {}, {}",
    text(&form.house_no),
    text(&form.street),
    text(&form.barangay),
    upper_or(&form.city, DEFAULT_CITY),
    upper_or(&form.province, DEFAULT_PROVINCE),
  )
  .to_uppercase()
  .trim()
  .to_owned()
}

/// Overwrite every denormalized field from `form`. Credentials, status and
/// release date are left alone.
fn apply_form(record: &mut MasterlistRecord, form: &FormData, scid: &str) {
  let key = form.match_key();
  record.full_name = key.full_name;
  record.first_name = upper(text(&form.first_name));
  record.last_name = upper(text(&form.last_name));
  record.middle_name = upper(text(&form.middle_name));
  record.birth_date = key.birth_date;
  record.birth_place = upper(text(&form.birth_place));
  record.scid_number = scid.to_owned();
  record.senior_id_number = scid.to_owned();
  record.address = compose_address(form);
  record.house_no = upper(text(&form.house_no));
  record.street = upper(text(&form.street));
  record.barangay = upper(text(&form.barangay));
  record.city_municipality = upper_or(&form.city, DEFAULT_CITY);
  record.province = upper_or(&form.province, DEFAULT_PROVINCE);
  record.district = upper(text(&form.district));
  record.email = text(&form.email).trim().to_lowercase();
  record.contact_number = text(&form.contact_number).trim().to_owned();
  record.sex = form.sex.as_deref().map(upper);
  record.civil_status = form.civil_status.as_deref().map(upper);
  let mut snapshot = form.clone();
  if !scid.is_empty() {
    snapshot.scid_number = Some(scid.to_owned());
  }
  record.form_data = Some(snapshot);
}

/// Generate a username and password only where the record has none.
fn fill_credentials(
  record: &mut MasterlistRecord,
  form: &FormData,
  generator: &dyn CredentialGenerator,
) {
  if record.username.as_deref().is_none_or(str::is_empty) {
    record.username = Some(generate_username(
      text(&form.first_name),
      text(&form.last_name),
      generator,
    ));
  }
  if record.password.as_deref().is_none_or(str::is_empty) {
    record.password = Some(generator.password());
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicU16, Ordering};

  use chrono::TimeZone;

  use super::*;

  /// Counts upward so every generated credential is distinct and predictable.
  struct Sequential(AtomicU16);

  impl CredentialGenerator for Sequential {
    fn username_suffix(&self) -> u16 { 1000 + self.0.fetch_add(1, Ordering::SeqCst) }

    fn password(&self) -> String {
      format!("pass{:04}", self.0.fetch_add(1, Ordering::SeqCst))
    }
  }

  fn generator() -> Sequential { Sequential(AtomicU16::new(0)) }

  fn juan() -> FormData {
    FormData {
      first_name: Some("Juan".into()),
      last_name: Some("Dela Cruz".into()),
      middle_name: Some("Santos".into()),
      birth_date: Some("1950-01-01".into()),
      house_no: Some("12".into()),
      street: Some("Wilson St".into()),
      barangay: Some("Greenhills".into()),
      email: Some("  Juan@Example.COM ".into()),
      contact_number: Some(" 09171234567 ".into()),
      sex: Some("male".into()),
      ..FormData::default()
    }
  }

  fn approval(origin: Collection, scid: &str) -> Trigger {
    Trigger::Approved(Approval {
      origin,
      scid: scid.into(),
      new_record_id: "m_1".into(),
    })
  }

  #[test]
  fn first_registration_approval_creates_a_new_record() {
    let mut records = Vec::new();
    let creds = generator();
    let effect = MasterlistProjection::new(&mut records, &creds).merge(
      "u1",
      &juan(),
      approval(Collection::Applications, "SCID-000001"),
    );

    assert_eq!(effect, ProjectionEffect::Created(0));
    let r = &records[0];
    assert_eq!(r.id, "m_1");
    assert_eq!(r.id_status, IdStatus::New);
    assert_eq!(r.full_name, "DELA CRUZ, JUAN SANTOS");
    assert_eq!(r.first_name, "JUAN");
    assert_eq!(r.scid_number, "SCID-000001");
    assert_eq!(r.senior_id_number, "SCID-000001");
    assert_eq!(r.address, "12 WILSON ST, BRGY. GREENHILLS, SAN JUAN CITY, METRO MANILA");
    assert_eq!(r.city_municipality, DEFAULT_CITY);
    assert_eq!(r.email, "juan@example.com");
    assert_eq!(r.contact_number, "09171234567");
    assert_eq!(r.sex.as_deref(), Some("MALE"));
    assert_eq!(r.username.as_deref(), Some("jdelacruz1000"));
    assert_eq!(r.password.as_deref(), Some("pass0001"));
  }

  #[test]
  fn repeated_approval_is_idempotent() {
    let mut records = Vec::new();
    let creds = generator();
    let mut projection = MasterlistProjection::new(&mut records, &creds);
    projection.merge("u1", &juan(), approval(Collection::Applications, "SCID-000001"));
    let after_first = projection.records.clone();
    projection.merge("u1", &juan(), approval(Collection::Applications, "SCID-000001"));
    assert_eq!(*projection.records, after_first);
  }

  #[test]
  fn issuance_approval_keeps_credentials_and_sets_approved() {
    let mut records = Vec::new();
    let creds = generator();
    let mut projection = MasterlistProjection::new(&mut records, &creds);
    projection.merge("u1", &juan(), approval(Collection::Applications, "SCID-000001"));
    let username = projection.records[0].username.clone();
    let password = projection.records[0].password.clone();

    let effect = projection.merge(
      "",
      &juan(),
      approval(Collection::IdIssuances, "SCID-000001"),
    );
    assert_eq!(effect, ProjectionEffect::Updated(0));
    let r = &projection.records[0];
    assert_eq!(r.id_status, IdStatus::Approved);
    assert_eq!(r.username, username);
    assert_eq!(r.password, password);
    assert_eq!(r.id, "m_1");
  }

  #[test]
  fn fallback_match_uses_name_and_birth_date() {
    let mut record = MasterlistRecord::blank("other", IdStatus::Approved);
    record.full_name = "DELA CRUZ, JUAN SANTOS".into();
    record.birth_date = "1950-01-01".into();
    let records = vec![record];

    assert_eq!(find_match(&records, "missing", &juan().match_key()), Some(0));

    let mut no_birth = juan();
    no_birth.birth_date = None;
    assert_eq!(find_match(&records, "missing", &no_birth.match_key()), None);
  }

  #[test]
  fn rejection_without_a_match_writes_nothing() {
    let mut records = Vec::new();
    let creds = generator();
    let effect =
      MasterlistProjection::new(&mut records, &creds).merge("u1", &juan(), Trigger::Rejected);
    assert_eq!(effect, ProjectionEffect::Unchanged);
    assert!(records.is_empty());
  }

  #[test]
  fn rejection_only_touches_status() {
    let mut records = Vec::new();
    let creds = generator();
    let mut projection = MasterlistProjection::new(&mut records, &creds);
    projection.merge("u1", &juan(), approval(Collection::Applications, "SCID-000001"));
    let before = projection.records[0].clone();

    let mut renamed = juan();
    renamed.first_name = Some("Changed".into());
    projection.merge("m_1", &renamed, Trigger::Rejected);

    let after = &projection.records[0];
    assert_eq!(after.id_status, IdStatus::Rejected);
    assert_eq!(after.first_name, before.first_name);
    assert_eq!(after.username, before.username);
  }

  #[test]
  fn release_stamps_the_given_instant() {
    let mut records = Vec::new();
    let creds = generator();
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    let mut projection = MasterlistProjection::new(&mut records, &creds);
    projection.merge("u1", &juan(), approval(Collection::Applications, "SCID-000001"));
    projection.merge("u1", &juan(), Trigger::Released { at });
    assert_eq!(projection.records[0].id_status, IdStatus::Released);
    assert_eq!(projection.records[0].released_date, Some(at));
  }

  #[test]
  fn edit_keeps_existing_scid_when_form_has_none() {
    let mut records = Vec::new();
    let creds = generator();
    let mut projection = MasterlistProjection::new(&mut records, &creds);
    projection.merge("u1", &juan(), approval(Collection::Applications, "SCID-000005"));

    let mut edited = juan();
    edited.street = Some("Ortigas Ave".into());
    projection.merge("u1", &edited, Trigger::Edited {
      id_status: Some(IdStatus::Pending),
    });

    let r = &projection.records[0];
    assert_eq!(r.scid_number, "SCID-000005");
    assert_eq!(r.street, "ORTIGAS AVE");
    assert_eq!(r.id_status, IdStatus::Pending);
  }

  #[test]
  fn edit_cannot_replace_an_issued_scid() {
    let mut records = Vec::new();
    let creds = generator();
    let mut projection = MasterlistProjection::new(&mut records, &creds);
    projection.merge("u1", &juan(), approval(Collection::Applications, "SCID-000002"));

    let mut edited = juan();
    edited.scid_number = Some("SCID-000001".into());
    projection.merge("m_1", &edited, Trigger::Edited { id_status: None });

    assert_eq!(projection.records[0].scid_number, "SCID-000002");
  }
}
