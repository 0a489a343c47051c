//! Applications: submitted requests for registration, ID actions, benefits
//! and PhilHealth facilitation.
//!
//! Applications live in one of two collections (general applications or ID
//! issuances). They are never deleted; their status moves through
//! `Pending → Approved | Rejected → Released`, and `Rejected` may be reverted
//! to `Pending`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumString};

use crate::masterlist::MatchKey;

// ─── Enumerations ────────────────────────────────────────────────────────────

/// What the applicant is asking for.
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
pub enum ApplicationType {
  Registration,
  #[serde(rename = "New ID")]
  #[strum(serialize = "New ID")]
  IdNew,
  #[serde(rename = "ID Renewal")]
  #[strum(serialize = "ID Renewal")]
  IdRenewal,
  #[serde(rename = "ID Replacement")]
  #[strum(serialize = "ID Replacement")]
  IdReplacement,
  #[serde(rename = "Cash Gift")]
  #[strum(serialize = "Cash Gift")]
  CashGift,
  #[serde(rename = "Medical Assistance")]
  #[strum(serialize = "Medical Assistance")]
  MedicalAssistance,
  PhilHealth,
}

impl ApplicationType {
  /// Registration and ID flows carry a citizen identity: approving them
  /// issues an SCID and they drive the masterlist projection. Benefit and
  /// PhilHealth requests only change their own status.
  pub fn tracks_identity(self) -> bool {
    matches!(
      self,
      Self::Registration | Self::IdNew | Self::IdRenewal | Self::IdReplacement
    )
  }
}

/// Where an application sits in its review lifecycle.
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
pub enum ApplicationStatus {
  Pending,
  Approved,
  Rejected,
  /// Card or benefit handed over. Serialised as `"Released"`.
  #[serde(rename = "Released")]
  #[strum(serialize = "Released")]
  Issued,
}

/// Which collection an application belongs to. Ids are not scoped by
/// collection, so lookups check both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
  Applications,
  IdIssuances,
}

impl Collection {
  /// Prefix used when minting ids for records in this collection.
  pub fn id_prefix(self) -> &'static str {
    match self {
      Self::Applications => "app",
      Self::IdIssuances => "iss",
    }
  }
}

// ─── Form payload ────────────────────────────────────────────────────────────

/// The applicant fields captured with a submission.
///
/// Every known field is optional; keys outside the known set are kept in
/// `extra` so nothing submitted is dropped. `scid_number` keeps its
/// snake_case key for display compatibility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormData {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub first_name:               Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub middle_name:              Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub last_name:                Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub suffix:                   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub birth_date:               Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub birth_place:              Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub sex:                      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub citizenship:              Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub civil_status:             Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address:                  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub house_no:                 Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub street:                   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub barangay:                 Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub district:                 Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub city:                     Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub province:                 Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub contact_number:           Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email:                    Option<String>,
  #[serde(
    default,
    rename = "scid_number",
    skip_serializing_if = "Option::is_none"
  )]
  pub scid_number:              Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub emergency_contact_person: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub emergency_contact_number: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub join_federation:          Option<bool>,
  /// Selfie capture as a data URL.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub captured_image:           Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub living_arrangement:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub is_pensioner:             Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pension_source:           Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pension_amount:           Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub has_illness:              Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub illness_details:          Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub benefit_program:          Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub remarks:                  Option<String>,
  #[serde(flatten)]
  pub extra:                    Map<String, Value>,
}

/// Borrow an optional string field, treating `None` as empty.
pub(crate) fn text(field: &Option<String>) -> &str {
  field.as_deref().unwrap_or("")
}

impl FormData {
  /// The SCID number frozen into this form, if any.
  pub fn scid(&self) -> Option<&str> {
    self.scid_number.as_deref().filter(|s| !s.is_empty())
  }

  /// The composite key used to match this applicant against the masterlist.
  pub fn match_key(&self) -> MatchKey {
    MatchKey::new(
      text(&self.last_name),
      text(&self.first_name),
      text(&self.middle_name),
      text(&self.birth_date),
    )
  }

  /// Shallow merge: every field present in `patch` replaces the field here.
  pub fn merged(mut self, patch: FormData) -> FormData {
    macro_rules! take {
      ($($field:ident),* $(,)?) => {
        $( if patch.$field.is_some() { self.$field = patch.$field; } )*
      };
    }
    take!(
      first_name,
      middle_name,
      last_name,
      suffix,
      birth_date,
      birth_place,
      sex,
      citizenship,
      civil_status,
      address,
      house_no,
      street,
      barangay,
      district,
      city,
      province,
      contact_number,
      email,
      scid_number,
      emergency_contact_person,
      emergency_contact_number,
      join_federation,
      captured_image,
      living_arrangement,
      is_pensioner,
      pension_source,
      pension_amount,
      has_illness,
      illness_details,
      benefit_program,
      remarks,
    );
    self.extra.extend(patch.extra);
    self
  }
}

// ─── Application ─────────────────────────────────────────────────────────────

/// One submitted request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
  pub id:               String,
  /// Owner reference. Weak: it may not resolve to a live user.
  pub user_id:          String,
  #[serde(default)]
  pub user_name:        String,
  #[serde(rename = "type")]
  pub kind:             ApplicationType,
  pub date:             NaiveDate,
  pub status:           ApplicationStatus,
  #[serde(default)]
  pub description:      String,
  #[serde(default)]
  pub documents:        Vec<String>,
  /// Always present; empty unless the last transition supplied a reason.
  #[serde(default)]
  pub rejection_reason: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub released_date:    Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub form_data:        Option<FormData>,
}

/// Input to the submit operations. The store assigns `id`, `date` and (unless
/// pre-approved) `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
  #[serde(default)]
  pub user_id:     String,
  #[serde(default)]
  pub user_name:   String,
  #[serde(rename = "type")]
  pub kind:        ApplicationType,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub documents:   Vec<String>,
  #[serde(default)]
  pub form_data:   Option<FormData>,
  /// Automated flows may submit an already-approved application. Ignored
  /// for ID issuances, which always start out pending.
  #[serde(default)]
  pub status:      Option<ApplicationStatus>,
}

impl NewApplication {
  /// Convenience constructor with all optional fields empty.
  pub fn new(
    user_id: impl Into<String>,
    kind: ApplicationType,
    form_data: FormData,
  ) -> Self {
    Self {
      user_id: user_id.into(),
      user_name: String::new(),
      kind,
      description: String::new(),
      documents: Vec::new(),
      form_data: Some(form_data),
      status: None,
    }
  }
}

/// A partial update for [`crate::store::PortalStore::edit_application`].
///
/// Top-level fields replace; `form_data` is merged into the existing form.
/// `id_status` is kept as raw text so an out-of-range value can be rejected
/// by the store rather than by deserialisation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPatch {
  #[serde(default)]
  pub user_name:   Option<String>,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub documents:   Option<Vec<String>>,
  #[serde(default)]
  pub form_data:   Option<FormData>,
  #[serde(default, rename = "id_status")]
  pub id_status:   Option<String>,
}

impl ApplicationPatch {
  /// Apply the top-level replacements and form merge to `app`.
  pub fn apply_to(&self, app: &mut Application) {
    if let Some(user_name) = &self.user_name {
      app.user_name = user_name.clone();
    }
    if let Some(description) = &self.description {
      app.description = description.clone();
    }
    if let Some(documents) = &self.documents {
      app.documents = documents.clone();
    }
    if let Some(patch) = &self.form_data {
      let base = app.form_data.take().unwrap_or_default();
      app.form_data = Some(base.merged(patch.clone()));
    }
  }
}
