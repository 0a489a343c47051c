//! Users: administrative actors and the login view derived for citizens.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::masterlist::MasterlistRecord;

/// Domain used for citizens who have no e-mail on file.
pub const CITIZEN_EMAIL_DOMAIN: &str = "citizen.osca.gov";

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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
  /// Derived from the masterlist at login; never stored in the user list.
  Citizen,
  Admin,
  SuperAdmin,
  Encoder,
  Approver,
}

/// An authenticated actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:               String,
  pub name:             String,
  pub role:             Role,
  #[serde(default)]
  pub email:            String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub first_name:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub middle_name:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub last_name:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub suffix:           Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub avatar_url:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub birth_date:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address:          Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub senior_id_number: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub contact_number:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub username:         Option<String>,
  /// Plaintext; login is a direct comparison.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub password:         Option<String>,
}

impl User {
  /// The login view for a citizen whose credentials live on their masterlist
  /// record.
  pub fn citizen_from(record: &MasterlistRecord) -> Self {
    let username = record.username.clone().unwrap_or_default();
    let email = if record.email.is_empty() {
      format!("{username}@{CITIZEN_EMAIL_DOMAIN}")
    } else {
      record.email.clone()
    };
    Self {
      id: record.id.clone(),
      name: record.full_name.clone(),
      role: Role::Citizen,
      email,
      first_name: None,
      middle_name: None,
      last_name: None,
      suffix: None,
      avatar_url: None,
      birth_date: None,
      address: None,
      senior_id_number: None,
      contact_number: None,
      username: Some(username),
      password: record.password.clone(),
    }
  }

  /// True if `username` and `password` both match exactly.
  pub fn has_credentials(&self, username: &str, password: &str) -> bool {
    self.username.as_deref() == Some(username)
      && self.password.as_deref() == Some(password)
  }
}

/// A shallow profile update; present fields replace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
  pub name:           Option<String>,
  pub email:          Option<String>,
  pub first_name:     Option<String>,
  pub middle_name:    Option<String>,
  pub last_name:      Option<String>,
  pub suffix:         Option<String>,
  pub avatar_url:     Option<String>,
  pub birth_date:     Option<String>,
  pub address:        Option<String>,
  pub contact_number: Option<String>,
  pub password:       Option<String>,
}

impl UserPatch {
  pub fn apply_to(&self, user: &mut User) {
    if let Some(name) = &self.name {
      user.name = name.clone();
    }
    if let Some(email) = &self.email {
      user.email = email.clone();
    }
    for (slot, value) in [
      (&mut user.first_name, &self.first_name),
      (&mut user.middle_name, &self.middle_name),
      (&mut user.last_name, &self.last_name),
      (&mut user.suffix, &self.suffix),
      (&mut user.avatar_url, &self.avatar_url),
      (&mut user.birth_date, &self.birth_date),
      (&mut user.address, &self.address),
      (&mut user.contact_number, &self.contact_number),
      (&mut user.password, &self.password),
    ] {
      if value.is_some() {
        slot.clone_from(value);
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::masterlist::IdStatus;

  #[test]
  fn roles_use_screaming_case() {
    assert_eq!(serde_json::to_value(Role::SuperAdmin).unwrap(), "SUPER_ADMIN");
    assert_eq!("APPROVER".parse::<Role>().unwrap(), Role::Approver);
  }

  #[test]
  fn citizen_view_falls_back_to_generated_email() {
    let mut record = MasterlistRecord::blank("m_1", IdStatus::New);
    record.full_name = "DELA CRUZ, JUAN".into();
    record.username = Some("jdelacruz1234".into());
    record.password = Some("abcd1234".into());

    let user = User::citizen_from(&record);
    assert_eq!(user.role, Role::Citizen);
    assert_eq!(user.email, "jdelacruz1234@citizen.osca.gov");
    assert_eq!(user.name, "DELA CRUZ, JUAN");
    assert!(user.has_credentials("jdelacruz1234", "abcd1234"));
    assert!(!user.has_credentials("jdelacruz1234", "wrong"));
  }
}
