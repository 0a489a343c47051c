//! Client-side session storage: a string key/value slot holding the
//! serialised current user and an auth-token placeholder.

use std::collections::BTreeMap;

use osca_core::user::User;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Key under which the current user is stored as JSON.
pub const CURRENT_USER_KEY: &str = "osca_current_user";
/// Reserved for a bearer token. Login never issues one.
pub const AUTH_TOKEN_KEY: &str = "osca_auth_token";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSlot {
  values: BTreeMap<String, String>,
}

impl SessionSlot {
  pub fn get(&self, key: &str) -> Option<&str> { self.values.get(key).map(String::as_str) }

  pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
    self.values.insert(key.into(), value.into());
  }

  pub fn persist_user(&mut self, user: &User) -> Result<()> {
    self.set(CURRENT_USER_KEY, serde_json::to_string(user)?);
    Ok(())
  }

  pub fn restore_user(&self) -> Result<Option<User>> {
    self
      .get(CURRENT_USER_KEY)
      .map(serde_json::from_str::<User>)
      .transpose()
      .map_err(Into::into)
  }

  /// Drop both session keys.
  pub fn clear(&mut self) {
    self.values.remove(CURRENT_USER_KEY);
    self.values.remove(AUTH_TOKEN_KEY);
  }
}
