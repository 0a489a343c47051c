//! The `PortalStore` trait: the read collections and mutation operations the
//! portal UI (or an API gateway) consumes.
//!
//! Every write runs to completion before its future resolves: the owning
//! collection is updated first, then the masterlist projection, then the
//! result is returned. Nothing is left to finish in the background.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  application::{Application, ApplicationPatch, ApplicationStatus, NewApplication},
  complaint::{Complaint, NewComplaint},
  masterlist::MasterlistRecord,
  registry::RegistryRecord,
  user::{User, UserPatch},
};

/// Abstraction over a portal state backend.
///
/// Operations addressed by application id return `Ok(None)` when no
/// application with that id exists in either collection; callers decide
/// whether that is an error.
pub trait PortalStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Read collections ──────────────────────────────────────────────────

  fn applications(
    &self,
  ) -> impl Future<Output = Result<Vec<Application>, Self::Error>> + Send + '_;

  fn id_issuances(
    &self,
  ) -> impl Future<Output = Result<Vec<Application>, Self::Error>> + Send + '_;

  fn masterlist(
    &self,
  ) -> impl Future<Output = Result<Vec<MasterlistRecord>, Self::Error>> + Send + '_;

  fn users(&self) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  fn complaints(
    &self,
  ) -> impl Future<Output = Result<Vec<Complaint>, Self::Error>> + Send + '_;

  fn registry_records(
    &self,
  ) -> impl Future<Output = Result<Vec<RegistryRecord>, Self::Error>> + Send + '_;

  /// Civil-registry rows eligible for senior registration on `reference`.
  fn senior_registry_candidates(
    &self,
    reference: NaiveDate,
  ) -> impl Future<Output = Result<Vec<RegistryRecord>, Self::Error>> + Send + '_;

  /// The last validation message, shared with every consumer.
  fn action_error(
    &self,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;

  fn set_action_error(
    &self,
    message: Option<String>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Application lifecycle ─────────────────────────────────────────────

  /// Trim and store a new general application (prepended). Pending unless
  /// the input is explicitly pre-approved.
  fn submit_application(
    &self,
    input: NewApplication,
  ) -> impl Future<Output = Result<Application, Self::Error>> + Send + '_;

  /// Trim and store a new ID issuance request (prepended, always Pending).
  fn submit_id_issuance(
    &self,
    input: NewApplication,
  ) -> impl Future<Output = Result<Application, Self::Error>> + Send + '_;

  /// Move an application to `status`, issuing an SCID on approval where the
  /// application type requires one, then project the change onto the
  /// masterlist.
  fn transition_status<'a>(
    &'a self,
    id: &'a str,
    status: ApplicationStatus,
    reason: Option<String>,
  ) -> impl Future<Output = Result<Option<Application>, Self::Error>> + Send + 'a;

  /// Merge `patch` into the application in whichever collections hold `id`.
  /// An out-of-range `id_status` fails without mutating anything.
  fn edit_application<'a>(
    &'a self,
    id: &'a str,
    patch: ApplicationPatch,
  ) -> impl Future<Output = Result<Option<Application>, Self::Error>> + Send + 'a;

  /// Mark an application released and stamp the same instant on the
  /// application and the citizen's masterlist record.
  fn mark_issued<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Application>, Self::Error>> + Send + 'a;

  // ── Session / identity ────────────────────────────────────────────────

  /// Match plaintext credentials against admin users, then against citizen
  /// credentials on the masterlist. A match becomes the current user.
  fn login<'a>(
    &'a self,
    username: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn logout(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn current_user(
    &self,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn update_user<'a>(
    &'a self,
    id: &'a str,
    patch: UserPatch,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  // ── Complaints and registry ───────────────────────────────────────────

  fn add_complaint(
    &self,
    input: NewComplaint,
  ) -> impl Future<Output = Result<Complaint, Self::Error>> + Send + '_;

  fn verify_identity<'a>(
    &'a self,
    registry_id: &'a str,
  ) -> impl Future<Output = Result<Option<RegistryRecord>, Self::Error>> + Send + 'a;

  // ── Sync placeholders ─────────────────────────────────────────────────

  /// Placeholders for a networked backend; they change nothing.
  fn sync_applications(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn sync_id_issuances(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn fetch_masterlist(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
