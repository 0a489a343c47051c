//! The in-memory implementation of [`PortalStore`].

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use osca_core::{
  application::{
    Application, ApplicationPatch, ApplicationStatus, Collection, FormData,
    NewApplication,
  },
  clock::{Clock, SystemClock},
  complaint::{Complaint, ComplaintStatus, NewComplaint},
  ident::{CredentialGenerator, RandomCredentials, next_record_id, next_scid},
  masterlist::{IdStatus, MasterlistRecord},
  normalize::normalize,
  projection::{Approval, MasterlistProjection, ProjectionEffect, Trigger, find_match},
  registry::RegistryRecord,
  store::PortalStore,
  trim::DeepTrim,
  user::{User, UserPatch},
};

use crate::{Error, Result, Seed, SessionSlot};

// ─── State ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct State {
  applications: Vec<Application>,
  id_issuances: Vec<Application>,
  masterlist:   Vec<MasterlistRecord>,
  users:        Vec<User>,
  complaints:   Vec<Complaint>,
  registry:     Vec<RegistryRecord>,
  current_user: Option<User>,
  action_error: Option<String>,
  session:      SessionSlot,
}

impl State {
  fn collection(&self, collection: Collection) -> &Vec<Application> {
    match collection {
      Collection::Applications => &self.applications,
      Collection::IdIssuances => &self.id_issuances,
    }
  }

  fn collection_mut(&mut self, collection: Collection) -> &mut Vec<Application> {
    match collection {
      Collection::Applications => &mut self.applications,
      Collection::IdIssuances => &mut self.id_issuances,
    }
  }

  /// Ids are not scoped by collection; general applications are searched
  /// first.
  fn locate(&self, id: &str) -> Option<(Collection, usize)> {
    [Collection::Applications, Collection::IdIssuances]
      .into_iter()
      .find_map(|c| {
        self
          .collection(c)
          .iter()
          .position(|a| a.id == id)
          .map(|idx| (c, idx))
      })
  }

  fn application_id_taken(&self, id: &str) -> bool {
    self.applications.iter().any(|a| a.id == id)
      || self.id_issuances.iter().any(|a| a.id == id)
  }

  fn masterlist_id_taken(&self, id: &str) -> bool { self.masterlist.iter().any(|r| r.id == id) }

  /// The SCID for an approval: the one already on the form, else the one on
  /// the citizen's masterlist record, else the next in sequence.
  fn resolve_scid(&self, user_id: &str, form: &FormData) -> String {
    if let Some(scid) = form.scid() {
      return scid.to_owned();
    }
    find_match(&self.masterlist, user_id, &form.match_key())
      .map(|idx| &self.masterlist[idx])
      .filter(|r| r.has_scid())
      .map(|r| r.scid_number.clone())
      .unwrap_or_else(|| next_scid(&self.masterlist))
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A portal store held entirely in memory.
///
/// Clones share the same state.
#[derive(Clone)]
pub struct MemoryStore {
  state:       Arc<Mutex<State>>,
  clock:       Arc<dyn Clock>,
  credentials: Arc<dyn CredentialGenerator>,
}

impl MemoryStore {
  /// A store seeded from `seed`, using the wall clock and OS randomness.
  pub fn new(seed: Seed) -> Self {
    Self::with_generators(seed, Arc::new(SystemClock), Arc::new(RandomCredentials))
  }

  /// A store with injected time and credential sources.
  pub fn with_generators(
    seed: Seed,
    clock: Arc<dyn Clock>,
    credentials: Arc<dyn CredentialGenerator>,
  ) -> Self {
    let now = clock.now();
    let mut state = State {
      applications: seed.applications,
      id_issuances: seed.id_issuances,
      users: seed.users,
      complaints: seed.complaints,
      registry: seed.registry_records,
      ..State::default()
    };
    for row in &seed.masterlist {
      let id = match row.column.id.as_deref() {
        Some(id) if !id.is_empty() => id.to_owned(),
        _ => next_record_id("m", now, |id| state.masterlist_id_taken(id)),
      };
      let mut record = MasterlistRecord::from_identity(id, normalize(row));
      record.username = row.column.username.clone();
      record.password = row.column.password.clone();
      state.masterlist.push(record);
    }
    info!(
      applications = state.applications.len(),
      id_issuances = state.id_issuances.len(),
      masterlist = state.masterlist.len(),
      users = state.users.len(),
      "memory store seeded"
    );

    Self {
      state: Arc::new(Mutex::new(state)),
      clock,
      credentials,
    }
  }

  /// Adopt a previously persisted session, restoring its current user.
  pub async fn restore_session(&self, slot: SessionSlot) -> Result<Option<User>> {
    let mut state = self.state.lock().await;
    let user = slot.restore_user()?;
    state.current_user = user.clone();
    state.session = slot;
    Ok(user)
  }

  /// A copy of the session slot, for persisting between runs.
  pub async fn session(&self) -> SessionSlot { self.state.lock().await.session.clone() }

  fn project(&self, state: &mut State, user_id: &str, form: &FormData, trigger: Trigger) {
    let effect = MasterlistProjection::new(&mut state.masterlist, self.credentials.as_ref())
      .merge(user_id, form, trigger);
    match effect {
      ProjectionEffect::Created(idx) => {
        let record = &state.masterlist[idx];
        info!(id = %record.id, scid = %record.scid_number, "masterlist record created");
      }
      ProjectionEffect::Updated(idx) => {
        let record = &state.masterlist[idx];
        info!(id = %record.id, id_status = %record.id_status, "masterlist record updated");
      }
      ProjectionEffect::Unchanged => debug!(user_id, "no masterlist record to update"),
    }
  }

  /// Insert a trimmed application at the head of `collection`.
  fn insert(
    &self,
    state: &mut State,
    collection: Collection,
    input: NewApplication,
  ) -> Application {
    let input = input.trimmed();
    let now = self.clock.now();
    let id = next_record_id(collection.id_prefix(), now, |id| {
      state.application_id_taken(id)
    });
    let app = Application {
      id,
      user_id: input.user_id,
      user_name: input.user_name,
      kind: input.kind,
      date: self.clock.today(),
      status: ApplicationStatus::Pending,
      description: input.description,
      documents: input.documents,
      rejection_reason: String::new(),
      released_date: None,
      form_data: input.form_data,
    };
    state.collection_mut(collection).insert(0, app.clone());
    info!(id = %app.id, kind = %app.kind, ?collection, "application submitted");
    app
  }

  fn apply_transition(
    &self,
    state: &mut State,
    id: &str,
    status: ApplicationStatus,
    reason: Option<String>,
  ) -> Option<Application> {
    let Some((collection, idx)) = state.locate(id) else {
      warn!(id, %status, "transition for unknown application");
      return None;
    };
    if status == ApplicationStatus::Issued {
      state.collection_mut(collection)[idx].rejection_reason = reason.unwrap_or_default();
      return Some(self.apply_release(state, collection, idx));
    }

    // The projection is fed the form as it was before this transition.
    let (user_id, prior_form, tracks_identity, scid) = {
      let app = &state.collection(collection)[idx];
      let tracks_identity = app.kind.tracks_identity();
      let scid = match (&app.form_data, status) {
        (Some(form), ApplicationStatus::Approved) if tracks_identity => {
          Some(state.resolve_scid(&app.user_id, form))
        }
        _ => None,
      };
      (app.user_id.clone(), app.form_data.clone(), tracks_identity, scid)
    };

    let app = &mut state.collection_mut(collection)[idx];
    app.status = status;
    app.rejection_reason = reason.unwrap_or_default();
    if let (Some(scid), Some(form)) = (&scid, app.form_data.as_mut())
      && form.scid().is_none()
    {
      form.scid_number = Some(scid.clone());
    }
    app.deep_trim();
    let updated = app.clone();
    info!(id, %status, ?collection, "application status changed");

    if tracks_identity && let Some(form) = &prior_form {
      let trigger = match status {
        ApplicationStatus::Approved => {
          let new_record_id = if user_id.is_empty() {
            next_record_id("m", self.clock.now(), |id| state.masterlist_id_taken(id))
          } else {
            user_id.clone()
          };
          Some(Trigger::Approved(Approval {
            origin: collection,
            scid: scid.unwrap_or_default(),
            new_record_id,
          }))
        }
        ApplicationStatus::Rejected => Some(Trigger::Rejected),
        ApplicationStatus::Pending | ApplicationStatus::Issued => None,
      };
      if let Some(trigger) = trigger {
        self.project(state, &user_id, form, trigger);
      }
    }

    Some(updated)
  }

  /// Release an application; the same instant goes on the application and
  /// on the citizen's masterlist record.
  fn apply_release(&self, state: &mut State, collection: Collection, idx: usize) -> Application {
    let at = self.clock.now();
    let app = &mut state.collection_mut(collection)[idx];
    app.status = ApplicationStatus::Issued;
    app.released_date = Some(at);
    let updated = app.clone();
    info!(id = %updated.id, released = %at, "application released");

    if updated.kind.tracks_identity()
      && let Some(form) = &updated.form_data
    {
      self.project(state, &updated.user_id, form, Trigger::Released { at });
    }
    updated
  }
}

// ─── PortalStore impl ────────────────────────────────────────────────────────

impl PortalStore for MemoryStore {
  type Error = Error;

  // ── Read collections ──────────────────────────────────────────────────────

  async fn applications(&self) -> Result<Vec<Application>> {
    Ok(self.state.lock().await.applications.clone())
  }

  async fn id_issuances(&self) -> Result<Vec<Application>> {
    Ok(self.state.lock().await.id_issuances.clone())
  }

  async fn masterlist(&self) -> Result<Vec<MasterlistRecord>> {
    Ok(self.state.lock().await.masterlist.clone())
  }

  async fn users(&self) -> Result<Vec<User>> { Ok(self.state.lock().await.users.clone()) }

  async fn complaints(&self) -> Result<Vec<Complaint>> {
    Ok(self.state.lock().await.complaints.clone())
  }

  async fn registry_records(&self) -> Result<Vec<RegistryRecord>> {
    Ok(self.state.lock().await.registry.clone())
  }

  async fn senior_registry_candidates(&self, reference: NaiveDate) -> Result<Vec<RegistryRecord>> {
    let state = self.state.lock().await;
    Ok(
      state
        .registry
        .iter()
        .filter(|r| r.is_senior_candidate(reference))
        .cloned()
        .collect(),
    )
  }

  async fn action_error(&self) -> Result<Option<String>> {
    Ok(self.state.lock().await.action_error.clone())
  }

  async fn set_action_error(&self, message: Option<String>) -> Result<()> {
    self.state.lock().await.action_error = message;
    Ok(())
  }

  // ── Application lifecycle ─────────────────────────────────────────────────

  async fn submit_application(&self, input: NewApplication) -> Result<Application> {
    let requested = input.status.unwrap_or(ApplicationStatus::Pending);
    let mut state = self.state.lock().await;
    let app = self.insert(&mut state, Collection::Applications, input);
    if requested == ApplicationStatus::Pending {
      return Ok(app);
    }
    // Pre-approved submissions go through the regular transition so they
    // receive an SCID and a masterlist record like any other approval.
    Ok(
      self
        .apply_transition(&mut state, &app.id, requested, None)
        .unwrap_or(app),
    )
  }

  async fn submit_id_issuance(&self, input: NewApplication) -> Result<Application> {
    let mut state = self.state.lock().await;
    let app = self.insert(&mut state, Collection::IdIssuances, input);
    if app.kind.tracks_identity()
      && let Some(form) = &app.form_data
    {
      self.project(&mut state, &app.user_id, form, Trigger::IssuanceRequested);
    }
    Ok(app)
  }

  async fn transition_status(
    &self,
    id: &str,
    status: ApplicationStatus,
    reason: Option<String>,
  ) -> Result<Option<Application>> {
    let mut state = self.state.lock().await;
    Ok(self.apply_transition(&mut state, id, status, reason))
  }

  async fn edit_application(
    &self,
    id: &str,
    patch: ApplicationPatch,
  ) -> Result<Option<Application>> {
    let mut state = self.state.lock().await;

    let id_status = match patch.id_status.as_deref().map(IdStatus::parse_label).transpose() {
      Ok(status) => status,
      Err(e) => {
        warn!(id, error = %e, "rejected application edit");
        state.action_error = Some(e.to_string());
        return Err(e.into());
      }
    };

    // Both collections are written; normally only one holds the id.
    let mut updated: Option<Application> = None;
    for collection in [Collection::Applications, Collection::IdIssuances] {
      for app in state.collection_mut(collection).iter_mut().filter(|a| a.id == id) {
        // A SCID frozen into the form survives any patch.
        let frozen = app.form_data.as_ref().and_then(|f| f.scid()).map(str::to_owned);
        patch.apply_to(app);
        if let (Some(scid), Some(form)) = (frozen, app.form_data.as_mut()) {
          form.scid_number = Some(scid);
        }
        app.deep_trim();
        updated.get_or_insert_with(|| app.clone());
      }
    }
    let Some(app) = updated else {
      warn!(id, "edit for unknown application");
      return Ok(None);
    };
    info!(id, "application edited");

    if app.status == ApplicationStatus::Approved
      && app.kind.tracks_identity()
      && let Some(form) = &app.form_data
    {
      self.project(&mut state, &app.user_id, form, Trigger::Edited { id_status });
    }
    Ok(Some(app))
  }

  async fn mark_issued(&self, id: &str) -> Result<Option<Application>> {
    let mut state = self.state.lock().await;
    let Some((collection, idx)) = state.locate(id) else {
      warn!(id, "release for unknown application");
      return Ok(None);
    };
    Ok(Some(self.apply_release(&mut state, collection, idx)))
  }

  // ── Session / identity ────────────────────────────────────────────────────

  async fn login(&self, username: &str, password: &str) -> Result<Option<User>> {
    let mut state = self.state.lock().await;
    let user = state
      .users
      .iter()
      .find(|u| u.has_credentials(username, password))
      .cloned()
      .or_else(|| {
        state
          .masterlist
          .iter()
          .find(|r| {
            r.username.as_deref() == Some(username)
              && r.password.as_deref() == Some(password)
          })
          .map(User::citizen_from)
      });

    match &user {
      Some(user) => {
        state.session.persist_user(user)?;
        state.current_user = Some(user.clone());
        info!(user = %user.id, role = %user.role, "login");
      }
      None => warn!(username, "login failed"),
    }
    Ok(user)
  }

  async fn logout(&self) -> Result<()> {
    let mut state = self.state.lock().await;
    state.current_user = None;
    state.session.clear();
    Ok(())
  }

  async fn current_user(&self) -> Result<Option<User>> {
    Ok(self.state.lock().await.current_user.clone())
  }

  async fn update_user(&self, id: &str, patch: UserPatch) -> Result<Option<User>> {
    let mut state = self.state.lock().await;
    let mut updated = state.users.iter_mut().find(|u| u.id == id).map(|user| {
      patch.apply_to(user);
      user.clone()
    });

    if let Some(current) = state.current_user.as_mut()
      && current.id == id
    {
      patch.apply_to(current);
      let current = current.clone();
      state.session.persist_user(&current)?;
      updated.get_or_insert(current);
    }
    Ok(updated)
  }

  // ── Complaints and registry ───────────────────────────────────────────────

  async fn add_complaint(&self, input: NewComplaint) -> Result<Complaint> {
    let mut state = self.state.lock().await;
    let id = next_record_id("comp", self.clock.now(), |id| {
      state.complaints.iter().any(|c| c.id == id)
    });
    let complaint = Complaint {
      id,
      user_id: input.user_id,
      user_name: input.user_name,
      date: self.clock.today(),
      subject: input.subject,
      details: input.details,
      status: ComplaintStatus::Open,
      ai_summary: None,
    };
    state.complaints.insert(0, complaint.clone());
    Ok(complaint)
  }

  async fn verify_identity(&self, registry_id: &str) -> Result<Option<RegistryRecord>> {
    let state = self.state.lock().await;
    Ok(state.registry.iter().find(|r| r.id == registry_id).cloned())
  }

  // ── Sync placeholders ─────────────────────────────────────────────────────

  async fn sync_applications(&self) -> Result<()> {
    debug!("sync_applications: local data only");
    Ok(())
  }

  async fn sync_id_issuances(&self) -> Result<()> {
    debug!("sync_id_issuances: local data only");
    Ok(())
  }

  async fn fetch_masterlist(&self) -> Result<()> {
    debug!("fetch_masterlist: local data only");
    Ok(())
  }
}
