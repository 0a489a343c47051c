//! JSON REST API for the OSCA portal.
//!
//! Exposes an axum [`Router`] backed by any [`osca_core::store::PortalStore`].
//! Write endpoints answer with `{"ok": true, "data": ...}`; every failure
//! answers with `{"ok": false, "error": "..."}`. Auth and TLS are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", osca_api::api_router(store.clone()))
//! ```

pub mod applications;
pub mod complaints;
pub mod error;
pub mod masterlist;
pub mod notify;
pub mod outcome;
pub mod registry;
pub mod session;
pub mod sync;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, patch, post},
};
use osca_core::store::PortalStore;

pub use error::ApiError;

/// Build the API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: PortalStore + 'static,
{
  Router::new()
    // Applications
    .route(
      "/applications",
      get(applications::list::<S>).post(applications::submit::<S>),
    )
    .route("/applications/{id}", patch(applications::edit::<S>))
    .route("/applications/{id}/status", post(applications::transition::<S>))
    .route("/applications/{id}/issue", post(applications::issue::<S>))
    .route(
      "/id-issuances",
      get(applications::list_issuances::<S>).post(applications::submit_issuance::<S>),
    )
    // Masterlist and users
    .route("/masterlist", get(masterlist::list::<S>))
    .route("/users", get(users::list::<S>))
    .route("/users/{id}", patch(users::update::<S>))
    // Session
    .route("/session", get(session::current::<S>))
    .route("/session/login", post(session::login::<S>))
    .route("/session/logout", post(session::logout::<S>))
    .route(
      "/action-error",
      get(session::action_error::<S>).delete(session::clear_action_error::<S>),
    )
    .route("/otp", post(session::otp))
    // Complaints and registry
    .route("/complaints", get(complaints::list::<S>).post(complaints::create::<S>))
    .route("/registry", get(registry::list::<S>))
    .route("/registry/{id}", get(registry::verify::<S>))
    .route("/registry/{id}/draft", get(registry::draft::<S>))
    // Sync
    .route("/sync", post(sync::handler::<S>))
    .with_state(store)
}
