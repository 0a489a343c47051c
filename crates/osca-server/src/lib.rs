//! HTTP server assembly for the OSCA portal.
//!
//! Mounts the JSON API from [`osca_api`] under `/api`, traces every request,
//! and builds a [`MemoryStore`] from configuration.

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use osca_core::store::PortalStore;
use osca_store_memory::{MemoryStore, Seed};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::info;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `OSCA_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:      String,
  #[serde(default = "default_port")]
  pub port:      u16,
  /// JSON seed document; absent means every collection starts empty.
  #[serde(default)]
  pub seed_path: Option<PathBuf>,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

// ─── Store ───────────────────────────────────────────────────────────────────

/// Open the in-memory store, seeded from `seed_path` when configured.
pub fn build_store(config: &ServerConfig) -> osca_store_memory::Result<MemoryStore> {
  let seed = match &config.seed_path {
    Some(path) => {
      info!(path = %path.display(), "loading seed");
      Seed::load(path)?
    }
    None => Seed::default(),
  };
  Ok(MemoryStore::new(seed))
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full application router over `store`.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: PortalStore + 'static,
{
  Router::new()
    .route("/health", get(|| async { "ok" }))
    .nest("/api", osca_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}
