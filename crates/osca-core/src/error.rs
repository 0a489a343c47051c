//! Error types for `osca-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A masterlist status label outside the known set.
  #[error("Invalid ID Status: {0:?}")]
  InvalidIdStatus(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
