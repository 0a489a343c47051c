//! Time source abstraction so stores can be driven by a fixed clock in tests.

use chrono::{DateTime, NaiveDate, Utc};

/// Supplies the current instant to the store.
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;

  /// The current calendar date (UTC), used for application `date` stamps.
  fn today(&self) -> NaiveDate { self.now().date_naive() }
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> { self.0 }
}
