//! In-memory backend for the OSCA portal.
//!
//! All collections live behind a single async mutex. Every write holds the
//! lock from the first read to the last write, so SCID allocation and
//! credential assignment cannot interleave with another writer.

mod session;
mod store;

pub mod error;
pub mod seed;

pub use error::{Error, Result};
pub use seed::Seed;
pub use session::{AUTH_TOKEN_KEY, CURRENT_USER_KEY, SessionSlot};
pub use store::MemoryStore;
