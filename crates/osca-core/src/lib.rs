//! Core types and rules for the OSCA senior-citizen portal.
//!
//! This crate holds the domain model (applications, masterlist records,
//! users), the record normalizer, the identifier generators and the
//! masterlist projection. It has no HTTP or runtime dependencies; storage
//! backends implement [`store::PortalStore`].

// Store implementations write the trait methods as plain `async fn`.
#![allow(async_fn_in_trait)]

pub mod application;
pub mod clock;
pub mod complaint;
pub mod dates;
pub mod error;
pub mod ident;
pub mod masterlist;
pub mod normalize;
pub mod outcome;
pub mod projection;
pub mod registry;
pub mod store;
pub mod trim;
pub mod user;

pub use error::{Error, Result};
pub use outcome::ActionOutcome;
