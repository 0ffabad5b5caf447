//! `memberportal-core` — shared domain primitives for the member portal.
//!
//! Pure types only: no storage, no transport, no logging setup.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Entity, Timestamped};
pub use error::{DomainError, DomainResult};
pub use id::{RecordId, UserId};
