//! Portal services: the record store composed with the tier access model.
//!
//! Services fetch rows, decode them into domain types and hand them to
//! `memberportal-access` / `memberportal-content` for every visibility
//! decision. They never compare tier strings themselves.

pub mod content;
pub mod dashboard;
pub mod profile;

pub use content::ContentService;
pub use dashboard::{DashboardService, DashboardView, SectionNotice};
pub use profile::{MemberProfile, PROFILES_TABLE, ProfileService};

use thiserror::Error;

use memberportal_content::ContentKind;
use memberportal_core::{DomainError, RecordId, UserId};

use crate::record_store::StoreError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("member {0} not found")]
    MemberNotFound(UserId),

    #[error("{kind} {id} not found")]
    ContentNotFound { kind: ContentKind, id: RecordId },

    #[error("stored row could not be decoded: {0}")]
    Decode(String),
}
