//! `memberportal-access` — the tier access model.
//!
//! Pure, synchronous and total: every function here accepts arbitrary raw
//! tier strings (or nothing at all) and resolves them to a decision without
//! IO, shared state or errors. Anything unrecognized is treated as
//! Free Member, so ambiguous data under-grants rather than over-grants.

pub mod access;
pub mod section;
pub mod tier;

pub use access::{
    AccessDecision, TierHolder, TierRestricted, can_access_tier, explain_tier_access,
    has_tier_access, has_tier_access_for, is_item_accessible,
};
pub use section::{
    DASHBOARD_SECTIONS, Section, SectionAccess, SectionPartition, SectionPolicy,
    ordered_sections, restriction_message, upgrade_options,
};
pub use tier::{Tier, normalize_tier, normalize_tier_with_admin, strip_parenthetical};
