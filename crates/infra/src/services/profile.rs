use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use memberportal_access::{Tier, TierHolder, normalize_tier};
use memberportal_core::{DomainError, Entity, RecordId, UserId};

use super::ServiceError;
use crate::record_store::{Record, RecordStore, StoreError, to_record};

pub const PROFILES_TABLE: &str = "profiles";

/// A member's profile row.
///
/// `tier` is stored as entered (it may be a legacy name); read it through
/// [`TierHolder`] or [`MemberProfile::canonical_tier`]. Only `is_admin`
/// makes a member Admin; a stored "Admin" tier reads as Free Member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

impl MemberProfile {
    pub fn canonical_tier(&self) -> Tier {
        if self.is_admin {
            Tier::Admin
        } else {
            normalize_tier(self.tier.as_deref())
        }
    }
}

impl TierHolder for MemberProfile {
    fn membership_tier(&self) -> Option<&str> {
        Some(self.canonical_tier().name())
    }
}

impl Entity for MemberProfile {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn row_id(user_id: UserId) -> RecordId {
    RecordId::from_uuid(*user_id.as_uuid())
}

/// Member profile reads and writes.
pub struct ProfileService<S> {
    store: S,
}

impl<S> ProfileService<S>
where
    S: RecordStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn get(&self, user_id: UserId) -> Result<MemberProfile, ServiceError> {
        let row = self
            .store
            .get(PROFILES_TABLE, row_id(user_id))?
            .ok_or(ServiceError::MemberNotFound(user_id))?;
        decode(row)
    }

    pub fn create(&self, profile: &MemberProfile) -> Result<MemberProfile, ServiceError> {
        let stored = self.store.insert(PROFILES_TABLE, to_record(profile)?)?;
        tracing::info!(user_id = %profile.id, tier = %profile.canonical_tier(), "member profile created");
        decode(stored)
    }

    /// Change a member's tier. The new tier must be a recognizable,
    /// purchasable name and is stored in canonical form.
    pub fn set_tier(&self, user_id: UserId, raw_tier: &str) -> Result<MemberProfile, ServiceError> {
        let tier: Tier = raw_tier.parse()?;
        if !tier.is_purchasable() {
            return Err(DomainError::validation(format!(
                "'{raw_tier}' is not a membership tier"
            ))
            .into());
        }

        let mut patch = Record::new();
        patch.insert("tier".to_string(), JsonValue::String(tier.name().to_string()));

        let stored = self
            .store
            .update(PROFILES_TABLE, row_id(user_id), patch)
            .map_err(|err| match err {
                StoreError::NotFound { .. } => ServiceError::MemberNotFound(user_id),
                other => other.into(),
            })?;

        tracing::info!(%user_id, %tier, "member tier changed");
        decode(stored)
    }
}

fn decode(row: Record) -> Result<MemberProfile, ServiceError> {
    serde_json::from_value(JsonValue::Object(row)).map_err(|e| ServiceError::Decode(e.to_string()))
}
