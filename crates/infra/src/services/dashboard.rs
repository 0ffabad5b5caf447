use serde::Serialize;

use memberportal_access::{
    Section, SectionAccess, SectionPartition, Tier, TierHolder, upgrade_options,
};
use memberportal_core::UserId;

use super::ServiceError;
use super::profile::ProfileService;
use crate::record_store::RecordStore;

/// Upgrade prompt for one restricted section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionNotice {
    pub section_id: String,
    pub message: String,
}

/// Everything the member dashboard renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub user_id: UserId,
    pub display_name: String,
    pub tier: Tier,
    pub sections: SectionPartition,
    pub notices: Vec<SectionNotice>,
    pub upgrade_options: Vec<Tier>,
}

/// Builds member dashboards from profiles and the section policy table.
pub struct DashboardService<S> {
    profiles: ProfileService<S>,
    sections: SectionAccess,
}

impl<S> DashboardService<S>
where
    S: RecordStore,
{
    pub fn new(store: S) -> Self {
        Self::with_sections(store, SectionAccess::default())
    }

    pub fn with_sections(store: S, sections: SectionAccess) -> Self {
        Self {
            profiles: ProfileService::new(store),
            sections,
        }
    }

    pub fn dashboard(&self, user_id: UserId) -> Result<DashboardView, ServiceError> {
        let profile = self.profiles.get(user_id)?;
        let raw_tier = profile.membership_tier();

        let all: Vec<Section> = self
            .sections
            .policies()
            .iter()
            .map(|p| Section::new(p.id, p.name))
            .collect();
        let sections = self.sections.ordered_sections(all, raw_tier);

        let notices = sections
            .restricted
            .iter()
            .map(|s| SectionNotice {
                section_id: s.id.clone(),
                message: self.sections.restriction_message(&s.id, raw_tier),
            })
            .collect();

        let view = DashboardView {
            user_id,
            display_name: profile.display_name.clone(),
            tier: profile.canonical_tier(),
            notices,
            upgrade_options: upgrade_options(raw_tier),
            sections,
        };

        tracing::debug!(
            %user_id,
            tier = %view.tier,
            accessible = view.sections.accessible.len(),
            restricted = view.sections.restricted.len(),
            "dashboard built"
        );

        Ok(view)
    }
}
