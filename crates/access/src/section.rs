//! Dashboard section gating.
//!
//! Each dashboard section has a policy entry naming the tier it is meant
//! for. Gating is switched per entry with `enforced`; an unenforced entry
//! requires only Free Member, which is how every shipped section is
//! configured today. The nominal tier still drives upgrade messaging.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::tier::{Tier, normalize_tier_with_admin};

/// A dashboard region as the view layer describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub is_restricted: bool,
}

impl Section {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            is_restricted: false,
        }
    }
}

/// Access policy for one section id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct SectionPolicy {
    pub id: &'static str,
    pub name: &'static str,
    pub nominal: Tier,
    pub enforced: bool,
}

impl SectionPolicy {
    pub const fn new(id: &'static str, name: &'static str, nominal: Tier) -> Self {
        Self {
            id,
            name,
            nominal,
            enforced: false,
        }
    }

    pub const fn enforced(mut self) -> Self {
        self.enforced = true;
        self
    }

    /// The tier a member actually needs to open the section.
    pub fn required_tier(&self) -> Tier {
        if self.enforced { self.nominal } else { Tier::Free }
    }
}

/// Sections shipped with the member dashboard.
pub const DASHBOARD_SECTIONS: &[SectionPolicy] = &[
    SectionPolicy::new("overview", "Overview", Tier::Free),
    SectionPolicy::new("updates", "Member Updates", Tier::Free),
    SectionPolicy::new("events", "Events", Tier::Free),
    SectionPolicy::new("opportunities", "Business Opportunities", Tier::Associate),
    SectionPolicy::new("resources", "Resources", Tier::Associate),
    SectionPolicy::new("offers", "Member Offers", Tier::Full),
    SectionPolicy::new("market-intel", "Market Intelligence", Tier::Gold),
];

/// Sections split by whether the member can open them.
///
/// Both lists keep the caller's original relative order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionPartition {
    pub accessible: Vec<Section>,
    pub restricted: Vec<Section>,
}

impl SectionPartition {
    pub fn len(&self) -> usize {
        self.accessible.len() + self.restricted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A section policy table plus the operations that read it.
#[derive(Debug, Clone)]
pub struct SectionAccess {
    policies: Cow<'static, [SectionPolicy]>,
}

impl Default for SectionAccess {
    fn default() -> Self {
        Self {
            policies: Cow::Borrowed(DASHBOARD_SECTIONS),
        }
    }
}

impl SectionAccess {
    pub fn new(policies: Vec<SectionPolicy>) -> Self {
        Self {
            policies: Cow::Owned(policies),
        }
    }

    pub fn policies(&self) -> &[SectionPolicy] {
        &self.policies
    }

    pub fn policy(&self, section_id: &str) -> Option<&SectionPolicy> {
        self.policies.iter().find(|p| p.id == section_id)
    }

    /// Effective requirement; sections without a policy are open.
    pub fn required_tier(&self, section_id: &str) -> Tier {
        self.policy(section_id)
            .map(SectionPolicy::required_tier)
            .unwrap_or(Tier::Free)
    }

    pub fn can_open(&self, section_id: &str, user_tier: Option<&str>) -> bool {
        normalize_tier_with_admin(user_tier).grants(self.required_tier(section_id))
    }

    /// Partition `all` into accessible and restricted sections.
    ///
    /// Every input section lands in exactly one list. Restricted sections are
    /// flagged with `is_restricted`; accessible ones are passed through as-is.
    pub fn ordered_sections(&self, all: Vec<Section>, user_tier: Option<&str>) -> SectionPartition {
        let user = normalize_tier_with_admin(user_tier);
        let mut partition = SectionPartition::default();

        for mut section in all {
            if user.grants(self.required_tier(&section.id)) {
                partition.accessible.push(section);
            } else {
                section.is_restricted = true;
                partition.restricted.push(section);
            }
        }

        partition
    }

    /// Text shown on a locked section, naming the tier it is meant for.
    pub fn restriction_message(&self, section_id: &str, user_tier: Option<&str>) -> String {
        let user = normalize_tier_with_admin(user_tier);

        match self.policy(section_id) {
            Some(policy) => format!(
                "{} is available to {} and above. Your current membership is {}.",
                policy.name, policy.nominal, user
            ),
            None => {
                tracing::debug!(section_id, "no policy registered for section");
                format!(
                    "The '{section_id}' section requires a higher membership tier. \
                     Your current membership is {user}."
                )
            }
        }
    }
}

/// Purchasable tiers strictly above `current_tier`, ascending.
pub fn upgrade_options(current_tier: Option<&str>) -> Vec<Tier> {
    let current = normalize_tier_with_admin(current_tier);
    Tier::CONSUMER
        .iter()
        .copied()
        .filter(|t| t.rank() > current.rank())
        .collect()
}

/// [`SectionAccess::ordered_sections`] against the shipped dashboard table.
pub fn ordered_sections(all: Vec<Section>, user_tier: Option<&str>) -> SectionPartition {
    SectionAccess::default().ordered_sections(all, user_tier)
}

/// [`SectionAccess::restriction_message`] against the shipped dashboard table.
pub fn restriction_message(section_id: &str, user_tier: Option<&str>) -> String {
    SectionAccess::default().restriction_message(section_id, user_tier)
}
