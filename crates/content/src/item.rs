//! Content records as the portal stores them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use memberportal_access::{Tier, TierRestricted};
use memberportal_core::{DomainError, DomainResult, Entity, RecordId, Timestamped};

// ─────────────────────────────────────────────────────────────────────────────
// Content Kind
// ─────────────────────────────────────────────────────────────────────────────

/// The tier-gated content families shown in the portal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Opportunity,
    Event,
    Resource,
    MarketIntel,
    Offer,
    Update,
}

impl ContentKind {
    pub const ALL: [ContentKind; 6] = [
        ContentKind::Opportunity,
        ContentKind::Event,
        ContentKind::Resource,
        ContentKind::MarketIntel,
        ContentKind::Offer,
        ContentKind::Update,
    ];

    /// Backing table in the record store.
    pub const fn table(self) -> &'static str {
        match self {
            ContentKind::Opportunity => "business_opportunities",
            ContentKind::Event => "events",
            ContentKind::Resource => "resources",
            ContentKind::MarketIntel => "market_intel",
            ContentKind::Offer => "offers",
            ContentKind::Update => "updates",
        }
    }

    /// Dashboard section that lists this kind.
    pub const fn section_id(self) -> &'static str {
        match self {
            ContentKind::Opportunity => "opportunities",
            ContentKind::Event => "events",
            ContentKind::Resource => "resources",
            ContentKind::MarketIntel => "market-intel",
            ContentKind::Offer => "offers",
            ContentKind::Update => "updates",
        }
    }
}

impl core::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.section_id())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Content Item
// ─────────────────────────────────────────────────────────────────────────────

/// A stored piece of content.
///
/// `tier_restriction` is kept exactly as stored; it is normalized on every
/// read so that changes to either side are picked up immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: RecordId,
    pub kind: ContentKind,
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub tier_restriction: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Start time, for events.
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
}

impl Entity for ContentItem {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Timestamped for ContentItem {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

impl TierRestricted for ContentItem {
    fn tier_restriction(&self) -> Option<&str> {
        self.tier_restriction.as_deref()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Drafts & Patches
// ─────────────────────────────────────────────────────────────────────────────

/// Validate a tier restriction about to be written.
///
/// Reads are forgiving, writes are not: a misspelled tier would otherwise be
/// stored and silently read back as Free Member.
fn validate_restriction(raw: Option<&str>) -> DomainResult<()> {
    match raw.map(str::trim) {
        None | Some("") => Ok(()),
        Some(raw) => raw.parse::<Tier>().map(|_| ()),
    }
}

fn validate_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::validation("title must not be empty"));
    }
    Ok(())
}

/// Input of the "new content" forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDraft {
    pub kind: ContentKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_restriction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
}

impl ContentDraft {
    pub fn new(kind: ContentKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            summary: None,
            category: None,
            region: None,
            tier_restriction: None,
            starts_at: None,
        }
    }

    pub fn restricted_to(mut self, tier: impl Into<String>) -> Self {
        self.tier_restriction = Some(tier.into());
        self
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn in_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn starting_at(mut self, starts_at: DateTime<Utc>) -> Self {
        self.starts_at = Some(starts_at);
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        validate_title(&self.title)?;
        validate_restriction(self.tier_restriction.as_deref())?;
        if self.kind == ContentKind::Event && self.starts_at.is_none() {
            return Err(DomainError::validation("events need a start time"));
        }
        Ok(())
    }
}

/// Partial update from the "edit content" forms. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// `Some("")` lifts the restriction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_restriction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
}

impl ContentPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        validate_restriction(self.tier_restriction.as_deref())
    }
}
