//! Feed classification: tier decisions, ordering, filtering and facets.
//!
//! Every content listing in the portal goes through the same steps:
//!
//! ```text
//! fetched rows ─┬─> facets (from the unfiltered rows)
//!               └─> filter ─> classify (normalize + access) ─> order
//! ```
//!
//! Ordering puts items whose requirement equals the member's tier first, then
//! the remaining accessible items, then restricted ones. Within each group the
//! most recently touched item comes first.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use memberportal_access::{Tier, TierHolder, TierRestricted, normalize_tier_with_admin};
use memberportal_core::Timestamped;

use crate::item::ContentItem;

/// An item annotated with the access decision for one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedItem<T> {
    #[serde(flatten)]
    pub item: T,
    pub required_tier: Tier,
    pub is_accessible: bool,
    /// Accessible, and the requirement is exactly the member's tier.
    pub is_exact_match: bool,
}

impl<T> ClassifiedItem<T> {
    fn group(&self) -> u8 {
        match (self.is_accessible, self.is_exact_match) {
            (true, true) => 0,
            (true, false) => 1,
            (false, _) => 2,
        }
    }
}

/// Classify and order `items` for `user`.
pub fn classify<T, U>(items: Vec<T>, user: &U) -> Vec<ClassifiedItem<T>>
where
    T: TierRestricted + Timestamped,
    U: TierHolder + ?Sized,
{
    let user_tier = normalize_tier_with_admin(user.membership_tier());

    let mut classified: Vec<ClassifiedItem<T>> = items
        .into_iter()
        .map(|item| {
            let required_tier = normalize_tier_with_admin(item.tier_restriction());
            let is_accessible = user_tier.grants(required_tier);
            ClassifiedItem {
                item,
                required_tier,
                is_accessible,
                is_exact_match: is_accessible && required_tier == user_tier,
            }
        })
        .collect();

    // Stable: ties keep fetch order.
    classified.sort_by(compare_for_feed);
    classified
}

fn compare_for_feed<T: Timestamped>(a: &ClassifiedItem<T>, b: &ClassifiedItem<T>) -> Ordering {
    a.group()
        .cmp(&b.group())
        .then_with(|| b.item.last_touched().cmp(&a.item.last_touched()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Filters & Facets
// ─────────────────────────────────────────────────────────────────────────────

/// Non-tier criteria a member can narrow a feed by.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentFilter {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    /// Inclusive lower bound on the item date (event start, else creation).
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the item date.
    #[serde(default)]
    pub until: Option<DateTime<Utc>>,
}

impl ContentFilter {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn matches(&self, item: &ContentItem) -> bool {
        if !field_matches(self.category.as_deref(), item.category.as_deref()) {
            return false;
        }
        if !field_matches(self.region.as_deref(), item.region.as_deref()) {
            return false;
        }

        let date = item.starts_at.unwrap_or(item.created_at);
        if self.from.is_some_and(|from| date < from) {
            return false;
        }
        if self.until.is_some_and(|until| date > until) {
            return false;
        }
        true
    }
}

fn field_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match wanted.map(str::trim).filter(|w| !w.is_empty()) {
        None => true,
        Some(wanted) => actual.is_some_and(|a| a.trim().eq_ignore_ascii_case(wanted)),
    }
}

/// Distinct filter values observed in a fetch, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub categories: Vec<String>,
    pub regions: Vec<String>,
}

impl Facets {
    pub fn collect<'a>(items: impl IntoIterator<Item = &'a ContentItem>) -> Self {
        let mut categories = BTreeSet::new();
        let mut regions = BTreeSet::new();

        for item in items {
            if let Some(c) = non_blank(item.category.as_deref()) {
                categories.insert(c.to_string());
            }
            if let Some(r) = non_blank(item.region.as_deref()) {
                regions.insert(r.to_string());
            }
        }

        Self {
            categories: categories.into_iter().collect(),
            regions: regions.into_iter().collect(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Feed
// ─────────────────────────────────────────────────────────────────────────────

/// What a content listing hands to the view layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentFeed {
    pub items: Vec<ClassifiedItem<ContentItem>>,
    pub facets: Facets,
    /// Counts over every matching item, before any page limit.
    pub accessible_count: usize,
    pub restricted_count: usize,
}

impl ContentFeed {
    /// Build a feed from an unfiltered fetch.
    ///
    /// Facets are taken from `fetched` before filtering so the member can
    /// always widen the filter again.
    pub fn build<U>(
        fetched: Vec<ContentItem>,
        filter: &ContentFilter,
        user: &U,
        limit: Option<usize>,
    ) -> Self
    where
        U: TierHolder + ?Sized,
    {
        let facets = Facets::collect(&fetched);

        let matching: Vec<ContentItem> = fetched
            .into_iter()
            .filter(|item| filter.matches(item))
            .collect();

        let mut items = classify(matching, user);
        let accessible_count = items.iter().filter(|c| c.is_accessible).count();
        let restricted_count = items.len() - accessible_count;

        if let Some(limit) = limit {
            items.truncate(limit);
        }

        Self {
            items,
            facets,
            accessible_count,
            restricted_count,
        }
    }
}
