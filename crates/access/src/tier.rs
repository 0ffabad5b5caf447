//! Membership tiers and tier-name normalization.
//!
//! Tier names arrive from profiles and content rows in many shapes:
//! `"Gold Member (Tier 3)"`, `"full member"`, legacy names such as
//! `"Associate Agency (Tier 1)"`, or nothing at all. Everything is folded
//! into the closed [`Tier`] enum at this boundary; the rest of the portal
//! never compares tier strings directly.

use core::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use memberportal_core::DomainError;

/// A membership level, ordered from least to most access.
///
/// The derived `Ord` follows declaration order, which is the rank order.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Tier {
    #[default]
    #[serde(rename = "Free Member")]
    Free,
    #[serde(rename = "Associate Member")]
    Associate,
    #[serde(rename = "Full Member")]
    Full,
    #[serde(rename = "Gold Member")]
    Gold,
    /// Administrative level. Not purchasable and only recognized by the
    /// admin-aware normalizer.
    #[serde(rename = "Admin")]
    Admin,
}

impl Tier {
    /// The purchasable tiers, ascending.
    pub const CONSUMER: [Tier; 4] = [Tier::Free, Tier::Associate, Tier::Full, Tier::Gold];

    /// Every tier, ascending.
    pub const ALL: [Tier; 5] = [Tier::Free, Tier::Associate, Tier::Full, Tier::Gold, Tier::Admin];

    /// Canonical display name.
    pub const fn name(self) -> &'static str {
        match self {
            Tier::Free => "Free Member",
            Tier::Associate => "Associate Member",
            Tier::Full => "Full Member",
            Tier::Gold => "Gold Member",
            Tier::Admin => "Admin",
        }
    }

    /// Position in the hierarchy, starting at 1 for Free Member.
    pub const fn rank(self) -> u8 {
        match self {
            Tier::Free => 1,
            Tier::Associate => 2,
            Tier::Full => 3,
            Tier::Gold => 4,
            Tier::Admin => 5,
        }
    }

    pub const fn is_purchasable(self) -> bool {
        !matches!(self, Tier::Admin)
    }

    /// Whether a member at `self` may see content requiring `required`.
    pub fn grants(self, required: Tier) -> bool {
        self.rank() >= required.rank()
    }
}

impl core::fmt::Display for Tier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Strict parse: accepts canonical names and legacy aliases (admin included),
/// rejects anything else.
///
/// Use this when validating input that is about to be stored. Reads go
/// through [`normalize_tier`], which never fails.
impl FromStr for Tier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(&clean(s), true).ok_or_else(|| DomainError::unknown_tier(s))
    }
}

/// Legacy and shorthand names still present in older records.
const LEGACY_ALIASES: &[(&str, Tier)] = &[
    ("free", Tier::Free),
    ("free tier", Tier::Free),
    ("associate", Tier::Associate),
    ("associate agency", Tier::Associate),
    ("full", Tier::Full),
    ("full agency", Tier::Full),
    ("gold", Tier::Gold),
    ("gold agency", Tier::Gold),
];

const ADMIN_ALIASES: &[&str] = &["admin", "administrator"];

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("parenthetical pattern is valid"));

/// Remove every `( ... )` qualifier from a raw tier string.
pub fn strip_parenthetical(raw: &str) -> String {
    PARENTHETICAL.replace_all(raw, "").into_owned()
}

/// Comparison key: qualifiers removed, whitespace collapsed, lowercased.
fn clean(raw: &str) -> String {
    strip_parenthetical(raw)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn lookup(cleaned: &str, admin_aware: bool) -> Option<Tier> {
    if let Some((_, tier)) = LEGACY_ALIASES.iter().find(|(alias, _)| *alias == cleaned) {
        return Some(*tier);
    }

    if let Some(tier) = Tier::CONSUMER
        .iter()
        .find(|t| t.name().to_lowercase() == cleaned)
    {
        return Some(*tier);
    }

    if admin_aware && ADMIN_ALIASES.contains(&cleaned) {
        return Some(Tier::Admin);
    }

    None
}

fn resolve(raw: Option<&str>, admin_aware: bool) -> Tier {
    let Some(raw) = raw else {
        return Tier::Free;
    };
    let cleaned = clean(raw);
    if cleaned.is_empty() {
        return Tier::Free;
    }
    lookup(&cleaned, admin_aware).unwrap_or(Tier::Free)
}

/// Normalize a raw tier string to one of the four purchasable tiers.
///
/// Missing, empty or unrecognized input (including `"Admin"`) yields
/// [`Tier::Free`].
pub fn normalize_tier(raw: Option<&str>) -> Tier {
    resolve(raw, false)
}

/// Like [`normalize_tier`], but also recognizes the administrative level.
pub fn normalize_tier_with_admin(raw: Option<&str>) -> Tier {
    resolve(raw, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn missing_and_empty_input_is_free_member() {
        assert_eq!(normalize_tier(None), Tier::Free);
        assert_eq!(normalize_tier(Some("")), Tier::Free);
        assert_eq!(normalize_tier(Some("   ")), Tier::Free);
        assert_eq!(normalize_tier(Some("(Tier 2)")), Tier::Free);
    }

    #[test]
    fn parenthetical_qualifier_is_ignored() {
        assert_eq!(normalize_tier(Some("Gold Member (Tier 3)")), Tier::Gold);
        assert_eq!(normalize_tier(Some("  Full Member(legacy)  ")), Tier::Full);
        assert_eq!(normalize_tier(Some("Full (x) Member")), Tier::Full);
    }

    #[test]
    fn comparison_is_case_insensitive() {
        assert_eq!(normalize_tier(Some("full member")), Tier::Full);
        assert_eq!(normalize_tier(Some("GOLD MEMBER")), Tier::Gold);
        assert_eq!(normalize_tier(Some("aSsOcIaTe MeMbEr")), Tier::Associate);
    }

    #[test]
    fn legacy_alias_resolves() {
        assert_eq!(
            normalize_tier(Some("associate agency (tier 1)")),
            Tier::Associate
        );
        assert_eq!(normalize_tier(Some("Associate Agency (Tier 1)")), Tier::Associate);
        assert_eq!(normalize_tier(Some("Gold")), Tier::Gold);
        assert_eq!(normalize_tier(Some("free tier")), Tier::Free);
    }

    #[test]
    fn unrecognized_input_is_free_member() {
        assert_eq!(normalize_tier(Some("Platinum Member")), Tier::Free);
        assert_eq!(normalize_tier(Some("gold member (tier 3")), Tier::Free);
        assert_eq!(normalize_tier(Some("🦀")), Tier::Free);
    }

    #[test]
    fn admin_only_recognized_by_admin_aware_variant() {
        assert_eq!(normalize_tier(Some("Admin")), Tier::Free);
        assert_eq!(normalize_tier_with_admin(Some("Admin")), Tier::Admin);
        assert_eq!(normalize_tier_with_admin(Some("administrator (staff)")), Tier::Admin);
        assert_eq!(normalize_tier_with_admin(Some("Gold Member")), Tier::Gold);
    }

    #[test]
    fn ranks_are_strictly_increasing() {
        for pair in Tier::ALL.windows(2) {
            assert!(pair[0].rank() < pair[1].rank());
            assert!(pair[0] < pair[1]);
        }
        assert!(Tier::CONSUMER.iter().all(|t| t.is_purchasable()));
        assert!(!Tier::Admin.is_purchasable());
    }

    #[test]
    fn strict_parse_rejects_unknown_names() {
        assert_eq!("Gold Member (Tier 3)".parse::<Tier>(), Ok(Tier::Gold));
        assert_eq!("admin".parse::<Tier>(), Ok(Tier::Admin));
        assert_eq!(
            "Platinum".parse::<Tier>(),
            Err(DomainError::UnknownTier("Platinum".to_string()))
        );
        assert!("".parse::<Tier>().is_err());
    }

    #[test]
    fn serializes_as_canonical_name() {
        let json = serde_json::to_string(&Tier::Associate).unwrap();
        assert_eq!(json, "\"Associate Member\"");
        let back: Tier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Tier::Associate);
    }

    fn any_tier() -> impl Strategy<Value = Tier> {
        prop::sample::select(Tier::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: a parenthetical suffix never changes the outcome.
        #[test]
        fn parenthetical_suffix_is_irrelevant(
            base in "[A-Za-z ]{0,24}",
            qualifier in "[A-Za-z0-9 ]{0,12}"
        ) {
            let raw = format!("{base} ({qualifier})");
            prop_assert_eq!(
                normalize_tier(Some(&raw)),
                normalize_tier(Some(&strip_parenthetical(&raw)))
            );
            prop_assert_eq!(normalize_tier(Some(&raw)), normalize_tier(Some(&base)));
        }

        /// Property: normalizing a canonical name returns the same tier.
        #[test]
        fn normalization_is_idempotent(tier in any_tier()) {
            let once = normalize_tier_with_admin(Some(tier.name()));
            let twice = normalize_tier_with_admin(Some(once.name()));
            prop_assert_eq!(once, tier);
            prop_assert_eq!(twice, once);

            let consumer = normalize_tier(Some(tier.name()));
            prop_assert_eq!(normalize_tier(Some(consumer.name())), consumer);
        }

        /// Property: any input at all yields a tier, never a panic.
        #[test]
        fn normalization_is_total(raw in ".*") {
            let tier = normalize_tier(Some(&raw));
            prop_assert!(Tier::CONSUMER.contains(&tier));
            let _ = normalize_tier_with_admin(Some(&raw));
        }
    }
}
