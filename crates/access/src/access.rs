//! Tier hierarchy comparison.
//!
//! Callers hold either a raw tier string or a profile-like value. Instead of
//! sniffing the argument shape at runtime, the raw-string functions take
//! `Option<&str>` and the object overloads go through [`TierHolder`].

use serde::Serialize;

use crate::tier::{Tier, normalize_tier_with_admin};

/// Anything that can report a member's raw tier string.
pub trait TierHolder {
    fn membership_tier(&self) -> Option<&str>;
}

/// Anything carrying a `tier_restriction` (opportunities, events, offers, ...).
///
/// `None` or an empty string means unrestricted.
pub trait TierRestricted {
    fn tier_restriction(&self) -> Option<&str>;
}

impl TierHolder for str {
    fn membership_tier(&self) -> Option<&str> {
        Some(self)
    }
}

impl TierHolder for String {
    fn membership_tier(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl TierHolder for Option<String> {
    fn membership_tier(&self) -> Option<&str> {
        self.as_deref()
    }
}

impl TierHolder for Tier {
    fn membership_tier(&self) -> Option<&str> {
        Some(self.name())
    }
}

impl<T> TierHolder for &T
where
    T: TierHolder + ?Sized,
{
    fn membership_tier(&self) -> Option<&str> {
        (**self).membership_tier()
    }
}

impl<T> TierRestricted for &T
where
    T: TierRestricted + ?Sized,
{
    fn tier_restriction(&self) -> Option<&str> {
        (**self).tier_restriction()
    }
}

/// Can a member at `user_tier` see an item restricted to `item_tier`?
///
/// Both sides are normalized (admin-aware). A missing requirement is always
/// satisfied; a missing user tier counts as Free Member.
pub fn has_tier_access(item_tier: Option<&str>, user_tier: Option<&str>) -> bool {
    let required = normalize_tier_with_admin(item_tier);
    let user = normalize_tier_with_admin(user_tier);
    user.grants(required)
}

/// Same decision as [`has_tier_access`], phrased as "required vs. user".
pub fn can_access_tier(required_tier: Option<&str>, user_tier: Option<&str>) -> bool {
    has_tier_access(required_tier, user_tier)
}

/// [`has_tier_access`] for a user object.
pub fn has_tier_access_for<U>(item_tier: Option<&str>, user: &U) -> bool
where
    U: TierHolder + ?Sized,
{
    has_tier_access(item_tier, user.membership_tier())
}

pub fn is_item_accessible<I, U>(item: &I, user: &U) -> bool
where
    I: TierRestricted + ?Sized,
    U: TierHolder + ?Sized,
{
    has_tier_access(item.tier_restriction(), user.membership_tier())
}

// ─────────────────────────────────────────────────────────────────────────────
// Access Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Why an item was shown or hidden, with both sides already normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    pub user_tier: Tier,
    pub required_tier: Tier,
    pub granted: bool,
    pub reason: String,
}

/// Explain the decision [`has_tier_access`] would make.
pub fn explain_tier_access(item_tier: Option<&str>, user_tier: Option<&str>) -> AccessDecision {
    let required = normalize_tier_with_admin(item_tier);
    let user = normalize_tier_with_admin(user_tier);
    let granted = user.grants(required);

    let reason = if required == Tier::Free {
        "Item is open to every member".to_string()
    } else if granted && user == required {
        format!("Member tier {user} matches the required tier")
    } else if granted {
        format!("Member tier {user} is above the required tier {required}")
    } else {
        format!("Requires {required}; member tier is {user}")
    };

    AccessDecision {
        user_tier: user,
        required_tier: required,
        granted,
        reason,
    }
}
