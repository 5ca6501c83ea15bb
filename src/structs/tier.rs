/// A subscription tier as shown on the upgrade screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierDetails {
    pub id: u32,
    pub name: &'static str,
    pub features: &'static str,
    pub price: &'static str,
    /// Billing period. `"N/A"` for tiers that cannot be bought.
    pub duration: &'static str,
}

/// Shown for a session whose tier is missing from [`TIERS`].
pub const UNKNOWN_TIER: &str = "Unknown Tier";

/// Tier catalog, ordered by id.
pub const TIERS: &[TierDetails] = &[
    TierDetails {
        id: 0,
        name: "Basic Tier (Free)",
        features: "1 image capture per prompt. Standard AI processing.",
        price: "Free",
        duration: "N/A",
    },
    TierDetails {
        id: 1,
        name: "Pro Tier",
        features: "Unlock 2 image captures per prompt. Priority AI processing.",
        price: "$9.99",
        duration: "Monthly",
    },
];

impl TierDetails {
    pub fn is_purchasable(&self) -> bool {
        self.duration != "N/A"
    }

    /// Duration as passed to the purchase flow (`"monthly"`).
    pub fn duration_param(&self) -> String {
        self.duration.to_lowercase()
    }
}

pub fn tier_by_id(id: u32) -> Option<&'static TierDetails> {
    TIERS.iter().find(|t| t.id == id)
}

pub fn tier_name(id: u32) -> &'static str {
    tier_by_id(id).map(|t| t.name).unwrap_or(UNKNOWN_TIER)
}

/// Tiers above `current`, in catalog order.
pub fn upgrade_options(current: u32) -> impl Iterator<Item = &'static TierDetails> {
    TIERS.iter().filter(move |t| t.id > current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_tier_sees_pro_upgrade() {
        let options: Vec<_> = upgrade_options(0).collect();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].name, "Pro Tier");
        assert!(options[0].is_purchasable());
        assert_eq!(options[0].duration_param(), "monthly");
    }

    #[test]
    fn top_tier_has_no_upgrades() {
        assert_eq!(upgrade_options(1).count(), 0);
    }

    #[test]
    fn unknown_tier_name() {
        assert_eq!(tier_name(0), "Basic Tier (Free)");
        assert_eq!(tier_name(7), UNKNOWN_TIER);
        assert!(!tier_by_id(0).unwrap().is_purchasable());
    }
}
