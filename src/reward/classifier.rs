use serde::{Deserialize, Serialize};

/// Tree grown from a completed focus session, bucketed by duration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    Seedling,
    Bush,
    FruitTree,
    RareTree,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Seedling, Tier::Bush, Tier::FruitTree, Tier::RareTree];

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Seedling => "Small Plant",
            Tier::Bush => "Bush",
            Tier::FruitTree => "Apple Tree",
            Tier::RareTree => "Rare Tree",
        }
    }

    pub fn display_token(&self) -> &'static str {
        match self {
            Tier::Seedling => "🌱",
            Tier::Bush => "🌿",
            Tier::FruitTree => "🍏",
            Tier::RareTree => "🌳",
        }
    }

    /// Lowest whole-minute duration that earns this tier.
    pub fn min_minutes(&self) -> u64 {
        match self {
            Tier::Seedling => 0,
            Tier::Bush => 30,
            Tier::FruitTree => 60,
            Tier::RareTree => 120,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub tier: Tier,
    pub display_token: &'static str,
}

/// Maps a focus duration to its tier. Only whole minutes count, so 1799
/// seconds is still a seedling.
pub fn classify(duration_secs: u64) -> Classification {
    let minutes = duration_secs / 60;
    let tier = if minutes >= Tier::RareTree.min_minutes() {
        Tier::RareTree
    } else if minutes >= Tier::FruitTree.min_minutes() {
        Tier::FruitTree
    } else if minutes >= Tier::Bush.min_minutes() {
        Tier::Bush
    } else {
        Tier::Seedling
    };

    Classification {
        tier,
        display_token: tier.display_token(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_durations_map_to_expected_tiers() {
        assert_eq!(classify(900).tier, Tier::Seedling);
        assert_eq!(classify(1800).tier, Tier::Bush);
        assert_eq!(classify(3600).tier, Tier::FruitTree);
        assert_eq!(classify(7200).tier, Tier::RareTree);
    }

    #[test]
    fn boundaries_are_inclusive_lower_bounds() {
        assert_eq!(classify(0).tier, Tier::Seedling);
        assert_eq!(classify(1799).tier, Tier::Seedling);
        assert_eq!(classify(3599).tier, Tier::Bush);
        assert_eq!(classify(7199).tier, Tier::FruitTree);
        assert_eq!(classify(u64::MAX).tier, Tier::RareTree);
    }

    #[test]
    fn classification_is_deterministic() {
        for secs in [1, 60, 1800, 3601, 10_000] {
            assert_eq!(classify(secs), classify(secs));
        }
    }

    #[test]
    fn display_token_follows_tier() {
        let c = classify(3600);
        assert_eq!(c.display_token, "🍏");
        assert_eq!(c.tier.label(), "Apple Tree");
        assert_eq!(classify(60).display_token, "🌱");
    }
}
