use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{classify, Tier};

/// A tree in the garden. Never mutated after it is grown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RewardToken {
    id: String,
    tier: Tier,
    name: String,
    earned_duration_secs: u64,
    created_at: DateTime<Utc>,
}

impl RewardToken {
    /// Grows a new tree for a session of `earned_duration_secs` completed at `created_at`.
    pub fn grow(earned_duration_secs: u64, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tier: classify(earned_duration_secs).tier,
            name: format!("Tree {}", created_at.format("%Y-%m-%d")),
            earned_duration_secs,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_token(&self) -> &'static str {
        self.tier.display_token()
    }

    pub fn earned_duration_secs(&self) -> u64 {
        self.earned_duration_secs
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn grow_derives_tier_and_name() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 18, 30, 0).unwrap();
        let token = RewardToken::grow(3600, at);
        assert_eq!(token.tier(), Tier::FruitTree);
        assert_eq!(token.name(), "Tree 2024-03-09");
        assert_eq!(token.earned_duration_secs(), 3600);
        assert_eq!(token.created_at(), at);
        assert_eq!(token.display_token(), "🍏");
    }

    #[test]
    fn ids_are_unique() {
        let at = Utc::now();
        let a = RewardToken::grow(900, at);
        let b = RewardToken::grow(900, at);
        assert_ne!(a.id(), b.id());
    }
}
