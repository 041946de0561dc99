use serde::{Deserialize, Serialize};

use crate::reward::{RewardToken, Tier};

/// Everything the garden needs to be rebuilt in a later run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GardenSnapshot {
    pub tokens: Vec<RewardToken>,
    #[serde(default)]
    pub streak: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TierCounts {
    pub seedling: usize,
    pub bush: usize,
    pub fruit_tree: usize,
    pub rare_tree: usize,
}

impl TierCounts {
    pub fn get(&self, tier: Tier) -> usize {
        match tier {
            Tier::Seedling => self.seedling,
            Tier::Bush => self.bush,
            Tier::FruitTree => self.fruit_tree,
            Tier::RareTree => self.rare_tree,
        }
    }

    fn bump(&mut self, tier: Tier) {
        match tier {
            Tier::Seedling => self.seedling += 1,
            Tier::Bush => self.bush += 1,
            Tier::FruitTree => self.fruit_tree += 1,
            Tier::RareTree => self.rare_tree += 1,
        }
    }
}

/// Stats panel plus the garden preview.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GardenSummary {
    pub total_tokens: usize,
    pub total_minutes: u64,
    pub streak: u32,
    pub tier_counts: TierCounts,
    pub recent: Vec<RewardToken>,
}

/// Append-only record of every tree grown, with running totals.
#[derive(Debug, Clone, Default)]
pub struct GardenLedger {
    tokens: Vec<RewardToken>,
    total_secs: u64,
    streak: u32,
    tier_counts: TierCounts,
}

impl GardenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: GardenSnapshot) -> Self {
        let mut ledger = Self::new();
        for token in snapshot.tokens {
            ledger.push(token);
        }
        ledger.streak = snapshot.streak;
        ledger
    }

    pub fn snapshot(&self) -> GardenSnapshot {
        GardenSnapshot {
            tokens: self.tokens.clone(),
            streak: self.streak,
        }
    }

    pub fn award(&mut self, token: RewardToken) {
        self.push(token);
        self.streak = self.streak.saturating_add(1);
    }

    fn push(&mut self, token: RewardToken) {
        self.total_secs = self
            .total_secs
            .saturating_add(token.earned_duration_secs());
        self.tier_counts.bump(token.tier());
        self.tokens.push(token);
    }

    pub fn tokens(&self) -> &[RewardToken] {
        &self.tokens
    }

    pub fn total_tokens(&self) -> usize {
        self.tokens.len()
    }

    pub fn total_minutes(&self) -> u64 {
        self.total_secs / 60
    }

    /// Completed sessions in this run. Calendar-day streaks are tracked by the store.
    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn tier_counts(&self) -> TierCounts {
        self.tier_counts
    }

    /// The last `n` tokens, oldest first.
    pub fn recent_tokens(&self, n: usize) -> &[RewardToken] {
        let start = self.tokens.len().saturating_sub(n);
        &self.tokens[start..]
    }

    pub fn summary(&self, recent: usize) -> GardenSummary {
        GardenSummary {
            total_tokens: self.total_tokens(),
            total_minutes: self.total_minutes(),
            streak: self.streak,
            tier_counts: self.tier_counts,
            recent: self.recent_tokens(recent).to_vec(),
        }
    }
}
