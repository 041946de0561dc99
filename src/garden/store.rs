//! Local persistence for the garden.
//!
//! The ledger itself never touches disk; the host decides when to load and
//! save a [`GardenSnapshot`] through this store.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::{log_info, reward::RewardToken};

use super::GardenSnapshot;

const ENABLE_LOGS: bool = true;

pub struct GardenStore {
    path: PathBuf,
}

impl GardenStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create garden directory {}", parent.display())
            })?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved garden, or an empty one if nothing was saved yet.
    pub fn load(&self) -> Result<GardenSnapshot> {
        if !self.path.exists() {
            return Ok(GardenSnapshot::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read garden from {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(GardenSnapshot::default());
        }

        let snapshot: GardenSnapshot = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse garden at {}", self.path.display()))?;
        log_info!(
            "Loaded garden with {} trees from {}",
            snapshot.tokens.len(),
            self.path.display()
        );
        Ok(snapshot)
    }

    pub fn save(&self, snapshot: &GardenSnapshot) -> Result<()> {
        let serialized =
            serde_json::to_string_pretty(snapshot).context("Failed to serialize garden")?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write garden to {}", self.path.display()))
    }
}

/// Consecutive calendar days with at least one completed session, counted
/// back from `today`. A run that last grew a tree yesterday is still alive.
pub fn calendar_streak(tokens: &[RewardToken], today: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = tokens
        .iter()
        .map(|token| token.created_at().date_naive())
        .filter(|day| *day <= today)
        .collect();

    let mut cursor = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        match cursor.pred_opt() {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::garden::GardenLedger;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn grown_on(y: i32, m: u32, d: u32) -> RewardToken {
        RewardToken::grow(1800, Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap())
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = GardenStore::new(dir.path().join("garden.json")).unwrap();
        assert_eq!(store.load().unwrap(), GardenSnapshot::default());
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = GardenStore::new(dir.path().join("nested").join("garden.json")).unwrap();

        let mut ledger = GardenLedger::new();
        ledger.award(grown_on(2024, 5, 1));
        ledger.award(grown_on(2024, 5, 2));
        store.save(&ledger.snapshot()).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, ledger.snapshot());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("garden.json");
        fs::write(&path, "{not json").unwrap();
        let store = GardenStore::new(path).unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn calendar_streak_counts_consecutive_days() {
        let tokens = vec![
            grown_on(2024, 5, 1),
            grown_on(2024, 5, 3),
            grown_on(2024, 5, 4),
            grown_on(2024, 5, 4),
            grown_on(2024, 5, 5),
        ];
        assert_eq!(calendar_streak(&tokens, day(2024, 5, 5)), 3);
        assert_eq!(calendar_streak(&tokens, day(2024, 5, 6)), 3);
        assert_eq!(calendar_streak(&tokens, day(2024, 5, 7)), 0);
        assert_eq!(calendar_streak(&tokens, day(2024, 5, 1)), 1);
    }

    #[test]
    fn calendar_streak_empty() {
        assert_eq!(calendar_streak(&[], day(2024, 1, 1)), 0);
    }
}
