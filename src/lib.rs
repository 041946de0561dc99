pub mod clock;
pub mod garden;
pub mod quotes;
pub mod reward;
pub mod settings;
pub mod timer;
pub mod utils;

use std::{fs, path::Path, sync::Arc};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::warn;

pub use clock::{Clock, ManualClock, SystemClock};
pub use garden::{calendar_streak, GardenLedger, GardenSnapshot, GardenStore, GardenSummary};
pub use reward::{classify, Classification, RewardToken, Tier};
pub use settings::{FocusSettings, InterruptionPolicy, SettingsStore};
pub use timer::{
    Completion, EventSink, FocusSession, SessionError, SessionState, TickOutcome, TimerController,
    TimerEvent, TimerSnapshot,
};
pub use utils::init_logging;

/// Everything a host shell needs, wired from files under one data directory.
pub struct AppState {
    pub settings: SettingsStore,
    pub garden_store: GardenStore,
    pub timer: TimerController,
}

impl AppState {
    pub fn open(data_dir: &Path, events: Arc<dyn EventSink>) -> Result<Self> {
        fs::create_dir_all(data_dir).with_context(|| {
            format!("Failed to create data directory {}", data_dir.display())
        })?;

        let settings = SettingsStore::new(data_dir.join("settings.json"))?;
        let mut effective = settings.effective();
        if let Err(err) = effective.validate() {
            warn!("Invalid focus settings, using defaults: {err:#}");
            effective = FocusSettings::default();
        }

        let garden_store = GardenStore::new(data_dir.join("garden.json"))?;
        let garden = GardenLedger::from_snapshot(garden_store.load()?);

        let timer = TimerController::with_system_clock(&effective, garden, events);

        log::info!("SoulBloom core ready at {}", data_dir.display());

        Ok(Self {
            settings,
            garden_store,
            timer,
        })
    }

    pub async fn save_garden(&self) -> Result<()> {
        let snapshot = self.timer.garden_snapshot().await;
        self.garden_store.save(&snapshot)
    }

    /// Day streak for the profile page, from every tree ever grown.
    pub async fn calendar_streak(&self, today: NaiveDate) -> u32 {
        let snapshot = self.timer.garden_snapshot().await;
        calendar_streak(&snapshot.tokens, today)
    }
}
