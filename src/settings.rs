use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use crate::{
    log_warn,
    reward::{classify, Tier},
    timer::DurationMenu,
};

const ENABLE_LOGS: bool = true;

/// What to do with a running session when the user leaves the page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum InterruptionPolicy {
    Pause,
    #[default]
    Cancel,
}

impl InterruptionPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pause" => Some(InterruptionPolicy::Pause),
            "cancel" | "break" => Some(InterruptionPolicy::Cancel),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct FocusSettings {
    pub presets_secs: Vec<u64>,
    pub allow_custom_durations: bool,
    pub tick_interval_ms: u64,
    pub interruption_policy: InterruptionPolicy,
    pub garden_preview_size: usize,
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self {
            presets_secs: DurationMenu::default().presets_secs,
            allow_custom_durations: false,
            tick_interval_ms: 1000,
            interruption_policy: InterruptionPolicy::default(),
            garden_preview_size: 8,
        }
    }
}

/// One entry of the duration picker.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PresetOption {
    pub duration_secs: u64,
    pub label: String,
    pub tier: Tier,
    pub display_token: &'static str,
}

impl FocusSettings {
    pub fn duration_menu(&self) -> DurationMenu {
        DurationMenu {
            presets_secs: self.presets_secs.clone(),
            allow_custom: self.allow_custom_durations,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn menu(&self) -> Vec<PresetOption> {
        self.presets_secs
            .iter()
            .map(|&duration_secs| {
                let classification = classify(duration_secs);
                PresetOption {
                    duration_secs,
                    label: duration_label(duration_secs),
                    tier: classification.tier,
                    display_token: classification.display_token,
                }
            })
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.presets_secs.iter().any(|&secs| secs == 0) {
            bail!("focus presets must be greater than zero");
        }
        if self.presets_secs.is_empty() && !self.allow_custom_durations {
            bail!("no focus durations available: add a preset or allow custom durations");
        }
        if self.tick_interval_ms == 0 {
            bail!("tick_interval_ms must be greater than zero");
        }
        Ok(())
    }

    /// Applies `SOULBLOOM_*` environment overrides through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("SOULBLOOM_TICK_MS") {
            match value.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => self.tick_interval_ms = ms,
                _ => log_warn!("Ignoring invalid SOULBLOOM_TICK_MS={value}"),
            }
        }

        if let Some(value) = lookup("SOULBLOOM_INTERRUPTION") {
            match InterruptionPolicy::parse(&value) {
                Some(policy) => self.interruption_policy = policy,
                None => log_warn!("Ignoring invalid SOULBLOOM_INTERRUPTION={value}"),
            }
        }

        let debug_mode = lookup("SOULBLOOM_DEBUG")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if debug_mode {
            self.allow_custom_durations = true;
        }
    }
}

/// "15 min", "1 hour", "2 hours", or "90 min" for anything not on the hour.
pub fn duration_label(duration_secs: u64) -> String {
    let minutes = duration_secs / 60;
    match minutes {
        0 => format!("{duration_secs} sec"),
        60 => "1 hour".to_string(),
        m if m % 60 == 0 => format!("{} hours", m / 60),
        m => format!("{m} min"),
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<FocusSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!(
                    "Unreadable settings at {}, using defaults: {err}",
                    path.display()
                );
                FocusSettings::default()
            })
        } else {
            FocusSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, FocusSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, FocusSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Saved settings with environment overrides applied.
    pub fn effective(&self) -> FocusSettings {
        let mut settings = self.read().clone();
        settings.apply_env_overrides(|key| std::env::var(key).ok());
        settings
    }

    pub fn saved(&self) -> FocusSettings {
        self.read().clone()
    }

    pub fn update(&self, settings: FocusSettings) -> Result<()> {
        settings.validate()?;
        let mut guard = self.write();
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    fn persist(&self, data: &FocusSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let data: FocusSettings = serde_json::from_str(&contents)?;
        *self.write() = data;
        Ok(())
    }
}
