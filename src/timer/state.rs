use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reward::{classify, RewardToken, Tier};

use super::SessionError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Running => "running",
            SessionState::Paused => "paused",
            SessionState::Completed => "completed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durations a session may be started with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationMenu {
    pub presets_secs: Vec<u64>,
    /// Accept any positive duration, not just the presets.
    pub allow_custom: bool,
}

impl Default for DurationMenu {
    fn default() -> Self {
        Self {
            presets_secs: vec![900, 1800, 3600, 7200],
            allow_custom: false,
        }
    }
}

impl DurationMenu {
    pub fn validate(&self, duration_secs: u64) -> Result<(), SessionError> {
        if duration_secs == 0 {
            return Err(SessionError::ZeroDuration);
        }
        if !self.allow_custom && !self.presets_secs.contains(&duration_secs) {
            return Err(SessionError::UnlistedDuration(duration_secs));
        }
        Ok(())
    }
}

/// Emitted once when a session reaches its planned duration.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub session_id: String,
    pub earned_duration_secs: u64,
    pub tier: Tier,
    pub display_token: &'static str,
    pub completed_at: DateTime<Utc>,
}

impl Completion {
    pub fn to_token(&self) -> RewardToken {
        RewardToken::grow(self.earned_duration_secs, self.completed_at)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Progress { remaining_secs: u64 },
    Completed(Completion),
}

/// A single focus interval. Time is always passed in by the caller as epoch
/// milliseconds; the session never reads a clock itself.
#[derive(Debug, Clone, Default)]
pub struct FocusSession {
    menu: DurationMenu,
    state: SessionState,
    session_id: Option<String>,
    planned_duration_secs: u64,
    started_at_ms: Option<i64>,
    /// Time banked from earlier running windows; combines with `started_at_ms`
    /// to compute the true elapsed time.
    accumulated_elapsed_ms: u64,
}

impl FocusSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_menu(menu: DurationMenu) -> Self {
        Self {
            menu,
            ..Self::default()
        }
    }

    pub fn menu(&self) -> &DurationMenu {
        &self.menu
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn planned_duration_secs(&self) -> u64 {
        self.planned_duration_secs
    }

    fn planned_ms(&self) -> u64 {
        self.planned_duration_secs.saturating_mul(1000)
    }

    /// Elapsed focus time in milliseconds, never more than the planned duration.
    pub fn elapsed_ms(&self, now_ms: i64) -> u64 {
        let live = match (self.state, self.started_at_ms) {
            (SessionState::Running, Some(started)) => now_ms.saturating_sub(started).max(0) as u64,
            _ => 0,
        };
        self.accumulated_elapsed_ms
            .saturating_add(live)
            .min(self.planned_ms())
    }

    pub fn remaining_secs(&self, now_ms: i64) -> u64 {
        if self.state == SessionState::Idle {
            return 0;
        }
        let remaining_ms = self.planned_ms() - self.elapsed_ms(now_ms);
        remaining_ms.div_ceil(1000)
    }

    fn require(&self, action: &'static str, allowed: &[SessionState]) -> Result<(), SessionError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                action,
                state: self.state,
            })
        }
    }

    pub fn start(&mut self, planned_duration_secs: u64, now_ms: i64) -> Result<(), SessionError> {
        self.require("start", &[SessionState::Idle])?;
        self.menu.validate(planned_duration_secs)?;

        self.state = SessionState::Running;
        self.session_id = Some(Uuid::new_v4().to_string());
        self.planned_duration_secs = planned_duration_secs;
        self.started_at_ms = Some(now_ms);
        self.accumulated_elapsed_ms = 0;
        Ok(())
    }

    pub fn tick(&mut self, now_ms: i64) -> Result<TickOutcome, SessionError> {
        self.require("tick", &[SessionState::Running])?;

        let elapsed = self.elapsed_ms(now_ms);
        if elapsed < self.planned_ms() {
            return Ok(TickOutcome::Progress {
                remaining_secs: self.remaining_secs(now_ms),
            });
        }

        self.state = SessionState::Completed;
        self.started_at_ms = None;
        self.accumulated_elapsed_ms = self.planned_ms();

        let classification = classify(self.planned_duration_secs);
        Ok(TickOutcome::Completed(Completion {
            session_id: self.session_id.clone().unwrap_or_default(),
            earned_duration_secs: self.planned_duration_secs,
            tier: classification.tier,
            display_token: classification.display_token,
            completed_at: DateTime::from_timestamp_millis(now_ms).unwrap_or_else(Utc::now),
        }))
    }

    pub fn pause(&mut self, now_ms: i64) -> Result<(), SessionError> {
        self.require("pause", &[SessionState::Running])?;
        self.accumulated_elapsed_ms = self.elapsed_ms(now_ms);
        self.started_at_ms = None;
        self.state = SessionState::Paused;
        Ok(())
    }

    pub fn resume(&mut self, now_ms: i64) -> Result<(), SessionError> {
        self.require("resume", &[SessionState::Paused])?;
        self.started_at_ms = Some(now_ms);
        self.state = SessionState::Running;
        Ok(())
    }

    /// Abandons the session without a reward.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        self.require("cancel", &[SessionState::Running, SessionState::Paused])?;
        self.reset();
        Ok(())
    }

    pub fn acknowledge_completion(&mut self) -> Result<(), SessionError> {
        self.require("acknowledge completion", &[SessionState::Completed])?;
        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        *self = Self::with_menu(std::mem::take(&mut self.menu));
    }
}

/// Formats seconds as `m:ss`, the way the timer face shows them.
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
