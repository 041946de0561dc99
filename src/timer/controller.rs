use std::sync::Arc;

use anyhow::Result;
use log::{error, info};
use serde::Serialize;
use tokio::{sync::Mutex, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{
    clock::{Clock, SystemClock},
    garden::{GardenLedger, GardenSnapshot, GardenSummary},
    quotes::pick_quote,
    settings::{FocusSettings, InterruptionPolicy},
};

use super::{
    EventSink, FocusSession, IntervalTicks, SessionState, TickOutcome, TickSource, TimerEvent,
};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub state: SessionState,
    pub session_id: Option<String>,
    pub planned_duration_secs: u64,
    pub remaining_secs: u64,
    pub quote: Option<String>,
}

struct ActiveTimer {
    session: FocusSession,
    quote: Option<&'static str>,
}

impl ActiveTimer {
    fn snapshot(&self, now_ms: i64) -> TimerSnapshot {
        TimerSnapshot {
            state: self.session.state(),
            session_id: self.session.session_id().map(str::to_owned),
            planned_duration_secs: self.session.planned_duration_secs(),
            remaining_secs: self.session.remaining_secs(now_ms),
            quote: self.quote.map(str::to_owned),
        }
    }
}

struct Ticker {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

/// Binds a [`FocusSession`] to a clock, a tick source and the garden.
///
/// Every mutation goes through the `timer` mutex, and the ticker is stopped
/// while that lock is held, so a stale tick can never touch a newer session.
pub struct TimerController<T: TickSource = IntervalTicks> {
    timer: Arc<Mutex<ActiveTimer>>,
    garden: Arc<Mutex<GardenLedger>>,
    ticks: Arc<Mutex<T>>,
    ticker: Arc<Mutex<Option<Ticker>>>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
    interruption_policy: InterruptionPolicy,
    garden_preview_size: usize,
}

impl<T: TickSource> Clone for TimerController<T> {
    fn clone(&self) -> Self {
        Self {
            timer: self.timer.clone(),
            garden: self.garden.clone(),
            ticks: self.ticks.clone(),
            ticker: self.ticker.clone(),
            clock: self.clock.clone(),
            events: self.events.clone(),
            interruption_policy: self.interruption_policy,
            garden_preview_size: self.garden_preview_size,
        }
    }
}

impl TimerController<IntervalTicks> {
    /// Wall clock and a tokio interval at the configured cadence.
    pub fn with_system_clock(
        settings: &FocusSettings,
        garden: GardenLedger,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self::new(
            settings,
            garden,
            Arc::new(SystemClock),
            IntervalTicks::new(settings.tick_interval()),
            events,
        )
    }
}

impl<T: TickSource> TimerController<T> {
    pub fn new(
        settings: &FocusSettings,
        garden: GardenLedger,
        clock: Arc<dyn Clock>,
        ticks: T,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            timer: Arc::new(Mutex::new(ActiveTimer {
                session: FocusSession::with_menu(settings.duration_menu()),
                quote: None,
            })),
            garden: Arc::new(Mutex::new(garden)),
            ticks: Arc::new(Mutex::new(ticks)),
            ticker: Arc::new(Mutex::new(None)),
            clock,
            events,
            interruption_policy: settings.interruption_policy,
            garden_preview_size: settings.garden_preview_size,
        }
    }

    pub fn interruption_policy(&self) -> InterruptionPolicy {
        self.interruption_policy
    }

    pub async fn get_snapshot(&self) -> TimerSnapshot {
        let timer = self.timer.lock().await;
        timer.snapshot(self.clock.now_ms())
    }

    pub async fn start_timer(&self, duration_secs: u64) -> Result<TimerSnapshot> {
        let mut timer = self.timer.lock().await;
        let now = self.clock.now_ms();
        timer.session.start(duration_secs, now)?;
        timer.quote = Some(pick_quote(&mut rand::thread_rng()));

        self.spawn_ticker().await;

        info!(
            "Focus session {} started for {}s",
            timer.session.session_id().unwrap_or_default(),
            duration_secs
        );
        Ok(self.emit_state_changed(&timer, now))
    }

    pub async fn pause_timer(&self) -> Result<TimerSnapshot> {
        let mut timer = self.timer.lock().await;
        let now = self.clock.now_ms();
        self.pause_locked(&mut timer, now).await?;
        Ok(self.emit_state_changed(&timer, now))
    }

    pub async fn resume_timer(&self) -> Result<TimerSnapshot> {
        let mut timer = self.timer.lock().await;
        let now = self.clock.now_ms();
        timer.session.resume(now)?;
        self.spawn_ticker().await;
        Ok(self.emit_state_changed(&timer, now))
    }

    /// Abandons the running or paused session. Nothing is added to the garden.
    pub async fn cancel_timer(&self) -> Result<TimerSnapshot> {
        let mut timer = self.timer.lock().await;
        let now = self.clock.now_ms();
        self.cancel_locked(&mut timer).await?;
        Ok(self.emit_state_changed(&timer, now))
    }

    pub async fn acknowledge_completion(&self) -> Result<TimerSnapshot> {
        let mut timer = self.timer.lock().await;
        let now = self.clock.now_ms();
        timer.session.acknowledge_completion()?;
        timer.quote = None;
        Ok(self.emit_state_changed(&timer, now))
    }

    /// The user left the page. Applies the configured policy to a running
    /// session and leaves any other state alone.
    pub async fn handle_interruption(&self) -> Result<TimerSnapshot> {
        let mut timer = self.timer.lock().await;
        let now = self.clock.now_ms();
        if timer.session.state() != SessionState::Running {
            return Ok(timer.snapshot(now));
        }

        match self.interruption_policy {
            InterruptionPolicy::Pause => self.pause_locked(&mut timer, now).await?,
            InterruptionPolicy::Cancel => self.cancel_locked(&mut timer).await?,
        }
        info!(
            "Focus interrupted, applied {:?} policy",
            self.interruption_policy
        );
        Ok(self.emit_state_changed(&timer, now))
    }

    pub async fn garden_summary(&self) -> GardenSummary {
        self.garden.lock().await.summary(self.garden_preview_size)
    }

    pub async fn garden_snapshot(&self) -> GardenSnapshot {
        self.garden.lock().await.snapshot()
    }

    async fn pause_locked(&self, timer: &mut ActiveTimer, now: i64) -> Result<()> {
        timer.session.pause(now)?;
        self.cancel_ticker().await;
        Ok(())
    }

    async fn cancel_locked(&self, timer: &mut ActiveTimer) -> Result<()> {
        let session_id = timer.session.session_id().map(str::to_owned);
        timer.session.cancel()?;
        timer.quote = None;
        self.cancel_ticker().await;
        info!(
            "Focus session {} cancelled",
            session_id.unwrap_or_default()
        );
        Ok(())
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(previous) = ticker_guard.take() {
            previous.cancel.cancel();
            previous.handle.abort();
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_ticker(
            self.timer.clone(),
            self.garden.clone(),
            self.ticks.clone(),
            self.clock.clone(),
            self.events.clone(),
            cancel.clone(),
        ));

        *ticker_guard = Some(Ticker { handle, cancel });
    }

    async fn cancel_ticker(&self) {
        if let Some(ticker) = self.ticker.lock().await.take() {
            ticker.cancel.cancel();
            ticker.handle.abort();
        }
    }

    fn emit_state_changed(&self, timer: &ActiveTimer, now: i64) -> TimerSnapshot {
        let snapshot = timer.snapshot(now);
        self.events.emit(TimerEvent::StateChanged(snapshot.clone()));
        snapshot
    }
}

async fn run_ticker<T: TickSource>(
    timer: Arc<Mutex<ActiveTimer>>,
    garden: Arc<Mutex<GardenLedger>>,
    ticks: Arc<Mutex<T>>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
    cancel: CancellationToken,
) {
    let mut ticks = tokio::select! {
        _ = cancel.cancelled() => return,
        guard = ticks.lock() => guard,
    };
    ticks.reset();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticks.tick() => {}
        }

        let mut guard = timer.lock().await;
        if cancel.is_cancelled() || guard.session.state() != SessionState::Running {
            break;
        }

        let now = clock.now_ms();
        match guard.session.tick(now) {
            Ok(TickOutcome::Progress { remaining_secs }) => {
                events.emit(TimerEvent::Progress {
                    session_id: guard.session.session_id().unwrap_or_default().to_owned(),
                    remaining_secs,
                });
            }
            Ok(TickOutcome::Completed(completion)) => {
                let token = completion.to_token();
                info!(
                    "Focus session {} completed, grew {} {}",
                    completion.session_id,
                    token.tier().label(),
                    token.display_token()
                );
                garden.lock().await.award(token);

                events.emit(TimerEvent::StateChanged(guard.snapshot(now)));
                events.emit(TimerEvent::Completed(completion));
                break;
            }
            Err(err) => {
                error!("Ticker stopped on invalid tick: {err}");
                break;
            }
        }
    }
}
