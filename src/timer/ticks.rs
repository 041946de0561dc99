use std::future::{self, Future};
use std::time::Duration;

use tokio::{
    sync::mpsc,
    time::{self, Interval, MissedTickBehavior},
};

/// Drives the timer. The controller awaits one tick at a time while a
/// session is running and drops the pending future when it stops ticking.
pub trait TickSource: Send + 'static {
    fn tick(&mut self) -> impl Future<Output = ()> + Send;

    /// Called whenever a new ticker starts, so the first tick is a full period away.
    fn reset(&mut self) {}
}

/// Ticks on a tokio interval. The interval is created lazily because it
/// needs a running runtime.
pub struct IntervalTicks {
    period: Duration,
    interval: Option<Interval>,
}

impl IntervalTicks {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl TickSource for IntervalTicks {
    async fn tick(&mut self) {
        let period = self.period;
        let interval = self.interval.get_or_insert_with(|| {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        interval.tick().await;
    }

    fn reset(&mut self) {
        self.interval = None;
    }
}

/// Ticks only when a [`ManualTickHandle`] fires one.
pub struct ManualTicks {
    rx: mpsc::UnboundedReceiver<()>,
}

#[derive(Clone)]
pub struct ManualTickHandle {
    tx: mpsc::UnboundedSender<()>,
}

impl ManualTicks {
    pub fn new() -> (Self, ManualTickHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx }, ManualTickHandle { tx })
    }
}

impl ManualTickHandle {
    pub fn fire(&self) {
        let _ = self.tx.send(());
    }
}

impl TickSource for ManualTicks {
    async fn tick(&mut self) {
        if self.rx.recv().await.is_none() {
            // Every handle is gone; nothing will ever tick again.
            future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn manual_ticks_follow_the_handle() {
        let (mut ticks, handle) = ManualTicks::new();
        handle.fire();
        handle.fire();
        ticks.tick().await;
        ticks.tick().await;

        let pending = time::timeout(Duration::from_millis(20), ticks.tick()).await;
        assert!(pending.is_err());
    }

    #[tokio::test]
    async fn interval_ticks_wait_a_full_period() {
        let mut ticks = IntervalTicks::new(Duration::from_millis(10));
        let started = time::Instant::now();
        ticks.tick().await;
        assert!(started.elapsed() >= Duration::from_millis(10));

        ticks.reset();
        let started = time::Instant::now();
        ticks.tick().await;
        assert!(started.elapsed() >= Duration::from_millis(10));
    }
}
