use serde::Serialize;
use tokio::sync::{broadcast, mpsc};

use super::{Completion, TimerSnapshot};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum TimerEvent {
    StateChanged(TimerSnapshot),
    #[serde(rename_all = "camelCase")]
    Progress {
        session_id: String,
        remaining_secs: u64,
    },
    Completed(Completion),
}

impl TimerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TimerEvent::StateChanged(_) => "timer-state-changed",
            TimerEvent::Progress { .. } => "timer-progress",
            TimerEvent::Completed(_) => "session-completed",
        }
    }
}

/// Where the controller sends its events, usually a UI bridge.
pub trait EventSink: Send + Sync + 'static {
    fn emit(&self, event: TimerEvent);
}

impl EventSink for mpsc::UnboundedSender<TimerEvent> {
    fn emit(&self, event: TimerEvent) {
        let _ = self.send(event);
    }
}

impl EventSink for broadcast::Sender<TimerEvent> {
    fn emit(&self, event: TimerEvent) {
        // No subscribers is fine.
        let _ = self.send(event);
    }
}

/// Drops every event.
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: TimerEvent) {}
}
