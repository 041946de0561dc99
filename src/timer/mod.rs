pub mod commands;
pub mod controller;
pub mod error;
pub mod events;
pub mod state;
pub mod ticks;

pub use controller::{TimerController, TimerSnapshot};
pub use error::SessionError;
pub use events::{EventSink, NoopSink, TimerEvent};
pub use state::{format_clock, Completion, DurationMenu, FocusSession, SessionState, TickOutcome};
pub use ticks::{IntervalTicks, ManualTickHandle, ManualTicks, TickSource};
