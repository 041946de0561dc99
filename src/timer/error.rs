use thiserror::Error;

use super::SessionState;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {action} while the session is {state}")]
    InvalidTransition {
        action: &'static str,
        state: SessionState,
    },

    #[error("focus duration must be greater than zero")]
    ZeroDuration,

    #[error("{0} seconds is not one of the available focus durations")]
    UnlistedDuration(u64),
}
