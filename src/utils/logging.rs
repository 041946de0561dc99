//! Logging setup and conditional logging macros.
//!
//! Modules that log through the macros define a module-level flag:
//! ```rust,ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_info, log_warn, log_error};
//!
//! log_info!("garden loaded");
//! ```

/// Installs `env_logger` for the host process. Reads `RUST_LOG` and falls
/// back to `info`. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}

/// Info log gated on the calling module's `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Warn log gated on the calling module's `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Error log gated on the calling module's `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::init_logging;

    const ENABLE_LOGS: bool = false;

    #[test]
    fn init_twice_is_harmless() {
        init_logging();
        init_logging();
        log_info!("not printed");
        log_error!("not printed either");
    }
}
