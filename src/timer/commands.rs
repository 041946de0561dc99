//! Entry points for a UI shell. Errors come back as display strings.

use crate::{
    garden::GardenSummary,
    settings::{duration_label, FocusSettings, PresetOption},
};

use super::{SessionError, TickSource, TimerController, TimerSnapshot};

fn to_message(err: anyhow::Error) -> String {
    match err.downcast_ref::<SessionError>() {
        Some(SessionError::UnlistedDuration(secs)) => {
            format!("{} is not an available focus length", duration_label(*secs))
        }
        Some(session_err) => session_err.to_string(),
        None => format!("{err:#}"),
    }
}

pub fn get_duration_menu(settings: &FocusSettings) -> Vec<PresetOption> {
    settings.menu()
}

pub async fn get_timer_state<T: TickSource>(controller: &TimerController<T>) -> TimerSnapshot {
    controller.get_snapshot().await
}

pub async fn start_timer<T: TickSource>(
    controller: &TimerController<T>,
    duration_secs: u64,
) -> Result<TimerSnapshot, String> {
    controller
        .start_timer(duration_secs)
        .await
        .map_err(to_message)
}

pub async fn pause_timer<T: TickSource>(
    controller: &TimerController<T>,
) -> Result<TimerSnapshot, String> {
    controller.pause_timer().await.map_err(to_message)
}

pub async fn resume_timer<T: TickSource>(
    controller: &TimerController<T>,
) -> Result<TimerSnapshot, String> {
    controller.resume_timer().await.map_err(to_message)
}

pub async fn cancel_timer<T: TickSource>(
    controller: &TimerController<T>,
) -> Result<TimerSnapshot, String> {
    controller.cancel_timer().await.map_err(to_message)
}

pub async fn acknowledge_completion<T: TickSource>(
    controller: &TimerController<T>,
) -> Result<TimerSnapshot, String> {
    controller.acknowledge_completion().await.map_err(to_message)
}

pub async fn page_hidden<T: TickSource>(
    controller: &TimerController<T>,
) -> Result<TimerSnapshot, String> {
    controller.handle_interruption().await.map_err(to_message)
}

pub async fn get_garden<T: TickSource>(controller: &TimerController<T>) -> GardenSummary {
    controller.garden_summary().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::ManualClock,
        garden::GardenLedger,
        timer::{ManualTicks, NoopSink, SessionState},
    };
    use std::sync::Arc;

    fn controller() -> TimerController<ManualTicks> {
        let (ticks, _) = ManualTicks::new();
        TimerController::new(
            &FocusSettings::default(),
            GardenLedger::new(),
            Arc::new(ManualClock::new(0)),
            ticks,
            Arc::new(NoopSink),
        )
    }

    #[tokio::test]
    async fn errors_become_messages() {
        let controller = controller();
        assert_eq!(
            start_timer(&controller, 600).await.unwrap_err(),
            "10 min is not an available focus length"
        );
        assert_eq!(
            start_timer(&controller, 0).await.unwrap_err(),
            "focus duration must be greater than zero"
        );
        assert_eq!(
            resume_timer(&controller).await.unwrap_err(),
            "cannot resume while the session is idle"
        );
    }

    #[tokio::test]
    async fn round_trip_through_commands() {
        let controller = controller();
        let menu = get_duration_menu(&FocusSettings::default());
        let snapshot = start_timer(&controller, menu[0].duration_secs).await.unwrap();
        assert_eq!(snapshot.state, SessionState::Running);
        assert_eq!(get_timer_state(&controller).await.state, SessionState::Running);

        let snapshot = page_hidden(&controller).await.unwrap();
        assert_eq!(snapshot.state, SessionState::Idle);
        assert_eq!(get_garden(&controller).await.total_tokens, 0);
        assert!(cancel_timer(&controller).await.is_err());
        assert!(pause_timer(&controller).await.is_err());
        assert!(acknowledge_completion(&controller).await.is_err());
    }
}
