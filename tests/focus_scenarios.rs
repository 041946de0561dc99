use std::sync::Arc;

use chrono::NaiveDate;
use soulbloom_lib::{
    classify, timer::NoopSink, AppState, FocusSession, GardenLedger, RewardToken, SessionState,
    Tier, TickOutcome,
};
use tempfile::TempDir;

const T0: i64 = 1_717_000_000_000;

fn tick_for(session: &mut FocusSession, secs: u64) -> Option<TickOutcome> {
    let mut last = None;
    for s in 1..=secs {
        last = Some(session.tick(T0 + s as i64 * 1000).unwrap());
    }
    last
}

#[test]
fn thirty_minute_session_grows_a_bush() {
    let mut session = FocusSession::new();
    let mut garden = GardenLedger::new();
    session.start(1800, T0).unwrap();

    assert!(matches!(
        tick_for(&mut session, 1799),
        Some(TickOutcome::Progress { remaining_secs: 1 })
    ));
    assert_eq!(session.state(), SessionState::Running);

    let completion = match session.tick(T0 + 1_800_000).unwrap() {
        TickOutcome::Completed(completion) => completion,
        other => panic!("expected completion, got {other:?}"),
    };
    assert_eq!(completion.tier, Tier::Bush);
    assert_eq!(session.state(), SessionState::Completed);

    session.acknowledge_completion().unwrap();
    assert_eq!(session.state(), SessionState::Idle);

    garden.award(completion.to_token());
    assert_eq!(garden.total_tokens(), 1);
    assert_eq!(garden.total_minutes(), 30);
    assert_eq!(garden.recent_tokens(8)[0].tier(), Tier::Bush);
}

#[test]
fn paused_then_cancelled_session_leaves_garden_empty() {
    let mut session = FocusSession::new();
    let garden = GardenLedger::new();
    session.start(900, T0).unwrap();

    tick_for(&mut session, 500);
    session.pause(T0 + 500_000).unwrap();
    session.cancel().unwrap();

    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(garden.total_tokens(), 0);
}

#[test]
fn every_preset_completes_exactly_on_time() {
    for (planned, tier) in [
        (900, Tier::Seedling),
        (1800, Tier::Bush),
        (3600, Tier::FruitTree),
        (7200, Tier::RareTree),
    ] {
        assert_eq!(classify(planned).tier, tier);

        let mut session = FocusSession::new();
        session.start(planned, T0).unwrap();
        match tick_for(&mut session, planned - 1) {
            Some(TickOutcome::Progress { remaining_secs }) => assert_eq!(remaining_secs, 1),
            other => panic!("{planned}s: expected progress, got {other:?}"),
        }
        match session.tick(T0 + planned as i64 * 1000).unwrap() {
            TickOutcome::Completed(completion) => assert_eq!(completion.tier, tier),
            other => panic!("{planned}s: expected completion, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn app_state_persists_the_garden() {
    let dir = TempDir::new().unwrap();

    let state = AppState::open(dir.path(), Arc::new(NoopSink)).unwrap();
    assert_eq!(state.timer.garden_summary().await.total_tokens, 0);
    state.save_garden().await.unwrap();
    drop(state);

    let mut snapshot = soulbloom_lib::GardenStore::new(dir.path().join("garden.json"))
        .unwrap()
        .load()
        .unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
    for day in [1, 2] {
        let at = NaiveDate::from_ymd_opt(2024, 6, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
            .and_utc();
        snapshot.tokens.push(RewardToken::grow(3600, at));
    }
    snapshot.streak = 2;
    soulbloom_lib::GardenStore::new(dir.path().join("garden.json"))
        .unwrap()
        .save(&snapshot)
        .unwrap();

    let reopened = AppState::open(dir.path(), Arc::new(NoopSink)).unwrap();
    let summary = reopened.timer.garden_summary().await;
    assert_eq!(summary.total_tokens, 2);
    assert_eq!(summary.total_minutes, 120);
    assert_eq!(summary.tier_counts.fruit_tree, 2);
    assert_eq!(reopened.calendar_streak(today).await, 2);
}
