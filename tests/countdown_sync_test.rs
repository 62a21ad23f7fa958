//! The shared countdown timer wired to the message channel, as the main
//! loop runs it.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chronoauth::app::AppMessage;
use chronoauth::countdown::{seconds_remaining, CountdownScheduler, SchedulerError};

fn now_epoch() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

#[tokio::test]
async fn first_tick_matches_the_wall_clock() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let tick_tx = tx.clone();
    let boundary_tx = tx;

    let mut scheduler = CountdownScheduler::new();
    scheduler
        .start(
            move |seconds_remaining| {
                let _ = tick_tx.send(AppMessage::CountdownTick { seconds_remaining });
            },
            move || {
                let _ = boundary_tx.send(AppMessage::StepBoundary);
            },
        )
        .unwrap();

    let before = now_epoch();
    let message = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("no tick arrived")
        .expect("channel closed");
    let after = now_epoch();

    match message {
        AppMessage::CountdownTick {
            seconds_remaining: got,
        } => {
            // The tick was computed somewhere in [before, after].
            let candidates: Vec<u64> =
                (before..=after).map(seconds_remaining).collect();
            assert!(
                candidates.contains(&got),
                "tick {} not derived from wall clock range {:?}",
                got,
                candidates
            );
            assert!((1..=30).contains(&got));
        }
        other => panic!("expected a tick first, got {:?}", other),
    }

    scheduler.stop();
}

#[tokio::test]
async fn stopped_scheduler_goes_silent() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let tick_tx = tx.clone();

    let mut scheduler = CountdownScheduler::new();
    scheduler
        .start(
            move |seconds_remaining| {
                let _ = tick_tx.send(AppMessage::CountdownTick { seconds_remaining });
            },
            move || {},
        )
        .unwrap();

    // Let at least the immediate first tick through, then stop.
    let _ = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await;
    scheduler.stop();

    while rx.try_recv().is_ok() {}
    let silence = tokio::time::timeout(Duration::from_millis(1300), rx.recv()).await;
    assert!(silence.is_err(), "tick arrived after stop");
}

#[tokio::test]
async fn second_start_is_rejected_while_running() {
    let mut scheduler = CountdownScheduler::new();
    scheduler.start(|_| {}, || {}).unwrap();
    assert_eq!(
        scheduler.start(|_| {}, || {}),
        Err(SchedulerError::AlreadyRunning)
    );
    scheduler.stop();
    // After a stop the scheduler is reusable.
    scheduler.start(|_| {}, || {}).unwrap();
}
