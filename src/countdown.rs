//! Shared countdown clock for the 30-second TOTP step window.
//!
//! This module provides a [`CountdownScheduler`] that owns a single
//! wall-clock-driven timer with an explicit start/stop lifecycle and
//! injected callbacks, so the step-boundary logic is testable without any
//! rendering loop attached.
//!
//! The displayed remaining time is never decremented locally. Every tick
//! *recomputes* it from the current epoch second, which makes the countdown
//! self-healing: if the process is suspended for 90 seconds and resumes,
//! the next tick immediately shows the correct remaining time instead of
//! continuing a stale count.

use std::time::{SystemTime, UNIX_EPOCH};

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Length of one TOTP step window in seconds.
pub const STEP_SECONDS: u64 = 30;

/// Seconds left in the step window containing `epoch_seconds`.
///
/// Always in `[1, STEP_SECONDS]`; equals `STEP_SECONDS` exactly at a step
/// boundary (`epoch_seconds % STEP_SECONDS == 0`).
pub fn seconds_remaining(epoch_seconds: u64) -> u64 {
    STEP_SECONDS - (epoch_seconds % STEP_SECONDS)
}

/// True iff `epoch_seconds` is the first second of a step window.
pub fn is_step_boundary(epoch_seconds: u64) -> bool {
    epoch_seconds % STEP_SECONDS == 0
}

/// What a single clock observation produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Seconds left in the current window, recomputed from the wall clock.
    pub seconds_remaining: u64,
    /// Whether the window index advanced since the previous observation.
    pub boundary_crossed: bool,
}

/// Tracks step-window transitions across successive clock observations.
///
/// Boundary detection is level-triggered on the window index rather than
/// edge-counted on a decrement: each observation computes
/// `epoch / STEP_SECONDS` and reports a crossing whenever that index has
/// advanced since the last observation. A tick that lands a second late
/// still reports the crossing; a stall spanning several whole windows
/// reports a single crossing on resume.
#[derive(Debug, Default)]
pub struct StepTracker {
    last_window: Option<u64>,
}

impl StepTracker {
    pub fn new() -> Self {
        Self { last_window: None }
    }

    /// Observe the clock at `epoch_seconds`.
    ///
    /// The first observation never reports a crossing; the caller fetches
    /// codes for the initial window through the on-load path instead.
    pub fn observe(&mut self, epoch_seconds: u64) -> Tick {
        let window = epoch_seconds / STEP_SECONDS;
        let boundary_crossed = match self.last_window {
            Some(prev) => window != prev,
            None => false,
        };
        self.last_window = Some(window);
        Tick {
            seconds_remaining: seconds_remaining(epoch_seconds),
            boundary_crossed,
        }
    }
}

/// Error returned when starting an already-running scheduler.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// The scheduler already owns a live timer task.
    #[error("countdown scheduler is already running")]
    AlreadyRunning,
}

/// Owns the one-per-process countdown timer task.
///
/// Starting a running scheduler is rejected rather than made idempotent:
/// the existing timer keeps running and [`SchedulerError::AlreadyRunning`]
/// is returned, so duplicate timers cannot exist. Stopping is idempotent
/// and aborts the timer task; callbacks never run after `stop` returns.
/// In-flight code fetches that a boundary callback already spawned are not
/// cancelled - a late merge only overwrites its own entry's code, which is
/// stale but harmless.
#[derive(Debug, Default)]
pub struct CountdownScheduler {
    handle: Option<JoinHandle<()>>,
}

impl CountdownScheduler {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Spawn the timer task.
    ///
    /// `on_tick` receives the recomputed seconds-remaining roughly once per
    /// second; `on_boundary` fires exactly once per step window. Timer
    /// precision is advisory - correctness comes from recomputation, so a
    /// late or skipped tick cannot accumulate drift.
    pub fn start<T, B>(&mut self, mut on_tick: T, mut on_boundary: B) -> Result<(), SchedulerError>
    where
        T: FnMut(u64) + Send + 'static,
        B: FnMut() + Send + 'static,
    {
        if self.handle.is_some() {
            return Err(SchedulerError::AlreadyRunning);
        }

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut tracker = StepTracker::new();
            loop {
                interval.tick().await;
                let tick = tracker.observe(now_epoch_seconds());
                on_tick(tick.seconds_remaining);
                if tick.boundary_crossed {
                    on_boundary();
                }
            }
        });
        self.handle = Some(handle);
        Ok(())
    }

    /// Abort the timer task. Safe to call repeatedly or when never started.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for CountdownScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Current wall-clock time as whole seconds since the Unix epoch.
fn now_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
