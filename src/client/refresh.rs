//! Scheduled re-validation of the stored session.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::backend::AuthBackend;
use super::machine::{AuthStore, SessionCheck};

/// Delay before the first check, leaving room for a login redirect to settle.
pub const INITIAL_CHECK_DELAY: Duration = Duration::from_secs(5);

/// Interval between recurring checks.
pub const CHECK_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSchedule {
    pub initial_delay: Duration,
    pub interval: Duration,
}

impl Default for RefreshSchedule {
    fn default() -> Self {
        Self {
            initial_delay: INITIAL_CHECK_DELAY,
            interval: CHECK_INTERVAL,
        }
    }
}

/// Running refresh timers. Dropping the loop cancels both of them.
pub struct RefreshLoop {
    initial: JoinHandle<()>,
    recurring: JoinHandle<()>,
}

impl RefreshLoop {
    /// Schedule a one-shot check after `initial_delay` and a recurring check
    /// every `interval`, both starting now. Must be called inside a runtime.
    pub fn start<B>(store: Arc<AuthStore<B>>, schedule: RefreshSchedule) -> Self
    where
        B: AuthBackend + 'static,
    {
        info!(
            initial_delay = ?schedule.initial_delay,
            interval = ?schedule.interval,
            "Starting session refresh"
        );

        let initial = {
            let store = store.clone();
            tokio::spawn(async move {
                tokio::time::sleep(schedule.initial_delay).await;
                report("initial", store.check_auth_state());
            })
        };

        let recurring = tokio::spawn(async move {
            let mut interval =
                tokio::time::interval_at(Instant::now() + schedule.interval, schedule.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                report("recurring", store.check_auth_state());
            }
        });

        Self { initial, recurring }
    }

    /// Stop both timers. Safe to call more than once.
    pub fn cancel(&self) {
        if !self.initial.is_finished() || !self.recurring.is_finished() {
            debug!("Cancelling session refresh");
        }
        self.initial.abort();
        self.recurring.abort();
    }

    /// Whether both timers have stopped.
    pub fn is_finished(&self) -> bool {
        self.initial.is_finished() && self.recurring.is_finished()
    }
}

impl Drop for RefreshLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn report(stage: &str, check: SessionCheck) {
    debug!(stage = stage, outcome = ?check, "Session re-validated");
}
