//! Cancelable repeating task driving the reveal animation.

use std::ops::ControlFlow;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Default time between revealed characters.
pub const DEFAULT_TICK: Duration = Duration::from_millis(40);

/// Shortest period a timer runs at; `tokio::time::interval` rejects zero.
pub const MIN_TICK: Duration = Duration::from_millis(1);

/// Handle to a running reveal timer. Dropping it cancels the timer.
#[derive(Debug)]
pub struct RevealHandle {
    task: JoinHandle<()>,
}

impl RevealHandle {
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RevealHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Owns at most one repeating reveal task.
#[derive(Debug, Default)]
pub struct RevealTimer {
    current: Option<RevealHandle>,
}

impl RevealTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `on_tick` every `period` until it breaks, replacing (and
    /// cancelling) any timer started earlier.
    ///
    /// The first call happens one full period after start. Periods below
    /// [`MIN_TICK`] are raised to it. Must be called from within a tokio
    /// runtime.
    pub fn start<F>(&mut self, period: Duration, mut on_tick: F) -> &RevealHandle
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        self.cancel();
        let period = period.max(MIN_TICK);

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of an interval completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                if on_tick().is_break() {
                    break;
                }
            }
        });

        self.current.insert(RevealHandle { task })
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.current.take() {
            handle.cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}
