//!
//! Auto-advance scheduler.
//!
//! A recurring timer that requests the next page. The timer is
//! owned by the scheduler and is cancelled whenever one of the
//! inputs in [ScheduleInputs] changes, and when the scheduler
//! is dropped.
//!
//! ```text
//!   Idle ──(auto_scroll && len > 0)──► Armed
//!   Armed ──(!auto_scroll || len == 0 || disarm)──► Idle
//!   Armed ──(auto_scroll | interval | current changed)──► Armed (from zero)
//! ```
//!

use crate::timer::{TimeOut, TimerControl, TimerDef, TimerHandle};
#[allow(unused_imports)]
use log::debug;
use std::rc::Rc;
use std::time::Duration;

/// Scheduler state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceState {
    /// No timer.
    #[default]
    Idle,
    /// Timer running.
    Armed(TimerHandle),
}

/// Everything the scheduler depends on.
///
/// A change of `auto_scroll`, `interval` or `current` re-arms
/// a running timer. `len` only switches between Idle and Armed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleInputs {
    pub auto_scroll: bool,
    pub interval: Duration,
    pub len: usize,
    pub current: usize,
}

impl ScheduleInputs {
    /// Can a timer run at all?
    pub fn enabled(&self) -> bool {
        self.auto_scroll && self.len > 0 && !self.interval.is_zero()
    }

    /// Does the change from `self` to `other` require a fresh timer?
    pub fn rearm_needed(&self, other: &ScheduleInputs) -> bool {
        self.auto_scroll != other.auto_scroll
            || self.interval != other.interval
            || self.current != other.current
    }
}

/// Auto-advance scheduler.
#[derive(Debug, Default)]
pub struct AutoAdvance {
    timers: Option<Rc<dyn TimerControl>>,
    state: AdvanceState,
    /// Last inputs given to sync().
    applied: ScheduleInputs,
}

/// Next page after current, wrapping around to the first page.
///
/// Returns None if there are no pages.
pub fn next_index(current: usize, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some((current + 1) % len)
    }
}

impl AutoAdvance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler using the given timers.
    pub fn with_timers(timers: Rc<dyn TimerControl>) -> Self {
        Self {
            timers: Some(timers),
            ..Default::default()
        }
    }

    /// Replace the timers. Any running timer is cancelled
    /// with the old timers, and then re-armed with the new ones.
    pub fn set_timers(&mut self, timers: Rc<dyn TimerControl>) {
        self.disarm();
        self.timers = Some(timers);
        let inputs = self.applied;
        self.apply(inputs, true);
    }

    /// Current state.
    pub fn state(&self) -> AdvanceState {
        self.state
    }

    /// Is a timer running?
    pub fn is_armed(&self) -> bool {
        matches!(self.state, AdvanceState::Armed(_))
    }

    /// Last inputs.
    pub fn inputs(&self) -> ScheduleInputs {
        self.applied
    }

    /// Bring the scheduler in line with the inputs.
    ///
    /// Returns true if a new timer has been started.
    pub fn sync(&mut self, inputs: ScheduleInputs) -> bool {
        let rearm = self.applied.rearm_needed(&inputs);
        self.apply(inputs, rearm)
    }

    fn apply(&mut self, inputs: ScheduleInputs, rearm: bool) -> bool {
        self.applied = inputs;

        if !inputs.enabled() {
            self.disarm();
            return false;
        }
        match self.state {
            AdvanceState::Idle => self.arm(),
            AdvanceState::Armed(_) if rearm => {
                self.disarm();
                self.arm()
            }
            AdvanceState::Armed(_) => false,
        }
    }

    fn arm(&mut self) -> bool {
        let Some(timers) = &self.timers else {
            debug!("auto-advance without timers");
            return false;
        };
        let handle = timers.add(
            TimerDef::new()
                .timer(self.applied.interval)
                .next(timers.now() + self.applied.interval)
                .repeat_forever(),
        );
        debug!(
            "auto-advance armed {:?} every {:?} from page {}",
            handle, self.applied.interval, self.applied.current
        );
        self.state = AdvanceState::Armed(handle);
        true
    }

    /// Cancel the timer, if any.
    pub fn disarm(&mut self) {
        if let AdvanceState::Armed(handle) = self.state {
            if let Some(timers) = &self.timers {
                timers.remove(handle);
            }
            debug!("auto-advance disarmed {:?}", handle);
        }
        self.state = AdvanceState::Idle;
    }

    /// Is this wake from the current timer?
    ///
    /// Wakes of cancelled timers may still be in flight in the
    /// event queue. Those are not accepted.
    pub fn accept(&self, timeout: &TimeOut) -> bool {
        match self.state {
            AdvanceState::Armed(handle) if handle == timeout.handle => true,
            AdvanceState::Armed(_) | AdvanceState::Idle => {
                debug!("stale auto-advance wake {:?}", timeout.handle);
                false
            }
        }
    }

    /// Page to advance to on the next wake.
    pub fn next_index(&self) -> Option<usize> {
        next_index(self.applied.current, self.applied.len)
    }
}

impl Drop for AutoAdvance {
    fn drop(&mut self) {
        self.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::next_index;

    #[test]
    fn test_next_index() {
        assert_eq!(next_index(0, 0), None);
        assert_eq!(next_index(0, 1), Some(0));
        assert_eq!(next_index(0, 3), Some(1));
        assert_eq!(next_index(2, 3), Some(0));
    }
}
