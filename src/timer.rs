//!
//! Timers for the auto-advance.
//!
//! The timer queue is single threaded. All access goes through
//! `&self`, so it can be shared with `Rc` between the event-loop
//! and any number of carousels.
//!

#[allow(unused_imports)]
use log::debug;
use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::time::{Duration, Instant};

/// Schedule/cancel primitive used by the auto-advance.
pub trait TimerControl: Debug {
    /// Add a timer.
    fn add(&self, t: TimerDef) -> TimerHandle;

    /// Remove a timer. Removing an unknown handle is a noop.
    fn remove(&self, handle: TimerHandle);

    /// Current time as seen by the timers.
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Holds all the timers.
#[derive(Debug, Default)]
pub struct Timers {
    tags: Cell<usize>,
    timers: RefCell<Vec<TimerImpl>>,
    /// Frozen clock. Uses the system clock if None.
    clock: Cell<Option<Instant>>,
}

/// Handle for a submitted timer.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub struct TimerHandle(usize);

#[derive(Debug)]
struct TimerImpl {
    tag: usize,
    count: usize,
    repeat: Option<usize>,
    next: Instant,
    timer: Duration,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timers with a frozen clock. Time only moves with
    /// [Timers::advance] or [Timers::set_now].
    pub fn frozen(now: Instant) -> Self {
        let s = Self::default();
        s.clock.set(Some(now));
        s
    }

    /// Freeze the clock at the given instant.
    pub fn set_now(&self, now: Instant) {
        self.clock.set(Some(now));
    }

    /// Move a frozen clock forward.
    /// Freezes the clock at now+duration if it is not frozen yet.
    pub fn advance(&self, duration: Duration) {
        let now = self.current_time();
        self.clock.set(Some(now + duration));
    }

    fn current_time(&self) -> Instant {
        self.clock.get().unwrap_or_else(Instant::now)
    }

    /// Number of active timers.
    pub fn len(&self) -> usize {
        self.timers.borrow().len()
    }

    /// No active timers.
    pub fn is_empty(&self) -> bool {
        self.timers.borrow().is_empty()
    }

    /// Is this timer still active?
    pub fn contains(&self, handle: TimerHandle) -> bool {
        self.timers.borrow().iter().any(|v| v.tag == handle.0)
    }

    /// Returns the next sleep time.
    pub fn sleep_time(&self) -> Option<Duration> {
        let timers = self.timers.borrow();
        if let Some(timer) = timers.last() {
            let now = self.current_time();
            if now > timer.next {
                Some(Duration::from_nanos(0))
            } else {
                Some(timer.next.duration_since(now))
            }
        } else {
            None
        }
    }

    /// Polls for the next timer event.
    pub fn poll(&self) -> bool {
        let timers = self.timers.borrow();
        if let Some(timer) = timers.last() {
            self.current_time() >= timer.next
        } else {
            false
        }
    }

    /// Polls for the next timer event.
    /// Removes/recalculates the event and reorders the queue.
    pub fn read(&self) -> Option<TimeOut> {
        let mut timers = self.timers.borrow_mut();

        let timer = timers.pop();
        if let Some(mut timer) = timer {
            if self.current_time() >= timer.next {
                let evt = TimeOut {
                    handle: TimerHandle(timer.tag),
                    counter: timer.count,
                };

                // reschedule
                if let Some(repeat) = timer.repeat {
                    timer.count += 1;
                    if timer.count < repeat {
                        timer.next += timer.timer;
                        Self::add_impl(timers.as_mut(), timer);
                    }
                }

                Some(evt)
            } else {
                timers.push(timer);
                None
            }
        } else {
            None
        }
    }

    // Queue is sorted descending by due time. The next due timer is last.
    fn add_impl(timers: &mut Vec<TimerImpl>, t: TimerImpl) {
        'f: {
            for i in 0..timers.len() {
                if timers[i].next <= t.next {
                    timers.insert(i, t);
                    break 'f;
                }
            }
            timers.push(t);
        }
    }
}

impl TimerControl for Timers {
    fn add(&self, t: TimerDef) -> TimerHandle {
        let tag = self.tags.get() + 1;
        self.tags.set(tag);

        let t = TimerImpl {
            tag,
            count: 0,
            repeat: t.repeat,
            next: if let Some(next) = t.next {
                next
            } else {
                self.current_time() + t.timer
            },
            timer: t.timer,
        };

        let mut timers = self.timers.borrow_mut();
        Self::add_impl(timers.as_mut(), t);

        TimerHandle(tag)
    }

    fn remove(&self, tag: TimerHandle) {
        let mut timer = self.timers.borrow_mut();
        for i in 0..timer.len() {
            if timer[i].tag == tag.0 {
                timer.remove(i);
                break;
            }
        }
    }

    fn now(&self) -> Instant {
        self.current_time()
    }
}

/// Timing event data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOut {
    pub handle: TimerHandle,
    pub counter: usize,
}

/// Holds the information to start a timer.
#[derive(Debug, Default)]
pub struct TimerDef {
    /// Optional repeat.
    repeat: Option<usize>,
    /// Duration
    timer: Duration,
    /// Specific time.
    next: Option<Instant>,
}

impl TimerDef {
    pub fn new() -> Self {
        Default::default()
    }

    /// Repeat forever.
    pub fn repeat_forever(mut self) -> Self {
        self.repeat = Some(usize::MAX);
        self
    }

    /// Repeat count.
    pub fn repeat(mut self, repeat: usize) -> Self {
        self.repeat = Some(repeat);
        self
    }

    /// Timer interval.
    pub fn timer(mut self, timer: Duration) -> Self {
        self.timer = timer;
        self
    }

    /// Next time the timer is due. Can set a start delay for a repeating timer,
    /// or as an oneshot event for a given instant.
    pub fn next(mut self, next: Instant) -> Self {
        self.next = Some(next);
        self
    }
}
