//!
//! Viewport controller and scroll surfaces.
//!
//! Scroll commands are one-way. The surface moves, and reports
//! its position later on, at a bounded rate. The last report
//! always wins, there is no acknowledgement for a command.
//!

use crate::geometry::PageGeometry;
use crate::sync::IndexSync;
#[allow(unused_imports)]
use log::{debug, trace};
use std::time::{Duration, Instant};

/// The physical scrollable surface.
pub trait ScrollSurface {
    /// Move to the given offset.
    ///
    /// Fire and forget. The new position shows up with the
    /// next position reports of the surface.
    fn scroll_to(&mut self, offset: f32, animated: bool);
}

/// Issues scroll commands to the surface and forwards the
/// position reports.
///
/// Holds no state apart from the surface.
#[derive(Debug, Default, Clone)]
pub struct ViewportController<S> {
    surface: S,
}

impl<S> ViewportController<S>
where
    S: ScrollSurface,
{
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Move the surface to the page.
    ///
    /// Deferred while the page width is unknown, returns false then.
    pub fn scroll_to_index(
        &mut self,
        geometry: &PageGeometry,
        sync: &IndexSync,
        index: usize,
        animated: bool,
    ) -> bool {
        if !geometry.is_known() {
            debug!("scroll to page {} deferred, no layout yet", index);
            return false;
        }
        let offset = sync.index_to_offset(geometry, index);
        self.surface.scroll_to(offset, animated);
        true
    }

    /// The surface reports a position.
    pub fn report_scroll(
        &mut self,
        geometry: &PageGeometry,
        sync: &mut IndexSync,
        offset_x: f32,
    ) -> usize {
        sync.on_scroll_position_changed(geometry, offset_x)
    }
}

/// Limits the rate of position reports.
///
/// Only the latest position is kept between two reports.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollThrottle {
    min_gap: Duration,
    last: Option<Instant>,
    pending: Option<f32>,
}

/// Default gap between two reports. About 60 Hz.
pub const REPORT_GAP: Duration = Duration::from_millis(16);

impl Default for ScrollThrottle {
    fn default() -> Self {
        Self {
            min_gap: REPORT_GAP,
            last: None,
            pending: None,
        }
    }
}

impl ScrollThrottle {
    pub fn new(min_gap: Duration) -> Self {
        Self {
            min_gap,
            ..Default::default()
        }
    }

    /// Minimum time between two reports.
    pub fn min_gap(&self) -> Duration {
        self.min_gap
    }

    /// Note a new position. Replaces any older position
    /// that has not been reported yet.
    pub fn report(&mut self, offset: f32) {
        self.pending = Some(offset);
    }

    /// Is there a position waiting?
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time until the pending position can be reported.
    pub fn wait_time(&self, now: Instant) -> Option<Duration> {
        self.pending?;
        match self.last {
            None => Some(Duration::ZERO),
            Some(last) => Some((last + self.min_gap).saturating_duration_since(now)),
        }
    }

    /// Returns the pending position if the last report is
    /// at least min_gap in the past.
    pub fn poll(&mut self, now: Instant) -> Option<f32> {
        let pending = self.pending?;
        let due = match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.min_gap,
        };
        if due {
            self.last = Some(now);
            self.pending = None;
            Some(pending)
        } else {
            None
        }
    }
}

/// Built-in animated surface.
///
/// Tracks the physical offset. Animated commands ease toward
/// their target, each [Glide::tick] moves the offset and may
/// produce a throttled position report.
#[derive(Debug, Clone)]
pub struct Glide {
    offset: f32,
    max_offset: f32,

    anim_from: f32,
    anim_to: Option<f32>,
    anim_start: Option<Instant>,
    duration: Duration,

    throttle: ScrollThrottle,

    /// Number of scroll commands received.
    commands: usize,
}

/// Default duration for an animated scroll.
pub const GLIDE_DURATION: Duration = Duration::from_millis(300);

impl Default for Glide {
    fn default() -> Self {
        Self {
            offset: 0.0,
            max_offset: 0.0,
            anim_from: 0.0,
            anim_to: None,
            anim_start: None,
            duration: GLIDE_DURATION,
            throttle: Default::default(),
            commands: 0,
        }
    }
}

impl ScrollSurface for Glide {
    fn scroll_to(&mut self, offset: f32, animated: bool) {
        self.commands += 1;
        let offset = self.limit(offset);
        trace!("glide to {} animated={}", offset, animated);
        if animated && self.duration > Duration::ZERO {
            self.anim_from = self.offset;
            self.anim_to = Some(offset);
            self.anim_start = None;
        } else {
            self.anim_to = None;
            self.anim_start = None;
            self.offset = offset;
            self.throttle.report(offset);
        }
    }
}

impl Glide {
    pub fn new() -> Self {
        Self::default()
    }

    /// Duration of an animated scroll.
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// Replace the report throttle.
    pub fn set_throttle(&mut self, throttle: ScrollThrottle) {
        self.throttle = throttle;
    }

    /// Physical offset.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Target of a running animation.
    pub fn target(&self) -> Option<f32> {
        self.anim_to
    }

    /// Number of scroll commands received.
    pub fn commands(&self) -> usize {
        self.commands
    }

    /// Animation running or a position not yet reported?
    pub fn is_active(&self) -> bool {
        self.anim_to.is_some() || self.throttle.is_pending()
    }

    /// Time until the next tick does something useful.
    pub fn wait_time(&self, now: Instant) -> Option<Duration> {
        if self.anim_to.is_some() {
            Some(self.throttle.min_gap())
        } else {
            self.throttle.wait_time(now)
        }
    }

    /// Limit for the offset.
    pub fn set_max_offset(&mut self, max_offset: f32) {
        self.max_offset = max_offset.max(0.0);
        self.offset = self.limit(self.offset);
        if let Some(to) = self.anim_to {
            self.anim_to = Some(self.limit(to));
        }
    }

    fn limit(&self, offset: f32) -> f32 {
        offset.clamp(0.0, self.max_offset)
    }

    /// Rescale all positions after the page width changed.
    /// A running animation continues toward the rescaled target.
    pub fn rescale(&mut self, old_width: f32, new_width: f32) {
        if old_width <= 0.0 {
            return;
        }
        let scale = |v: f32| v / old_width * new_width;
        self.offset = scale(self.offset);
        self.anim_from = scale(self.anim_from);
        if let Some(to) = self.anim_to {
            self.anim_to = Some(scale(to));
        }
    }

    /// Place the surface without a scroll command.
    /// Used after the first layout.
    pub fn place(&mut self, offset: f32) {
        self.anim_to = None;
        self.anim_start = None;
        self.offset = self.limit(offset);
        self.throttle.report(self.offset);
    }

    /// Manual gesture. Moves immediately and interrupts
    /// any running animation.
    pub fn drag_by(&mut self, delta: f32) {
        if self.anim_to.is_some() {
            trace!("glide interrupted at {}", self.offset);
        }
        self.anim_to = None;
        self.anim_start = None;
        self.offset = self.limit(self.offset + delta);
        self.throttle.report(self.offset);
    }

    /// Advance the animation. Returns a position report
    /// if one is due.
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        if let Some(to) = self.anim_to {
            let start = *self.anim_start.get_or_insert(now);
            let elapsed = now.saturating_duration_since(start);
            if elapsed >= self.duration {
                self.offset = to;
                self.anim_to = None;
                self.anim_start = None;
            } else {
                let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
                self.offset = self.anim_from + (to - self.anim_from) * ease_out(t);
            }
            self.throttle.report(self.offset);
        }
        self.throttle.poll(now)
    }
}

/// Cubic ease-out.
fn ease_out(t: f32) -> f32 {
    let r = 1.0 - t.clamp(0.0, 1.0);
    1.0 - r * r * r
}

#[cfg(test)]
mod tests {
    use super::{ease_out, ScrollThrottle};
    use std::time::{Duration, Instant};

    #[test]
    fn test_ease() {
        assert_eq!(ease_out(0.0), 0.0);
        assert_eq!(ease_out(1.0), 1.0);
        assert!(ease_out(0.5) > 0.5);
    }

    #[test]
    fn test_rescale_exact() {
        let mut g = super::Glide::new();
        g.set_max_offset(1000.0);
        g.place(300.0);
        for (old, new) in [(100.0, 60.0), (60.0, 77.0), (77.0, 33.0), (33.0, 100.0)] {
            g.set_max_offset(new * 10.0);
            g.rescale(old, new);
        }
        assert_eq!(g.offset(), 300.0);
    }

    #[test]
    fn test_throttle() {
        let now = Instant::now();
        let mut t = ScrollThrottle::new(Duration::from_millis(16));
        assert_eq!(t.poll(now), None);

        t.report(1.0);
        assert_eq!(t.poll(now), Some(1.0));

        t.report(2.0);
        t.report(3.0);
        assert_eq!(t.poll(now + Duration::from_millis(5)), None);
        assert_eq!(t.poll(now + Duration::from_millis(16)), Some(3.0));
        assert!(!t.is_pending());
    }
}
