//!
//! Paged carousel.
//!
//! Shows one page at a time. The pages can be swiped with the
//! mouse, stepped with the keyboard or advanced automatically
//! by a timer.
//!
//! ```rust ignore
//! use rat_carousel::{Carousel, CarouselConfig, CarouselState, Item};
//! use ratatui::widgets::StatefulWidget;
//! use ratatui::text::Text;
//!
//! let timers = Rc::new(Timers::new());
//!
//! let mut state = CarouselState::named("tips");
//! state.set_timers(timers.clone());
//! state.set_items(vec![
//!     Item::new(1, Text::from("Strong Password Example")),
//!     Item::new(2, Text::from("Use Special Characters")),
//! ]);
//! state.set_config(CarouselConfig::new().auto_scroll(true).interval_ms(3000))?;
//!
//! Carousel::new()
//!     .styles(THEME.carousel_style())
//!     .render(area, frame.buffer_mut(), &mut state);
//!
//! // in the event-loop
//! if let Some(t) = timers.read() {
//!     state.handle(&t, Regular);
//! }
//! state.animate(Instant::now());
//! ```
//!
//! The page content is any `R` where `&R` is a ratatui Widget.
//! It is rendered unchanged, clipped to the visible part of
//! the page.
//!
use crate::_private::NonExhaustive;
use crate::carousel::event::CarouselOutcome;
use crate::config::{CarouselConfig, ConfigError};
use crate::geometry::PageGeometry;
use crate::indicator::{IndicatorStyle, PageIndicator};
use crate::schedule::{next_index, AutoAdvance, ScheduleInputs};
use crate::sync::IndexSync;
use crate::timer::{TimeOut, TimerControl};
use crate::util::{revert_style, transfer_page};
use crate::viewport::{Glide, ViewportController};
use rat_event::util::MouseFlags;
use rat_event::{ct_event, HandleEvent, MouseOnly, Regular};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use rat_reloc::{relocate_area, RelocatableState};
use log::debug;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::prelude::BlockExt;
use ratatui::style::Style;
use ratatui::widgets::{Block, StatefulWidget, Widget};
use std::marker::PhantomData;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// One page of the carousel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item<R> {
    /// Stable identity.
    pub id: u64,
    /// Page content. Rendered as is.
    pub content: R,
}

impl<R> Item<R> {
    pub fn new(id: u64, content: R) -> Self {
        Self { id, content }
    }
}

/// Carousel widget.
///
/// `R` is the page content of the matching [CarouselState].
#[derive(Debug, Clone)]
pub struct Carousel<'a, R> {
    style: Style,
    focus_style: Option<Style>,
    page_style: Option<Style>,
    block: Option<Block<'a>>,
    indicator: IndicatorStyle,
    phantom: PhantomData<fn(&R)>,
}

/// Combined styles.
#[derive(Debug, Clone)]
pub struct CarouselStyle {
    /// Base style.
    pub style: Style,
    /// Focused style.
    pub focus: Option<Style>,
    /// Page background.
    pub page: Option<Style>,
    /// Border
    pub block: Option<Block<'static>>,
    /// Page markers.
    pub indicator: Option<IndicatorStyle>,

    pub non_exhaustive: NonExhaustive,
}

/// State & event-handling.
///
/// This owns the complete paging state of one carousel.
/// It is created with an unknown page width, which is set by
/// the first render.
#[derive(Debug)]
pub struct CarouselState<R> {
    /// Complete area.
    /// __read only__. renewed for each render.
    pub area: Rect,
    /// Area inside the block.
    /// __read only__. renewed for each render.
    pub inner: Rect,
    /// Area for the pages.
    /// __read only__. renewed for each render.
    pub page_area: Rect,
    /// Area for the page markers.
    /// __read only__. renewed for each render.
    pub indicator_area: Rect,

    /// Pages
    items: Vec<Item<R>>,
    config: CarouselConfig,

    geometry: PageGeometry,
    sync: IndexSync,
    advance: AutoAdvance,
    viewport: ViewportController<Glide>,
    timers: Option<Rc<dyn TimerControl>>,

    /// Target of a programmatic scroll that has not yet
    /// been reported by the surface.
    in_flight: Option<usize>,
    /// Last column of a mouse drag.
    drag_column: Option<u16>,
    /// Unmounted state never arms the timer again.
    unmounted: bool,

    /// Current focus state.
    /// __read+write__
    pub focus: FocusFlag,
    /// Mouse helper
    /// __read+write__
    pub mouse: MouseFlags,

    pub non_exhaustive: NonExhaustive,
}

pub(crate) mod event {
    use rat_event::{ConsumedEvent, Outcome};

    /// Result value for event-handling.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub enum CarouselOutcome {
        /// The given event was not handled at all.
        Continue,
        /// The event was handled, no repaint necessary.
        Unchanged,
        /// The event was handled, repaint necessary.
        Changed,
        /// The current page changed.
        Page(usize),
    }

    impl ConsumedEvent for CarouselOutcome {
        fn is_consumed(&self) -> bool {
            *self != CarouselOutcome::Continue
        }
    }

    impl From<bool> for CarouselOutcome {
        fn from(value: bool) -> Self {
            if value {
                CarouselOutcome::Changed
            } else {
                CarouselOutcome::Unchanged
            }
        }
    }

    impl From<CarouselOutcome> for Outcome {
        fn from(value: CarouselOutcome) -> Self {
            match value {
                CarouselOutcome::Continue => Outcome::Continue,
                CarouselOutcome::Unchanged => Outcome::Unchanged,
                CarouselOutcome::Changed => Outcome::Changed,
                CarouselOutcome::Page(_) => Outcome::Changed,
            }
        }
    }
}

impl Default for CarouselStyle {
    fn default() -> Self {
        Self {
            style: Default::default(),
            focus: None,
            page: None,
            block: None,
            indicator: None,
            non_exhaustive: NonExhaustive,
        }
    }
}

impl<R> Default for Carousel<'_, R> {
    fn default() -> Self {
        Self {
            style: Default::default(),
            focus_style: None,
            page_style: None,
            block: None,
            indicator: Default::default(),
            phantom: PhantomData,
        }
    }
}

impl<'a, R> Carousel<'a, R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set all styles.
    pub fn styles(mut self, styles: CarouselStyle) -> Self {
        self.style = styles.style;
        if styles.focus.is_some() {
            self.focus_style = styles.focus;
        }
        if styles.page.is_some() {
            self.page_style = styles.page;
        }
        if let Some(block) = styles.block {
            self.block = Some(block);
        }
        if let Some(indicator) = styles.indicator {
            self.indicator = indicator;
        }
        self.block = self.block.map(|v| v.style(self.style));
        self
    }

    /// Base style.
    #[inline]
    pub fn style(mut self, style: impl Into<Style>) -> Self {
        self.style = style.into();
        self
    }

    /// Style when focused. Applied to the page markers.
    #[inline]
    pub fn focus_style(mut self, style: impl Into<Style>) -> Self {
        self.focus_style = Some(style.into());
        self
    }

    /// Page background. The item_style of the config
    /// overrides this.
    #[inline]
    pub fn page_style(mut self, style: impl Into<Style>) -> Self {
        self.page_style = Some(style.into());
        self
    }

    /// Styles for the page markers.
    #[inline]
    pub fn indicator_style(mut self, style: IndicatorStyle) -> Self {
        self.indicator = style;
        self
    }

    /// Block.
    #[inline]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self.block = self.block.map(|v| v.style(self.style));
        self
    }
}

impl<R> StatefulWidget for &Carousel<'_, R>
where
    for<'b> &'b R: Widget,
{
    type State = CarouselState<R>;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        render_ref(self, area, buf, state);
    }
}

impl<R> StatefulWidget for Carousel<'_, R>
where
    for<'b> &'b R: Widget,
{
    type State = CarouselState<R>;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        render_ref(&self, area, buf, state);
    }
}

fn render_ref<R>(
    widget: &Carousel<'_, R>,
    area: Rect,
    buf: &mut Buffer,
    state: &mut CarouselState<R>,
) where
    for<'b> &'b R: Widget,
{
    state.area = area;
    state.inner = widget.block.inner_if_some(area);

    if state.config.show_indicators && state.inner.height > 1 {
        state.page_area = Rect::new(
            state.inner.x,
            state.inner.y,
            state.inner.width,
            state.inner.height - 1,
        );
        state.indicator_area = Rect::new(
            state.inner.x,
            state.inner.bottom() - 1,
            state.inner.width,
            1,
        );
    } else {
        state.page_area = state.inner;
        state.indicator_area = Rect::new(state.inner.x, state.inner.bottom(), state.inner.width, 0);
    }

    state.on_layout_measured(state.page_area.width as f32);

    if let Some(block) = &widget.block {
        block.render(area, buf);
    } else {
        buf.set_style(area, widget.style);
    }

    let page_style = state
        .config
        .item_style
        .or(widget.page_style)
        .unwrap_or(widget.style);

    if state.geometry.is_known() {
        let page_width = state.geometry.page_width();
        let offset = state.viewport.surface().offset();
        let page = Rect::new(0, 0, state.page_area.width, state.page_area.height);

        for (i, item) in state.items.iter().enumerate() {
            let x_pos = (i as f32 * page_width - offset).round() as i32;
            if x_pos >= state.page_area.width as i32 || x_pos + (page.width as i32) <= 0 {
                continue;
            }
            let mut tmp = Buffer::empty(page);
            tmp.set_style(page, page_style);
            (&item.content).render(page, &mut tmp);
            transfer_page(&mut tmp, x_pos, state.page_area, buf);
        }
    }

    if state.config.show_indicators {
        let mut indicator = widget.indicator.clone();
        if state.is_focused() {
            let focus_style = if let Some(focus_style) = widget.focus_style {
                indicator.style.patch(focus_style)
            } else {
                revert_style(indicator.style)
            };
            indicator.style = focus_style;
        }
        PageIndicator::new(state.sync.current(), state.sync.len())
            .styles(indicator)
            .render(state.indicator_area, buf);
    }
}

impl<R> Default for CarouselState<R> {
    fn default() -> Self {
        Self {
            area: Default::default(),
            inner: Default::default(),
            page_area: Default::default(),
            indicator_area: Default::default(),
            items: Default::default(),
            config: Default::default(),
            geometry: Default::default(),
            sync: Default::default(),
            advance: Default::default(),
            viewport: Default::default(),
            timers: None,
            in_flight: None,
            drag_column: None,
            unmounted: false,
            focus: Default::default(),
            mouse: Default::default(),
            non_exhaustive: NonExhaustive,
        }
    }
}

impl<R> HasFocus for CarouselState<R> {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.focus.clone()
    }

    fn area(&self) -> Rect {
        self.area
    }
}

impl<R> RelocatableState for CarouselState<R> {
    fn relocate(&mut self, shift: (i16, i16), clip: Rect) {
        self.area = relocate_area(self.area, shift, clip);
        self.inner = relocate_area(self.inner, shift, clip);
        self.page_area = relocate_area(self.page_area, shift, clip);
        self.indicator_area = relocate_area(self.indicator_area, shift, clip);
    }
}

impl<R> CarouselState<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: &str) -> Self {
        Self {
            focus: FocusFlag::new().with_name(name),
            ..Default::default()
        }
    }

    /// Timers for the auto-advance.
    ///
    /// Without timers the auto-advance stays idle.
    pub fn set_timers(&mut self, timers: Rc<dyn TimerControl>) {
        self.timers = Some(timers.clone());
        if self.unmounted {
            return;
        }
        self.advance.set_timers(timers);
        self.reschedule();
    }

    fn now(&self) -> Instant {
        match &self.timers {
            Some(timers) => timers.now(),
            None => Instant::now(),
        }
    }

    /// Pages.
    pub fn items(&self) -> &[Item<R>] {
        &self.items
    }

    /// Replace all pages.
    ///
    /// If the sequence shrank the current page is clamped to
    /// the last page.
    pub fn set_items(&mut self, items: Vec<Item<R>>) {
        self.items = items;
        let clamped = self.sync.set_len(self.items.len());

        if let Some(target) = self.in_flight {
            if target >= self.items.len() {
                self.in_flight = None;
            }
        }
        self.update_bounds();
        if clamped && self.geometry.is_known() {
            let offset = self.sync.index_to_offset(&self.geometry, self.sync.current());
            self.viewport.surface_mut().place(offset);
        }
        self.reschedule();
    }

    /// Configuration.
    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Replace the configuration.
    ///
    /// An invalid configuration is rejected and the previous
    /// configuration stays active.
    pub fn set_config(&mut self, config: CarouselConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.reschedule();
        Ok(())
    }

    /// Page geometry.
    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Auto-advance.
    pub fn auto_advance(&self) -> &AutoAdvance {
        &self.advance
    }

    /// Scroll surface.
    pub fn surface(&self) -> &Glide {
        self.viewport.surface()
    }

    /// Scroll surface.
    pub fn surface_mut(&mut self) -> &mut Glide {
        self.viewport.surface_mut()
    }

    /// Current page. Is 0 if there are no pages.
    pub fn current(&self) -> usize {
        self.sync.current()
    }

    /// Current item.
    pub fn current_item(&self) -> Option<&Item<R>> {
        self.items.get(self.sync.current())
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Target of a running programmatic scroll.
    pub fn in_flight(&self) -> Option<usize> {
        self.in_flight
    }

    /// Layout has been measured. Called by render.
    ///
    /// The physical offset is rescaled to the new page width,
    /// a running scroll continues toward its rescaled target.
    pub fn on_layout_measured(&mut self, observed_width: f32) -> bool {
        let old_width = self.geometry.page_width();
        if !self.geometry.on_layout_measured(observed_width) {
            return false;
        }
        let new_width = self.geometry.page_width();
        if old_width > 0.0 && new_width > 0.0 {
            self.viewport.surface_mut().rescale(old_width, new_width);
            self.update_bounds();
            if !self.is_dragging() && self.viewport.surface().target().is_none() {
                let offset = self.sync.index_to_offset(&self.geometry, self.sync.current());
                self.viewport.surface_mut().place(offset);
            }
        } else if new_width > 0.0 {
            self.update_bounds();
            let offset = self.sync.index_to_offset(&self.geometry, self.sync.current());
            self.viewport.surface_mut().place(offset);
        }
        true
    }

    fn update_bounds(&mut self) {
        let max_offset = self.sync.max_offset(&self.geometry);
        self.viewport.surface_mut().set_max_offset(max_offset);
    }

    /// The scroll surface reports a position.
    ///
    /// While a programmatic scroll is in flight the current page
    /// already is the target, and reports on the way there are
    /// not applied. The flight ends when the target is reached.
    ///
    /// Returns the current page.
    pub fn on_scroll_position_changed(&mut self, offset_x: f32) -> usize {
        if let Some(target) = self.in_flight {
            let target_offset = self.sync.index_to_offset(&self.geometry, target);
            if (offset_x - target_offset).abs() < 0.5 {
                self.in_flight = None;
            } else {
                return self.sync.current();
            }
        }

        let old_current = self.sync.current();
        let current = self
            .viewport
            .report_scroll(&self.geometry, &mut self.sync, offset_x);
        if old_current != current {
            self.reschedule();
        }
        current
    }

    /// Offset of the given page.
    pub fn index_to_offset(&self, index: usize) -> f32 {
        self.sync.index_to_offset(&self.geometry, index)
    }

    /// Scroll to the page. The index is clamped.
    ///
    /// The current page switches to the target at once.
    /// Deferred while the layout is unknown, returns false then.
    pub fn scroll_to_index(&mut self, index: usize, animated: bool) -> bool {
        if self.sync.is_empty() {
            return false;
        }
        let index = self.sync.clamp(index);
        if !self
            .viewport
            .scroll_to_index(&self.geometry, &self.sync, index, animated)
        {
            return false;
        }
        self.in_flight = Some(index);
        if self.sync.set_current(index) {
            self.reschedule();
        }
        true
    }

    /// Next page. Doesn't wrap around.
    pub fn next(&mut self) -> bool {
        let current = self.sync.current();
        if current + 1 < self.len() {
            self.scroll_to_index(current + 1, true)
        } else {
            false
        }
    }

    /// Previous page. Doesn't wrap around.
    pub fn prev(&mut self) -> bool {
        let current = self.sync.current();
        if current > 0 {
            self.scroll_to_index(current - 1, true)
        } else {
            false
        }
    }

    /// First page.
    pub fn first(&mut self) -> bool {
        if self.sync.current() != 0 {
            self.scroll_to_index(0, true)
        } else {
            false
        }
    }

    /// Last page.
    pub fn last(&mut self) -> bool {
        let last = self.len().saturating_sub(1);
        if self.sync.current() != last {
            self.scroll_to_index(last, true)
        } else {
            false
        }
    }

    /// Auto-advance wake.
    ///
    /// Scrolls to the next page, from the last page back to the
    /// first. Does nothing for wakes of cancelled timers, before
    /// the first layout, during a mouse drag or with a single page.
    pub fn advance(&mut self, timeout: &TimeOut) -> CarouselOutcome {
        if !self.advance.accept(timeout) {
            return CarouselOutcome::Continue;
        }
        if self.is_dragging() {
            debug!("auto-advance skipped, drag running");
            return CarouselOutcome::Unchanged;
        }
        if !self.geometry.is_known() {
            debug!("auto-advance deferred, no layout yet");
            return CarouselOutcome::Unchanged;
        }
        let current = self.sync.current();
        let Some(next) = next_index(current, self.len()) else {
            return CarouselOutcome::Unchanged;
        };
        if next == current {
            return CarouselOutcome::Unchanged;
        }
        if self.scroll_to_index(next, true) {
            CarouselOutcome::Page(next)
        } else {
            CarouselOutcome::Unchanged
        }
    }

    /// Drive the scroll surface and apply its position report.
    ///
    /// Call this regularly while [CarouselState::is_animating].
    pub fn animate(&mut self, now: Instant) -> CarouselOutcome {
        let active = self.viewport.surface().is_active();
        let old_current = self.sync.current();

        if let Some(offset) = self.viewport.surface_mut().tick(now) {
            self.on_scroll_position_changed(offset);
        }

        if self.sync.current() != old_current {
            CarouselOutcome::Page(self.sync.current())
        } else if active {
            CarouselOutcome::Changed
        } else {
            CarouselOutcome::Continue
        }
    }

    /// The surface is moving or has a report pending.
    pub fn is_animating(&self) -> bool {
        self.viewport.surface().is_active()
    }

    /// Time until [CarouselState::animate] should be called.
    pub fn animation_wait(&self) -> Option<Duration> {
        self.viewport.surface().wait_time(self.now())
    }

    /// Start of a manual gesture at the given column.
    /// Interrupts any running scroll, the last report wins.
    pub fn drag_start(&mut self, column: u16) {
        self.drag_column = Some(column);
        self.in_flight = None;
        self.viewport.surface_mut().drag_by(0.0);
    }

    /// Manual gesture moved to the column.
    pub fn drag_to(&mut self, column: u16) -> CarouselOutcome {
        let Some(last) = self.drag_column else {
            return CarouselOutcome::Continue;
        };
        self.drag_column = Some(column);
        self.in_flight = None;
        let delta = last as f32 - column as f32;
        if delta != 0.0 {
            self.viewport.surface_mut().drag_by(delta);
        }
        let now = self.now();
        match self.animate(now) {
            CarouselOutcome::Continue => CarouselOutcome::Unchanged,
            r => r,
        }
    }

    /// End of a manual gesture. Snaps to the nearest page.
    pub fn drag_end(&mut self) -> CarouselOutcome {
        if self.drag_column.take().is_none() {
            return CarouselOutcome::Continue;
        }
        let offset = self.viewport.surface().offset();
        let index = self.sync.index_at(&self.geometry, offset);
        let old_current = self.sync.current();
        if self.scroll_to_index(index, true) && index != old_current {
            CarouselOutcome::Page(index)
        } else {
            CarouselOutcome::Changed
        }
    }

    /// Is a manual gesture running?
    pub fn is_dragging(&self) -> bool {
        self.drag_column.is_some()
    }

    /// The widget goes away. Cancels the auto-advance for good.
    pub fn unmount(&mut self) {
        self.unmounted = true;
        self.advance.disarm();
    }

    fn reschedule(&mut self) {
        if self.unmounted {
            return;
        }
        self.advance.sync(ScheduleInputs {
            auto_scroll: self.config.auto_scroll,
            interval: self.config.auto_scroll_interval,
            len: self.items.len(),
            current: self.sync.current(),
        });
    }
}

impl<R> HandleEvent<crossterm::event::Event, Regular, CarouselOutcome> for CarouselState<R> {
    fn handle(&mut self, event: &crossterm::event::Event, _qualifier: Regular) -> CarouselOutcome {
        let r = if self.is_focused() {
            let old_current = self.current();
            let moved = match event {
                ct_event!(keycode press Left) => Some(self.prev()),
                ct_event!(keycode press Right) => Some(self.next()),
                ct_event!(keycode press Home) => Some(self.first()),
                ct_event!(keycode press End) => Some(self.last()),
                _ => None,
            };
            match moved {
                Some(true) if self.current() != old_current => CarouselOutcome::Page(self.current()),
                Some(true) => CarouselOutcome::Changed,
                Some(false) => CarouselOutcome::Unchanged,
                None => CarouselOutcome::Continue,
            }
        } else {
            CarouselOutcome::Continue
        };

        if r == CarouselOutcome::Continue {
            HandleEvent::handle(self, event, MouseOnly)
        } else {
            r
        }
    }
}

impl<R> HandleEvent<crossterm::event::Event, MouseOnly, CarouselOutcome> for CarouselState<R> {
    fn handle(&mut self, event: &crossterm::event::Event, _qualifier: MouseOnly) -> CarouselOutcome {
        match event {
            ct_event!(mouse down Left for x, y) if self.page_area.contains((*x, *y).into()) => {
                self.drag_start(*x);
                CarouselOutcome::Unchanged
            }
            ct_event!(mouse drag Left for x, _y) if self.is_dragging() => self.drag_to(*x),
            ct_event!(mouse up Left for _x, _y) if self.is_dragging() => self.drag_end(),
            ct_event!(scroll right for x, y) if self.page_area.contains((*x, *y).into()) => {
                let old_current = self.current();
                if self.next() && self.current() != old_current {
                    CarouselOutcome::Page(self.current())
                } else {
                    CarouselOutcome::Unchanged
                }
            }
            ct_event!(scroll left for x, y) if self.page_area.contains((*x, *y).into()) => {
                let old_current = self.current();
                if self.prev() && self.current() != old_current {
                    CarouselOutcome::Page(self.current())
                } else {
                    CarouselOutcome::Unchanged
                }
            }
            _ => CarouselOutcome::Continue,
        }
    }
}

impl<R> HandleEvent<TimeOut, Regular, CarouselOutcome> for CarouselState<R> {
    fn handle(&mut self, event: &TimeOut, _qualifier: Regular) -> CarouselOutcome {
        self.advance(event)
    }
}

/// Handle all events.
/// Key events are only processed if focus is true.
/// Mouse events are processed if they are in range.
pub fn handle_events<R>(
    state: &mut CarouselState<R>,
    focus: bool,
    event: &crossterm::event::Event,
) -> CarouselOutcome {
    state.focus.set(focus);
    HandleEvent::handle(state, event, Regular)
}

/// Handle only mouse-events.
pub fn handle_mouse_events<R>(
    state: &mut CarouselState<R>,
    event: &crossterm::event::Event,
) -> CarouselOutcome {
    HandleEvent::handle(state, event, MouseOnly)
}
