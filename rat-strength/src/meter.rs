//!
//! Strength bar and level text.
//!
//! ```text
//! ██████████░░░░░░░░░░
//! Strength: Medium
//! ```
//!
//! Changes of the fill are animated over [FILL_DURATION].
//! Call [StrengthMeterState::tick] from the event loop
//! while [StrengthMeterState::is_animating].
//!

use crate::_private::NonExhaustive;
use crate::rules::{Strength, StrengthColor};
use log::trace;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::prelude::BlockExt;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, StatefulWidget, Widget};
use std::time::{Duration, Instant};

/// Duration of the fill animation.
pub const FILL_DURATION: Duration = Duration::from_millis(300);

/// Shows the strength of a password.
#[derive(Debug, Clone)]
pub struct StrengthMeter<'a> {
    style: Style,
    label_style: Option<Style>,
    empty_style: Option<Style>,
    label: &'a str,
    bar_symbol: &'a str,
    empty_symbol: &'a str,
    enable_color_bar: bool,
    block: Option<Block<'a>>,
}

/// Combined styles.
#[derive(Debug, Clone)]
pub struct StrengthMeterStyle {
    pub style: Style,
    pub label: Option<Style>,
    pub empty: Option<Style>,
    pub block: Option<Block<'static>>,
    pub bar_symbol: Option<&'static str>,
    pub empty_symbol: Option<&'static str>,

    pub non_exhaustive: NonExhaustive,
}

/// Moves the shown fill toward a target.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FillAnimation {
    shown: f32,
    from: f32,
    target: f32,
    start: Option<Instant>,
}

/// State.
#[derive(Debug, Clone)]
pub struct StrengthMeterState {
    /// Complete area
    /// __read only__. renewed for each render.
    pub area: Rect,
    /// Area of the bar.
    /// __read only__. renewed for each render.
    pub bar_area: Rect,
    /// Area of the level text.
    /// __read only__. renewed for each render.
    pub label_area: Rect,

    /// Current strength.
    strength: Strength,
    /// Fill animation.
    fill: FillAnimation,

    pub non_exhaustive: NonExhaustive,
}

impl Default for StrengthMeterStyle {
    fn default() -> Self {
        Self {
            style: Default::default(),
            label: None,
            empty: None,
            block: None,
            bar_symbol: None,
            empty_symbol: None,
            non_exhaustive: NonExhaustive,
        }
    }
}

impl Default for StrengthMeter<'_> {
    fn default() -> Self {
        Self {
            style: Default::default(),
            label_style: None,
            empty_style: None,
            label: "Strength: ",
            bar_symbol: "\u{2588}",
            empty_symbol: "\u{2591}",
            enable_color_bar: true,
            block: None,
        }
    }
}

impl<'a> StrengthMeter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set all styles.
    pub fn styles(mut self, styles: StrengthMeterStyle) -> Self {
        self.style = styles.style;
        if styles.label.is_some() {
            self.label_style = styles.label;
        }
        if styles.empty.is_some() {
            self.empty_style = styles.empty;
        }
        if let Some(block) = styles.block {
            self.block = Some(block);
        }
        if let Some(bar_symbol) = styles.bar_symbol {
            self.bar_symbol = bar_symbol;
        }
        if let Some(empty_symbol) = styles.empty_symbol {
            self.empty_symbol = empty_symbol;
        }
        self.block = self.block.map(|v| v.style(self.style));
        self
    }

    #[inline]
    pub fn style(mut self, style: impl Into<Style>) -> Self {
        self.style = style.into();
        self
    }

    /// Style for the level text.
    #[inline]
    pub fn label_style(mut self, style: impl Into<Style>) -> Self {
        self.label_style = Some(style.into());
        self
    }

    /// Style for the unfilled part of the bar.
    #[inline]
    pub fn empty_style(mut self, style: impl Into<Style>) -> Self {
        self.empty_style = Some(style.into());
        self
    }

    /// Prefix for the level text.
    #[inline]
    pub fn label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    /// Symbols for the filled and empty part of the bar.
    #[inline]
    pub fn bar_symbols(mut self, bar: &'a str, empty: &'a str) -> Self {
        self.bar_symbol = bar;
        self.empty_symbol = empty;
        self
    }

    /// Show the colored bar. The level text is always shown.
    #[inline]
    pub fn enable_color_bar(mut self, enable: bool) -> Self {
        self.enable_color_bar = enable;
        self
    }

    #[inline]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self.block = self.block.map(|v| v.style(self.style));
        self
    }

    /// Inherent height.
    pub fn height(&self) -> u16 {
        let block = if self.block.is_some() { 2 } else { 0 };
        let bar = if self.enable_color_bar { 1 } else { 0 };
        block + bar + 1
    }
}

impl StatefulWidget for &StrengthMeter<'_> {
    type State = StrengthMeterState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        render_ref(self, area, buf, state);
    }
}

impl StatefulWidget for StrengthMeter<'_> {
    type State = StrengthMeterState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        render_ref(&self, area, buf, state);
    }
}

fn render_ref(
    widget: &StrengthMeter<'_>,
    area: Rect,
    buf: &mut Buffer,
    state: &mut StrengthMeterState,
) {
    state.area = area;
    let inner = widget.block.inner_if_some(area);

    if widget.enable_color_bar && inner.height > 1 {
        state.bar_area = Rect::new(inner.x, inner.y, inner.width, 1);
        state.label_area = Rect::new(inner.x, inner.y + 1, inner.width, 1);
    } else {
        state.bar_area = Rect::new(inner.x, inner.y, 0, 0);
        state.label_area = Rect::new(inner.x, inner.y, inner.width, 1.min(inner.height));
    }

    if let Some(block) = &widget.block {
        block.render(area, buf);
    } else {
        buf.set_style(area, widget.style);
    }

    if !state.bar_area.is_empty() {
        let filled = bar_cells(state.fill.shown(), state.bar_area.width);
        let bar_style = widget
            .style
            .fg(Color::from(state.strength.color));
        let empty_style = widget
            .empty_style
            .map(|v| widget.style.patch(v))
            .unwrap_or(widget.style.fg(StrengthColor::Neutral.into()));

        for x in 0..state.bar_area.width {
            let pos = (state.bar_area.x + x, state.bar_area.y);
            if let Some(cell) = buf.cell_mut(pos) {
                if x < filled {
                    cell.set_symbol(widget.bar_symbol);
                    cell.set_style(bar_style);
                } else {
                    cell.set_symbol(widget.empty_symbol);
                    cell.set_style(empty_style);
                }
            }
        }
    }

    if !state.label_area.is_empty() {
        let label_style = widget
            .label_style
            .map(|v| widget.style.patch(v))
            .unwrap_or(widget.style);
        Line::from(vec![
            Span::from(widget.label),
            Span::from(state.strength.level.as_str()),
        ])
        .style(label_style)
        .render(state.label_area, buf);
    }
}

/// Number of filled cells for a fill percentage.
fn bar_cells(fill_percent: f32, width: u16) -> u16 {
    let fill = fill_percent.clamp(0.0, 100.0);
    (fill * width as f32 / 100.0).round() as u16
}

impl FillAnimation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently shown fill.
    pub fn shown(&self) -> f32 {
        self.shown
    }

    /// Final fill.
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Animation running.
    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    /// Start moving toward a new fill.
    pub fn set_target(&mut self, target: f32, now: Instant) {
        if target == self.target && (self.start.is_some() || self.shown == target) {
            return;
        }
        self.from = self.shown;
        self.target = target;
        self.start = Some(now);
    }

    /// Jump to a fill.
    pub fn set(&mut self, fill: f32) {
        self.shown = fill;
        self.from = fill;
        self.target = fill;
        self.start = None;
    }

    /// Step the animation. Returns true if the shown fill changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(start) = self.start else {
            return false;
        };
        let elapsed = now.saturating_duration_since(start);
        let old = self.shown;
        if elapsed >= FILL_DURATION {
            self.shown = self.target;
            self.start = None;
        } else {
            let t = elapsed.as_secs_f32() / FILL_DURATION.as_secs_f32();
            self.shown = self.from + (self.target - self.from) * t;
        }
        old != self.shown
    }

    /// Time until the next step is useful.
    pub fn wait_time(&self, now: Instant) -> Option<Duration> {
        let start = self.start?;
        let end = start + FILL_DURATION;
        let frame = Duration::from_millis(16);
        Some(end.saturating_duration_since(now).min(frame))
    }
}

impl Default for StrengthMeterState {
    fn default() -> Self {
        Self {
            area: Default::default(),
            bar_area: Default::default(),
            label_area: Default::default(),
            strength: Strength::new("", 0, StrengthColor::Neutral),
            fill: Default::default(),
            non_exhaustive: NonExhaustive,
        }
    }
}

impl StrengthMeterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current strength.
    pub fn strength(&self) -> &Strength {
        &self.strength
    }

    /// Set a new strength and start the fill animation.
    pub fn set_strength(&mut self, strength: Strength, now: Instant) -> bool {
        if self.strength == strength {
            return false;
        }
        trace!(
            "strength {:?} {}% {}",
            strength.level,
            strength.fill_percent,
            strength.color.as_str()
        );
        self.fill.set_target(strength.fill_percent as f32, now);
        self.strength = strength;
        true
    }

    /// Set a new strength without animation.
    pub fn set_strength_now(&mut self, strength: Strength) {
        self.fill.set(strength.fill_percent as f32);
        self.strength = strength;
    }

    /// Fill animation.
    pub fn fill(&self) -> &FillAnimation {
        &self.fill
    }

    /// Step the fill animation.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.fill.tick(now)
    }

    pub fn is_animating(&self) -> bool {
        self.fill.is_active()
    }

    /// Time until the next animation step.
    pub fn animation_wait(&self, now: Instant) -> Option<Duration> {
        self.fill.wait_time(now)
    }
}
