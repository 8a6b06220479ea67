//!
//! Password input with a strength meter below.
//!
//! The strength is re-evaluated for every change of the
//! password with the configured [StrengthRule].
//!

use crate::_private::NonExhaustive;
use crate::event::PasswordOutcome;
use crate::input::{PasswordInput, PasswordInputState, PasswordInputStyle};
use crate::meter::{StrengthMeter, StrengthMeterState, StrengthMeterStyle};
use crate::rules::{DefaultRule, Pattern, Strength, StrengthRule};
use log::debug;
use rat_event::{HandleEvent, MouseOnly, Regular};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use rat_reloc::RelocatableState;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::StatefulWidget;
use std::fmt::{Debug, Formatter};
use std::time::{Duration, Instant};

/// Password input and strength meter.
#[derive(Debug, Default, Clone)]
pub struct PasswordStrength<'a> {
    input: PasswordInput<'a>,
    meter: StrengthMeter<'a>,
}

/// Combined styles.
#[derive(Debug, Clone)]
pub struct PasswordStrengthStyle {
    pub input: PasswordInputStyle,
    pub meter: StrengthMeterStyle,

    pub non_exhaustive: NonExhaustive,
}

/// State.
pub struct PasswordStrengthState {
    /// Complete area
    /// __read only__. renewed for each render.
    pub area: Rect,

    /// Input.
    pub input: PasswordInputState,
    /// Meter.
    pub meter: StrengthMeterState,

    /// Scoring.
    rule: Box<dyn StrengthRule>,
    /// Must match.
    required: Option<Pattern>,
    /// Must not match.
    forbidden: Option<Pattern>,

    pub non_exhaustive: NonExhaustive,
}

impl Default for PasswordStrengthStyle {
    fn default() -> Self {
        Self {
            input: Default::default(),
            meter: Default::default(),
            non_exhaustive: NonExhaustive,
        }
    }
}

impl<'a> PasswordStrength<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set all styles.
    pub fn styles(mut self, styles: PasswordStrengthStyle) -> Self {
        self.input = self.input.styles(styles.input);
        self.meter = self.meter.styles(styles.meter);
        self
    }

    /// Configure the input.
    pub fn input(mut self, input: PasswordInput<'a>) -> Self {
        self.input = input;
        self
    }

    /// Configure the meter.
    pub fn meter(mut self, meter: StrengthMeter<'a>) -> Self {
        self.meter = meter;
        self
    }

    /// Show the colored bar.
    pub fn enable_color_bar(mut self, enable: bool) -> Self {
        self.meter = self.meter.enable_color_bar(enable);
        self
    }

    /// Inherent height.
    pub fn height(&self) -> u16 {
        self.input.height() + self.meter.height()
    }
}

impl StatefulWidget for &PasswordStrength<'_> {
    type State = PasswordStrengthState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        render_ref(self, area, buf, state);
    }
}

impl StatefulWidget for PasswordStrength<'_> {
    type State = PasswordStrengthState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        render_ref(&self, area, buf, state);
    }
}

fn render_ref(
    widget: &PasswordStrength<'_>,
    area: Rect,
    buf: &mut Buffer,
    state: &mut PasswordStrengthState,
) {
    state.area = area;

    let input_height = widget.input.height().min(area.height);
    let input_area = Rect::new(area.x, area.y, area.width, input_height);
    let meter_area = Rect::new(
        area.x,
        area.y + input_height,
        area.width,
        area.height - input_height,
    );

    (&widget.input).render(input_area, buf, &mut state.input);
    (&widget.meter).render(meter_area, buf, &mut state.meter);
}

impl Debug for PasswordStrengthState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordStrengthState")
            .field("area", &self.area)
            .field("input", &self.input)
            .field("meter", &self.meter)
            .field("rule", &"..")
            .field("required", &self.required)
            .field("forbidden", &self.forbidden)
            .finish()
    }
}

impl Default for PasswordStrengthState {
    fn default() -> Self {
        let mut meter = StrengthMeterState::default();
        meter.set_strength_now(DefaultRule.evaluate("", None, None));
        Self {
            area: Default::default(),
            input: Default::default(),
            meter,
            rule: Box::new(DefaultRule),
            required: None,
            forbidden: None,
            non_exhaustive: NonExhaustive,
        }
    }
}

impl HasFocus for PasswordStrengthState {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
    }

    fn focus(&self) -> FocusFlag {
        self.input.focus.clone()
    }

    fn area(&self) -> Rect {
        self.area
    }
}

impl RelocatableState for PasswordStrengthState {
    fn relocate(&mut self, shift: (i16, i16), clip: Rect) {
        self.area = rat_reloc::relocate_area(self.area, shift, clip);
        self.input.relocate(shift, clip);
        self.meter.area = rat_reloc::relocate_area(self.meter.area, shift, clip);
        self.meter.bar_area = rat_reloc::relocate_area(self.meter.bar_area, shift, clip);
        self.meter.label_area = rat_reloc::relocate_area(self.meter.label_area, shift, clip);
    }
}

impl PasswordStrengthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: &str) -> Self {
        Self {
            input: PasswordInputState::named(name),
            ..Default::default()
        }
    }

    /// Replace the scoring rule.
    pub fn set_rule(&mut self, rule: impl StrengthRule + 'static) {
        self.rule = Box::new(rule);
        self.reevaluate_now();
    }

    /// Characters that must appear.
    pub fn set_required(&mut self, required: Option<Pattern>) {
        self.required = required;
        self.reevaluate_now();
    }

    pub fn required(&self) -> Option<&Pattern> {
        self.required.as_ref()
    }

    /// Characters that must not appear.
    pub fn set_forbidden(&mut self, forbidden: Option<Pattern>) {
        self.forbidden = forbidden;
        self.reevaluate_now();
    }

    pub fn forbidden(&self) -> Option<&Pattern> {
        self.forbidden.as_ref()
    }

    /// The password.
    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// Set the password.
    pub fn set_value(&mut self, value: impl Into<String>) -> bool {
        let changed = self.input.set_value(value);
        if changed {
            self.reevaluate(Instant::now());
        }
        changed
    }

    /// Current strength.
    pub fn strength(&self) -> &Strength {
        self.meter.strength()
    }

    /// Evaluate the current password and animate the meter.
    pub fn reevaluate(&mut self, now: Instant) -> bool {
        let strength = self.evaluate_value();
        self.meter.set_strength(strength, now)
    }

    fn reevaluate_now(&mut self) {
        let strength = self.evaluate_value();
        self.meter.set_strength_now(strength);
    }

    fn evaluate_value(&self) -> Strength {
        let strength = self.rule.evaluate(
            self.input.value(),
            self.required.as_ref(),
            self.forbidden.as_ref(),
        );
        debug!("evaluate -> {:?} {}%", strength.level, strength.fill_percent);
        strength
    }

    /// Step the meter animation.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.meter.tick(now)
    }

    pub fn is_animating(&self) -> bool {
        self.meter.is_animating()
    }

    /// Time until the next animation step.
    pub fn animation_wait(&self, now: Instant) -> Option<Duration> {
        self.meter.animation_wait(now)
    }

    /// Cursor position on screen, if focused.
    pub fn screen_cursor(&self) -> Option<(u16, u16)> {
        self.input.screen_cursor()
    }
}

impl HandleEvent<crossterm::event::Event, Regular, PasswordOutcome> for PasswordStrengthState {
    fn handle(&mut self, event: &crossterm::event::Event, _qualifier: Regular) -> PasswordOutcome {
        let r = self.input.handle(event, Regular);
        if r == PasswordOutcome::Value {
            self.reevaluate(Instant::now());
        }
        r
    }
}

impl HandleEvent<crossterm::event::Event, MouseOnly, PasswordOutcome> for PasswordStrengthState {
    fn handle(&mut self, event: &crossterm::event::Event, _qualifier: MouseOnly) -> PasswordOutcome {
        self.input.handle(event, MouseOnly)
    }
}

/// Handle all events.
/// Key events are only processed if focus is true.
pub fn handle_events(
    state: &mut PasswordStrengthState,
    focus: bool,
    event: &crossterm::event::Event,
) -> PasswordOutcome {
    state.input.focus.set(focus);
    HandleEvent::handle(state, event, Regular)
}
