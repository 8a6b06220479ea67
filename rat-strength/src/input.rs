//!
//! Masked single line input for passwords.
//!
//! Every grapheme is shown as a mask character. The cursor
//! always stays at the end of the text.
//!

use crate::_private::NonExhaustive;
use crate::input::event::PasswordOutcome;
use rat_event::{ct_event, HandleEvent, MouseOnly, Regular};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use rat_reloc::{relocate_area, RelocatableState};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::prelude::BlockExt;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, StatefulWidget, Widget};
use std::borrow::Cow;
use unicode_segmentation::UnicodeSegmentation;

/// Password input widget.
#[derive(Debug, Clone)]
pub struct PasswordInput<'a> {
    style: Style,
    focus_style: Option<Style>,
    placeholder_style: Option<Style>,
    placeholder: Cow<'a, str>,
    mask: char,
    block: Option<Block<'a>>,
}

/// Combined styles.
#[derive(Debug, Clone)]
pub struct PasswordInputStyle {
    pub style: Style,
    pub focus: Option<Style>,
    pub placeholder: Option<Style>,
    pub block: Option<Block<'static>>,
    pub mask: Option<char>,

    pub non_exhaustive: NonExhaustive,
}

/// State.
#[derive(Debug)]
pub struct PasswordInputState {
    /// Complete area
    /// __read only__. renewed for each render.
    pub area: Rect,
    /// Area inside the block.
    /// __read only__. renewed for each render.
    pub inner: Rect,

    /// The password.
    value: String,

    /// Current focus state.
    /// __read+write__
    pub focus: FocusFlag,

    pub non_exhaustive: NonExhaustive,
}

pub(crate) mod event {
    use rat_event::{ConsumedEvent, Outcome};

    /// Result value for event-handling.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    pub enum PasswordOutcome {
        /// The given event was not handled at all.
        Continue,
        /// The event was handled, no repaint necessary.
        Unchanged,
        /// The event was handled, repaint necessary.
        Changed,
        /// The password changed.
        Value,
    }

    impl ConsumedEvent for PasswordOutcome {
        fn is_consumed(&self) -> bool {
            *self != PasswordOutcome::Continue
        }
    }

    impl From<bool> for PasswordOutcome {
        fn from(value: bool) -> Self {
            if value {
                PasswordOutcome::Value
            } else {
                PasswordOutcome::Unchanged
            }
        }
    }

    impl From<PasswordOutcome> for Outcome {
        fn from(value: PasswordOutcome) -> Self {
            match value {
                PasswordOutcome::Continue => Outcome::Continue,
                PasswordOutcome::Unchanged => Outcome::Unchanged,
                PasswordOutcome::Changed => Outcome::Changed,
                PasswordOutcome::Value => Outcome::Changed,
            }
        }
    }
}

impl Default for PasswordInputStyle {
    fn default() -> Self {
        Self {
            style: Default::default(),
            focus: None,
            placeholder: None,
            block: None,
            mask: None,
            non_exhaustive: NonExhaustive,
        }
    }
}

impl Default for PasswordInput<'_> {
    fn default() -> Self {
        Self {
            style: Default::default(),
            focus_style: None,
            placeholder_style: None,
            placeholder: Cow::Borrowed("Enter your password"),
            mask: '\u{2022}',
            block: None,
        }
    }
}

impl<'a> PasswordInput<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set all styles.
    pub fn styles(mut self, styles: PasswordInputStyle) -> Self {
        self.style = styles.style;
        if styles.focus.is_some() {
            self.focus_style = styles.focus;
        }
        if styles.placeholder.is_some() {
            self.placeholder_style = styles.placeholder;
        }
        if let Some(block) = styles.block {
            self.block = Some(block);
        }
        if let Some(mask) = styles.mask {
            self.mask = mask;
        }
        self.block = self.block.map(|v| v.style(self.style));
        self
    }

    #[inline]
    pub fn style(mut self, style: impl Into<Style>) -> Self {
        self.style = style.into();
        self
    }

    #[inline]
    pub fn focus_style(mut self, style: impl Into<Style>) -> Self {
        self.focus_style = Some(style.into());
        self
    }

    /// Style for the placeholder text.
    #[inline]
    pub fn placeholder_style(mut self, style: impl Into<Style>) -> Self {
        self.placeholder_style = Some(style.into());
        self
    }

    /// Shown while the input is empty.
    #[inline]
    pub fn placeholder(mut self, placeholder: impl Into<Cow<'a, str>>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Mask character.
    #[inline]
    pub fn mask(mut self, mask: char) -> Self {
        self.mask = mask;
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
        if self.block.is_some() {
            3
        } else {
            1
        }
    }
}

impl StatefulWidget for &PasswordInput<'_> {
    type State = PasswordInputState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        render_ref(self, area, buf, state);
    }
}

impl StatefulWidget for PasswordInput<'_> {
    type State = PasswordInputState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        render_ref(&self, area, buf, state);
    }
}

fn render_ref(
    widget: &PasswordInput<'_>,
    area: Rect,
    buf: &mut Buffer,
    state: &mut PasswordInputState,
) {
    state.area = area;
    state.inner = widget.block.inner_if_some(area);

    let style = widget.style;
    let focus_style = widget.focus_style.map(|v| style.patch(v)).unwrap_or(style);

    if let Some(block) = &widget.block {
        block.render(area, buf);
    } else {
        buf.set_style(area, style);
    }
    if state.is_focused() {
        buf.set_style(state.inner, focus_style);
    }

    let line = Rect::new(state.inner.x, state.inner.y, state.inner.width, 1.min(state.inner.height));
    if state.value.is_empty() {
        let placeholder_style = widget.placeholder_style.unwrap_or(style);
        Span::styled(widget.placeholder.as_ref(), placeholder_style).render(line, buf);
    } else {
        let masked = mask_text(&state.value, widget.mask, line.width as usize);
        Span::from(masked).render(line, buf);
    }
}

/// Masked text. If the text is longer than width, only
/// the end is shown.
fn mask_text(value: &str, mask: char, width: usize) -> String {
    let len = value.graphemes(true).count();
    // the cursor needs one cell too.
    let visible = len.min(width.saturating_sub(1));
    std::iter::repeat(mask).take(visible).collect()
}

impl Default for PasswordInputState {
    fn default() -> Self {
        Self {
            area: Default::default(),
            inner: Default::default(),
            value: Default::default(),
            focus: Default::default(),
            non_exhaustive: NonExhaustive,
        }
    }
}

impl HasFocus for PasswordInputState {
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

impl RelocatableState for PasswordInputState {
    fn relocate(&mut self, shift: (i16, i16), clip: Rect) {
        self.area = relocate_area(self.area, shift, clip);
        self.inner = relocate_area(self.inner, shift, clip);
    }
}

impl PasswordInputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: &str) -> Self {
        Self {
            focus: FocusFlag::new().with_name(name),
            ..Default::default()
        }
    }

    /// The password.
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// Set the password.
    pub fn set_value(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        let changed = self.value != value;
        self.value = value;
        changed
    }

    /// Length in graphemes.
    pub fn len(&self) -> usize {
        self.value.graphemes(true).count()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Append a char.
    pub fn insert_char(&mut self, c: char) -> bool {
        if c.is_control() {
            return false;
        }
        self.value.push(c);
        true
    }

    /// Append some text. Line breaks and other control
    /// characters are dropped.
    pub fn insert_str(&mut self, text: &str) -> bool {
        let old_len = self.value.len();
        self.value.extend(text.chars().filter(|c| !c.is_control()));
        old_len != self.value.len()
    }

    /// Remove the last grapheme.
    pub fn delete_prev(&mut self) -> bool {
        if let Some((idx, _)) = self.value.grapheme_indices(true).next_back() {
            self.value.truncate(idx);
            true
        } else {
            false
        }
    }

    /// Clear the password.
    pub fn clear(&mut self) -> bool {
        if self.value.is_empty() {
            false
        } else {
            self.value.clear();
            true
        }
    }

    /// Cursor position on screen, if focused.
    pub fn screen_cursor(&self) -> Option<(u16, u16)> {
        if self.is_focused() && !self.inner.is_empty() {
            let visible = self.len().min(self.inner.width.saturating_sub(1) as usize) as u16;
            Some((self.inner.x + visible, self.inner.y))
        } else {
            None
        }
    }
}

impl HandleEvent<crossterm::event::Event, Regular, PasswordOutcome> for PasswordInputState {
    fn handle(&mut self, event: &crossterm::event::Event, _qualifier: Regular) -> PasswordOutcome {
        let r = if self.is_focused() {
            match event {
                ct_event!(key press CONTROL-'u') => self.clear().into(),
                ct_event!(key press c) | ct_event!(key press SHIFT-c) => self.insert_char(*c).into(),
                ct_event!(keycode press Backspace) => self.delete_prev().into(),
                ct_event!(paste v) => self.insert_str(v).into(),
                _ => PasswordOutcome::Continue,
            }
        } else {
            PasswordOutcome::Continue
        };

        if r == PasswordOutcome::Continue {
            HandleEvent::handle(self, event, MouseOnly)
        } else {
            r
        }
    }
}

impl HandleEvent<crossterm::event::Event, MouseOnly, PasswordOutcome> for PasswordInputState {
    fn handle(&mut self, event: &crossterm::event::Event, _qualifier: MouseOnly) -> PasswordOutcome {
        match event {
            ct_event!(mouse down Left for x, y) if self.area.contains((*x, *y).into()) => {
                PasswordOutcome::Unchanged
            }
            _ => PasswordOutcome::Continue,
        }
    }
}

/// Handle all events.
/// Key events are only processed if focus is true.
pub fn handle_events(
    state: &mut PasswordInputState,
    focus: bool,
    event: &crossterm::event::Event,
) -> PasswordOutcome {
    state.focus.set(focus);
    HandleEvent::handle(state, event, Regular)
}
