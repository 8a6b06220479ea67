//!
//! Page markers.
//!
//! One marker per page, the current page is active.
//!
//! ```rust no_run
//! use rat_carousel::indicator::PageIndicator;
//! # use ratatui::buffer::Buffer;
//! # use ratatui::layout::Rect;
//! # use ratatui::widgets::Widget;
//! # let area = Rect::ZERO;
//! # let mut buf = Buffer::default();
//!
//! PageIndicator::new(1, 3).render(area, &mut buf);
//! ```
//!

use crate::_private::NonExhaustive;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

/// Active/inactive state for each of len markers.
///
/// Exactly the marker at current is active. An empty
/// Vec if there are no pages.
pub fn markers(current: usize, len: usize) -> Vec<bool> {
    (0..len).map(|i| i == current).collect()
}

/// Page markers.
#[derive(Debug, Clone)]
pub struct PageIndicator<'a> {
    current: usize,
    len: usize,

    active_symbol: &'a str,
    inactive_symbol: &'a str,
    spacing: u16,
    alignment: Alignment,

    style: Style,
    active_style: Option<Style>,
}

/// Styles for the page markers.
#[derive(Debug, Clone)]
pub struct IndicatorStyle {
    pub style: Style,
    pub active: Option<Style>,
    pub active_symbol: Option<&'static str>,
    pub inactive_symbol: Option<&'static str>,
    pub spacing: Option<u16>,

    pub non_exhaustive: NonExhaustive,
}

impl Default for IndicatorStyle {
    fn default() -> Self {
        Self {
            style: Default::default(),
            active: None,
            active_symbol: None,
            inactive_symbol: None,
            spacing: None,
            non_exhaustive: NonExhaustive,
        }
    }
}

impl Default for PageIndicator<'_> {
    fn default() -> Self {
        Self {
            current: 0,
            len: 0,
            active_symbol: "\u{25CF}",
            inactive_symbol: "\u{25CB}",
            spacing: 1,
            alignment: Alignment::Center,
            style: Default::default(),
            active_style: None,
        }
    }
}

impl<'a> PageIndicator<'a> {
    pub fn new(current: usize, len: usize) -> Self {
        Self {
            current,
            len,
            ..Default::default()
        }
    }

    /// Set all styles.
    pub fn styles(mut self, styles: IndicatorStyle) -> Self {
        self.style = styles.style;
        if styles.active.is_some() {
            self.active_style = styles.active;
        }
        if let Some(active_symbol) = styles.active_symbol {
            self.active_symbol = active_symbol;
        }
        if let Some(inactive_symbol) = styles.inactive_symbol {
            self.inactive_symbol = inactive_symbol;
        }
        if let Some(spacing) = styles.spacing {
            self.spacing = spacing;
        }
        self
    }

    /// Base style.
    pub fn style(mut self, style: impl Into<Style>) -> Self {
        self.style = style.into();
        self
    }

    /// Style for the active marker.
    pub fn active_style(mut self, style: impl Into<Style>) -> Self {
        self.active_style = Some(style.into());
        self
    }

    /// Symbol for the active marker.
    pub fn active_symbol(mut self, symbol: &'a str) -> Self {
        self.active_symbol = symbol;
        self
    }

    /// Symbol for the other markers.
    pub fn inactive_symbol(mut self, symbol: &'a str) -> Self {
        self.inactive_symbol = symbol;
        self
    }

    /// Blanks between markers.
    pub fn spacing(mut self, spacing: u16) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    fn line(&self) -> Line<'a> {
        let active_style = self.active_style.unwrap_or(self.style);
        let gap = " ".repeat(self.spacing as usize);

        let mut spans = Vec::new();
        for (i, active) in markers(self.current, self.len).into_iter().enumerate() {
            if i > 0 && !gap.is_empty() {
                spans.push(Span::styled(gap.clone(), self.style));
            }
            if active {
                spans.push(Span::styled(self.active_symbol, active_style));
            } else {
                spans.push(Span::styled(self.inactive_symbol, self.style));
            }
        }
        Line::from(spans).alignment(self.alignment)
    }
}

impl Widget for PageIndicator<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        (&self).render(area, buf);
    }
}

impl Widget for &PageIndicator<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.len == 0 || area.is_empty() {
            return;
        }
        self.line().render(area, buf);
    }
}
