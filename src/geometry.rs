//!
//! Page geometry.
//!
//! The width of a page is only known after the first layout.
//! Until then the geometry is 'unknown' and all paging is
//! deferred.
//!

#[allow(unused_imports)]
use log::debug;

/// Width of one page.
///
/// A page is exactly as wide as the viewport.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Width of one page. 0 means not measured yet.
    /// __read only__. use [PageGeometry::on_layout_measured].
    page_width: f32,
}

impl PageGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Geometry with a known width.
    pub fn with_width(width: f32) -> Self {
        let mut s = Self::default();
        s.on_layout_measured(width);
        s
    }

    /// Layout has been observed.
    ///
    /// Stores the width if it differs from the current one.
    /// Negative or NaN widths count as 0, which puts the
    /// geometry back into the unknown state.
    ///
    /// Returns true if the width changed.
    pub fn on_layout_measured(&mut self, observed_width: f32) -> bool {
        let width = if observed_width.is_nan() || observed_width < 0.0 {
            0.0
        } else {
            observed_width
        };
        if self.page_width != width {
            debug!("page width {} -> {}", self.page_width, width);
            self.page_width = width;
            true
        } else {
            false
        }
    }

    /// Current page width.
    #[inline]
    pub fn page_width(&self) -> f32 {
        self.page_width
    }

    /// Has a layout with a non-zero width been observed?
    #[inline]
    pub fn is_known(&self) -> bool {
        self.page_width > 0.0
    }
}
