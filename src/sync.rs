//!
//! Mapping between the physical scroll offset and the logical page index.
//!
//! This is the single source of truth for the current page.
//!

use crate::geometry::PageGeometry;
#[allow(unused_imports)]
use log::{debug, trace};

/// Index synchronizer.
///
/// Keeps the current page index in step with the last known
/// scroll offset. The current index is always the page whose
/// offset is nearest to the last reported offset.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IndexSync {
    /// Current page.
    /// Meaningless if len == 0, and then it is 0.
    current: usize,
    /// Number of pages.
    len: usize,
    /// Last reported scroll offset.
    offset: f32,
}

impl IndexSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronizer for len pages.
    pub fn with_len(len: usize) -> Self {
        Self {
            len,
            ..Default::default()
        }
    }

    /// Current page index.
    #[inline]
    pub fn current(&self) -> usize {
        self.current
    }

    /// Number of pages.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// No pages.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Last reported offset.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Clamp the index to the valid range `0..len`.
    ///
    /// Returns 0 if there are no pages at all.
    pub fn clamp(&self, index: usize) -> usize {
        if self.len == 0 {
            0
        } else {
            index.min(self.len - 1)
        }
    }

    /// Set the number of pages. If the sequence shrank
    /// the current index is clamped to the last valid page.
    ///
    /// Returns true if the current index changed.
    pub fn set_len(&mut self, len: usize) -> bool {
        self.len = len;
        let old_current = self.current;
        self.current = self.clamp(self.current);
        if old_current != self.current {
            debug!("len {} clamps index {} -> {}", len, old_current, self.current);
        }
        old_current != self.current
    }

    /// Set the current index directly. The index is clamped.
    ///
    /// This is used for programmatic navigation, where the
    /// target index is set before the scroll reports arrive.
    ///
    /// Returns true if the current index changed.
    pub fn set_current(&mut self, index: usize) -> bool {
        let old_current = self.current;
        self.current = self.clamp(index);
        old_current != self.current
    }

    /// The scroll surface reports a new offset.
    ///
    /// Computes `round(offset_x / page_width)` clamped to `0..len`.
    /// Ties round away from zero, so exactly half-way between
    /// two pages the higher index wins.
    ///
    /// Does nothing while the page width is unknown, and returns
    /// the previous index.
    pub fn on_scroll_position_changed(&mut self, geometry: &PageGeometry, offset_x: f32) -> usize {
        if !geometry.is_known() {
            trace!("scroll report {} before layout", offset_x);
            return self.current;
        }
        self.offset = offset_x;
        self.current = self.index_at(geometry, offset_x);
        trace!("scroll report {} -> page {}", offset_x, self.current);
        self.current
    }

    /// Page index for the given offset, without changing anything.
    ///
    /// Returns the current index if the page width is unknown.
    pub fn index_at(&self, geometry: &PageGeometry, offset_x: f32) -> usize {
        if !geometry.is_known() {
            return self.current;
        }
        let page = (offset_x / geometry.page_width()).round();
        // NaN and negative pages saturate to 0.
        let page = if page.is_nan() || page < 0.0 {
            0
        } else {
            page as usize
        };
        self.clamp(page)
    }

    /// Offset of the page with the given index.
    pub fn index_to_offset(&self, geometry: &PageGeometry, index: usize) -> f32 {
        index as f32 * geometry.page_width()
    }

    /// Largest valid scroll offset.
    pub fn max_offset(&self, geometry: &PageGeometry) -> f32 {
        self.index_to_offset(geometry, self.len.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::IndexSync;
    use crate::geometry::PageGeometry;

    #[test]
    fn test_round_half_up() {
        let g = PageGeometry::with_width(100.0);
        let mut s = IndexSync::with_len(3);
        assert_eq!(s.on_scroll_position_changed(&g, 49.9), 0);
        assert_eq!(s.on_scroll_position_changed(&g, 50.0), 1);
        assert_eq!(s.on_scroll_position_changed(&g, 149.0), 1);
        assert_eq!(s.on_scroll_position_changed(&g, 150.0), 2);
    }

    #[test]
    fn test_clamp_range() {
        let g = PageGeometry::with_width(100.0);
        let mut s = IndexSync::with_len(3);
        assert_eq!(s.on_scroll_position_changed(&g, -500.0), 0);
        assert_eq!(s.on_scroll_position_changed(&g, 10_000.0), 2);
        assert_eq!(s.on_scroll_position_changed(&g, f32::NAN), 0);
    }
}
