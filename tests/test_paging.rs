use rat_carousel::geometry::PageGeometry;
use rat_carousel::sync::IndexSync;
use rat_carousel::viewport::{ScrollSurface, ViewportController};
use rat_carousel::{CarouselState, Item};
use ratatui::text::Text;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Recorder {
    commands: Vec<(f32, bool)>,
}

impl ScrollSurface for Recorder {
    fn scroll_to(&mut self, offset: f32, animated: bool) {
        self.commands.push((offset, animated));
    }
}

fn items(n: usize) -> Vec<Item<Text<'static>>> {
    (0..n)
        .map(|i| Item::new(i as u64 + 1, Text::from(format!("page {}", i))))
        .collect()
}

fn state(n: usize, width: f32) -> CarouselState<Text<'static>> {
    let mut state = CarouselState::new();
    state.set_items(items(n));
    state.on_layout_measured(width);
    state
}

#[test]
fn test_index_in_range() {
    let g = PageGeometry::with_width(300.0);
    let mut s = IndexSync::with_len(3);
    for i in -10..=40 {
        let offset = i as f32 * 37.5;
        let idx = s.on_scroll_position_changed(&g, offset);
        assert!(idx < 3, "{} -> {}", offset, idx);
    }
}

#[test]
fn test_round_trip() {
    let g = PageGeometry::with_width(137.0);
    let mut s = IndexSync::with_len(7);
    for i in 0..7 {
        let offset = s.index_to_offset(&g, i);
        assert_eq!(s.on_scroll_position_changed(&g, offset), i);
    }
}

#[test]
fn test_nearest_page() {
    let mut state = state(3, 300.0);
    assert_eq!(state.on_scroll_position_changed(290.0), 1);
    assert_eq!(state.current(), 1);
}

#[test]
fn test_no_width_no_op() {
    let mut state = CarouselState::<Text<'static>>::new();
    state.set_items(items(3));
    assert_eq!(state.on_scroll_position_changed(500.0), 0);
    assert!(!state.scroll_to_index(2, true));
    assert_eq!(state.current(), 0);
    assert_eq!(state.surface().commands(), 0);
}

#[test]
fn test_shrink_clamps() {
    let mut state = state(5, 100.0);
    assert!(state.scroll_to_index(4, false));
    assert_eq!(state.current(), 4);

    state.set_items(items(2));
    assert_eq!(state.current(), 1);
    assert_eq!(state.surface().offset(), 100.0);
}

#[test]
fn test_empty_items() {
    let mut state = state(0, 100.0);
    assert!(!state.scroll_to_index(3, true));
    assert!(!state.next());
    assert_eq!(state.current(), 0);
    assert_eq!(state.on_scroll_position_changed(250.0), 0);
}

#[test]
fn test_out_of_range_clamped() {
    let mut state = state(3, 100.0);
    assert!(state.scroll_to_index(99, false));
    assert_eq!(state.current(), 2);
    assert_eq!(state.surface().offset(), 200.0);
}

#[test]
fn test_viewport_defers() {
    let mut vp = ViewportController::new(Recorder::default());
    let sync = IndexSync::with_len(3);

    assert!(!vp.scroll_to_index(&PageGeometry::new(), &sync, 1, true));
    assert!(vp.surface().commands.is_empty());

    assert!(vp.scroll_to_index(&PageGeometry::with_width(80.0), &sync, 2, true));
    assert_eq!(vp.surface().commands, vec![(160.0, true)]);
}

#[test]
fn test_in_flight_optimistic() {
    let mut state = state(3, 100.0);
    let now = Instant::now();

    assert!(state.scroll_to_index(2, true));
    assert_eq!(state.current(), 2);
    assert_eq!(state.in_flight(), Some(2));

    // reports on the way don't change the target.
    assert_eq!(state.on_scroll_position_changed(40.0), 2);
    assert_eq!(state.on_scroll_position_changed(140.0), 2);

    let mut t = now;
    while state.is_animating() {
        t += Duration::from_millis(16);
        state.animate(t);
    }
    assert_eq!(state.in_flight(), None);
    assert_eq!(state.current(), 2);
    assert_eq!(state.surface().offset(), 200.0);
}

#[test]
fn test_gesture_interrupts() {
    let mut state = state(3, 100.0);
    let now = Instant::now();

    assert!(state.scroll_to_index(2, true));
    state.animate(now);
    state.animate(now + Duration::from_millis(50));

    // manual gesture, last report wins.
    state.drag_start(50);
    assert_eq!(state.in_flight(), None);
    state.animate(now + Duration::from_millis(100));
    let expect = (state.surface().offset() / 100.0).round() as usize;
    assert_eq!(state.current(), expect);
    assert!(state.surface().target().is_none());
}

#[test]
fn test_drag_snaps() {
    let mut state = state(3, 100.0);
    let now = Instant::now();

    state.drag_start(80);
    state.drag_to(20);
    assert_eq!(state.surface().offset(), 60.0);

    state.drag_end();
    assert!(!state.is_dragging());
    assert_eq!(state.current(), 1);
    assert_eq!(state.surface().target(), Some(100.0));

    let mut t = now;
    while state.is_animating() {
        t += Duration::from_millis(16);
        state.animate(t);
    }
    assert_eq!(state.surface().offset(), 100.0);
    assert_eq!(state.current(), 1);
}

#[test]
fn test_resize_rescales() {
    let mut state = state(3, 100.0);
    assert!(state.scroll_to_index(1, false));
    state.animate(Instant::now());
    assert_eq!(state.surface().offset(), 100.0);

    assert!(state.on_layout_measured(60.0));
    assert_eq!(state.surface().offset(), 60.0);
    assert_eq!(state.index_to_offset(2), 120.0);
    assert_eq!(state.current(), 1);

    assert!(!state.on_layout_measured(60.0));
}

#[test]
fn test_repeated_resize_stays_on_page() {
    let mut state = state(5, 100.0);
    assert!(state.scroll_to_index(3, false));
    state.animate(Instant::now());

    for width in [60.0, 77.0, 33.0, 91.0, 100.0, 17.0, 100.0] {
        assert!(state.on_layout_measured(width));
        assert_eq!(state.surface().offset(), 3.0 * width);
        assert_eq!(state.current(), 3);
    }
}

#[test]
fn test_drag_cancels_flight() {
    let mut state = state(5, 100.0);
    state.drag_start(200);
    assert!(state.scroll_to_index(3, true));
    assert_eq!(state.in_flight(), Some(3));

    state.drag_to(130);
    assert_eq!(state.in_flight(), None);
    assert_eq!(state.surface().offset(), 70.0);
    assert_eq!(state.current(), 1);
}

#[test]
fn test_keys_no_wrap() {
    let mut state = state(2, 100.0);
    assert!(!state.prev());
    assert!(state.next());
    assert_eq!(state.current(), 1);
    assert!(!state.next());
    assert!(state.first());
    assert_eq!(state.current(), 0);
    assert!(state.last());
    assert_eq!(state.current(), 1);
}
