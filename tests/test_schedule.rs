use rat_carousel::event::{CarouselOutcome, HandleEvent, Regular};
use rat_carousel::schedule::{AdvanceState, AutoAdvance, ScheduleInputs};
use rat_carousel::timer::{TimeOut, TimerControl, TimerDef, Timers};
use rat_carousel::{CarouselConfig, CarouselState, ConfigError, Item};
use ratatui::text::Text;
use std::rc::Rc;
use std::time::{Duration, Instant};

fn items(n: usize) -> Vec<Item<Text<'static>>> {
    (0..n)
        .map(|i| Item::new(i as u64 + 1, Text::from(format!("page {}", i))))
        .collect()
}

fn setup(n: usize, interval: u64) -> (Rc<Timers>, CarouselState<Text<'static>>) {
    let timers = Rc::new(Timers::frozen(Instant::now()));
    let mut state = CarouselState::new();
    state.set_timers(timers.clone());
    state.set_items(items(n));
    state.on_layout_measured(100.0);
    state
        .set_config(CarouselConfig::new().auto_scroll(true).interval_ms(interval))
        .expect("config");
    (timers, state)
}

/// Deliver all due wakes.
fn fire(timers: &Timers, state: &mut CarouselState<Text<'static>>) -> Vec<CarouselOutcome> {
    let mut r = Vec::new();
    while let Some(t) = timers.read() {
        r.push(state.handle(&t, Regular));
    }
    r
}

/// Run the scroll animation to its end.
fn settle(timers: &Timers, state: &mut CarouselState<Text<'static>>) {
    while state.is_animating() {
        timers.advance(Duration::from_millis(16));
        state.animate(timers.now());
    }
}

#[test]
fn test_timer_queue() {
    let now = Instant::now();
    let timers = Timers::frozen(now);
    let h = timers.add(TimerDef::new().timer(Duration::from_millis(10)).repeat(2));
    assert!(!timers.poll());
    assert_eq!(timers.sleep_time(), Some(Duration::from_millis(10)));

    timers.advance(Duration::from_millis(10));
    assert_eq!(
        timers.read(),
        Some(TimeOut {
            handle: h,
            counter: 0
        })
    );
    assert_eq!(timers.read(), None);
    timers.advance(Duration::from_millis(10));
    assert_eq!(timers.read().map(|v| v.counter), Some(1));
    assert!(timers.is_empty());
}

#[test]
fn test_arm_and_advance() {
    let (timers, mut state) = setup(3, 100);
    assert!(state.auto_advance().is_armed());

    timers.advance(Duration::from_millis(99));
    assert!(fire(&timers, &mut state).is_empty());

    timers.advance(Duration::from_millis(1));
    assert_eq!(fire(&timers, &mut state), vec![CarouselOutcome::Page(1)]);
    assert_eq!(state.current(), 1);
    assert_eq!(state.surface().commands(), 1);
    assert_eq!(state.surface().target(), Some(100.0));

    settle(&timers, &mut state);
    assert_eq!(state.current(), 1);
    assert_eq!(state.in_flight(), None);
}

#[test]
fn test_wraparound() {
    let (timers, mut state) = setup(3, 100);
    assert!(state.scroll_to_index(2, false));
    state.animate(timers.now());
    assert_eq!(state.current(), 2);

    timers.advance(Duration::from_millis(100));
    assert_eq!(fire(&timers, &mut state), vec![CarouselOutcome::Page(0)]);
    assert_eq!(state.current(), 0);
    assert_eq!(state.surface().target(), Some(0.0));
}

#[test]
fn test_no_items_never_armed() {
    let (timers, mut state) = setup(0, 100);
    assert!(!state.auto_advance().is_armed());
    assert!(timers.is_empty());

    state.set_items(items(2));
    assert!(state.auto_advance().is_armed());

    state.set_items(Vec::new());
    assert!(!state.auto_advance().is_armed());
    assert!(timers.is_empty());
}

#[test]
fn test_single_item_never_scrolls() {
    let (timers, mut state) = setup(1, 100);
    assert!(state.auto_advance().is_armed());

    for _ in 0..10 {
        timers.advance(Duration::from_millis(100));
        fire(&timers, &mut state);
    }
    assert_eq!(state.surface().commands(), 0);
    assert_eq!(state.current(), 0);
}

#[test]
fn test_interval_change_resets_wait() {
    let (timers, mut state) = setup(3, 100);

    timers.advance(Duration::from_millis(50));
    state
        .set_config(CarouselConfig::new().auto_scroll(true).interval_ms(200))
        .expect("config");

    timers.advance(Duration::from_millis(150));
    assert!(fire(&timers, &mut state).is_empty());
    timers.advance(Duration::from_millis(49));
    assert!(fire(&timers, &mut state).is_empty());
    timers.advance(Duration::from_millis(1));
    assert_eq!(fire(&timers, &mut state), vec![CarouselOutcome::Page(1)]);
}

#[test]
fn test_manual_navigation_resets_wait() {
    let (timers, mut state) = setup(3, 100);

    timers.advance(Duration::from_millis(80));
    assert!(state.next());
    assert_eq!(state.current(), 1);

    timers.advance(Duration::from_millis(80));
    assert!(fire(&timers, &mut state).is_empty());
    timers.advance(Duration::from_millis(20));
    assert_eq!(fire(&timers, &mut state), vec![CarouselOutcome::Page(2)]);
}

#[test]
fn test_disable() {
    let (timers, mut state) = setup(3, 100);
    state
        .set_config(CarouselConfig::new().auto_scroll(false))
        .expect("config");
    assert!(!state.auto_advance().is_armed());
    assert!(timers.is_empty());

    timers.advance(Duration::from_secs(10));
    assert!(fire(&timers, &mut state).is_empty());
    assert_eq!(state.surface().commands(), 0);
}

#[test]
fn test_zero_interval_rejected() {
    let (timers, mut state) = setup(3, 100);
    assert_eq!(
        state.set_config(CarouselConfig::new().auto_scroll(true).interval_ms(0)),
        Err(ConfigError::ZeroInterval)
    );
    assert_eq!(
        state.config().auto_scroll_interval,
        Duration::from_millis(100)
    );
    assert_eq!(timers.len(), 1);
}

#[test]
fn test_unmount() {
    let (timers, mut state) = setup(3, 100);
    state.unmount();
    assert!(timers.is_empty());

    for _ in 0..10 {
        timers.advance(Duration::from_millis(100));
        fire(&timers, &mut state);
    }
    assert_eq!(state.surface().commands(), 0);

    // stays down.
    state
        .set_config(CarouselConfig::new().auto_scroll(true).interval_ms(50))
        .expect("config");
    assert!(timers.is_empty());
}

#[test]
fn test_drop_cancels() {
    let (timers, state) = setup(3, 100);
    assert_eq!(timers.len(), 1);
    drop(state);
    assert!(timers.is_empty());
}

#[test]
fn test_stale_wake_ignored() {
    let (timers, mut state) = setup(3, 100);
    let AdvanceState::Armed(old) = state.auto_advance().state() else {
        panic!("not armed");
    };
    assert!(state.next());

    let stale = TimeOut {
        handle: old,
        counter: 0,
    };
    assert_eq!(state.handle(&stale, Regular), CarouselOutcome::Continue);
    assert_eq!(state.current(), 1);
}

#[test]
fn test_wake_before_layout() {
    let timers = Rc::new(Timers::frozen(Instant::now()));
    let mut state = CarouselState::<Text<'static>>::new();
    state.set_timers(timers.clone());
    state.set_items(items(3));
    state
        .set_config(CarouselConfig::new().auto_scroll(true).interval_ms(100))
        .expect("config");

    timers.advance(Duration::from_millis(100));
    assert_eq!(fire(&timers, &mut state), vec![CarouselOutcome::Unchanged]);
    assert_eq!(state.current(), 0);
    assert_eq!(state.surface().commands(), 0);
}

#[test]
fn test_rearm_triggers() {
    let timers = Rc::new(Timers::frozen(Instant::now()));
    let mut adv = AutoAdvance::with_timers(timers.clone());
    let inputs = ScheduleInputs {
        auto_scroll: true,
        interval: Duration::from_millis(100),
        len: 3,
        current: 0,
    };
    assert!(adv.sync(inputs));
    // nothing changed
    assert!(!adv.sync(inputs));
    // len alone doesn't re-arm
    assert!(!adv.sync(ScheduleInputs { len: 4, ..inputs }));
    assert!(adv.sync(ScheduleInputs {
        len: 4,
        current: 1,
        ..inputs
    }));
    assert_eq!(timers.len(), 1);

    assert!(!adv.sync(ScheduleInputs { len: 0, ..inputs }));
    assert_eq!(adv.state(), AdvanceState::Idle);
    assert!(timers.is_empty());
}

#[test]
fn test_wake_during_drag() {
    let (timers, mut state) = setup(5, 100);

    state.drag_start(200);
    state.drag_to(190);
    assert_eq!(state.surface().offset(), 10.0);

    timers.advance(Duration::from_millis(100));
    assert_eq!(fire(&timers, &mut state), vec![CarouselOutcome::Unchanged]);
    assert_eq!(state.in_flight(), None);
    assert_eq!(state.surface().commands(), 0);

    // the drag keeps control of the page.
    state.drag_to(9);
    assert_eq!(state.surface().offset(), 191.0);
    assert_eq!(state.current(), 2);
    assert_eq!(state.in_flight(), None);
}
