use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use rat_strength::event::{HandleEvent, PasswordOutcome, Regular};
use rat_strength::input::{PasswordInput, PasswordInputState};
use rat_strength::meter::{StrengthMeter, StrengthMeterState};
use rat_strength::rules::{Pattern, SecureRule, Strength, StrengthColor};
use rat_strength::{PasswordStrength, PasswordStrengthState};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::StatefulWidget;
use std::time::{Duration, Instant};

fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
    Event::Key(KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    })
}

fn typed(state: &mut PasswordInputState, text: &str) {
    for c in text.chars() {
        state.handle(&key(KeyCode::Char(c), KeyModifiers::NONE), Regular);
    }
}

#[test]
fn test_keys() {
    let mut state = PasswordInputState::named("pwd");

    // no focus
    assert_eq!(
        state.handle(&key(KeyCode::Char('a'), KeyModifiers::NONE), Regular),
        PasswordOutcome::Continue
    );
    assert!(state.is_empty());

    state.focus.set(true);
    typed(&mut state, "abc");
    assert_eq!(
        state.handle(&key(KeyCode::Char('D'), KeyModifiers::SHIFT), Regular),
        PasswordOutcome::Value
    );
    assert_eq!(state.value(), "abcD");

    assert_eq!(
        state.handle(&key(KeyCode::Backspace, KeyModifiers::NONE), Regular),
        PasswordOutcome::Value
    );
    assert_eq!(state.value(), "abc");

    assert_eq!(
        state.handle(&key(KeyCode::Esc, KeyModifiers::NONE), Regular),
        PasswordOutcome::Continue
    );

    assert_eq!(
        state.handle(&key(KeyCode::Char('u'), KeyModifiers::CONTROL), Regular),
        PasswordOutcome::Value
    );
    assert!(state.is_empty());
    assert_eq!(
        state.handle(&key(KeyCode::Backspace, KeyModifiers::NONE), Regular),
        PasswordOutcome::Unchanged
    );
}

#[test]
fn test_backspace_grapheme() {
    let mut state = PasswordInputState::new();
    state.set_value("ae\u{301}");
    assert_eq!(state.len(), 2);
    assert!(state.delete_prev());
    assert_eq!(state.value(), "a");
}

#[test]
fn test_paste() {
    let mut state = PasswordInputState::new();
    state.focus.set(true);
    assert_eq!(
        state.handle(&Event::Paste("se\ncret".into()), Regular),
        PasswordOutcome::Value
    );
    assert_eq!(state.value(), "secret");
}

#[test]
fn test_render_masked() {
    let mut state = PasswordInputState::new();
    let area = Rect::new(0, 0, 8, 1);

    let mut buf = Buffer::empty(area);
    PasswordInput::new()
        .placeholder("pass")
        .render(area, &mut buf, &mut state);
    assert_eq!(buf, Buffer::with_lines(["pass    "]));

    state.set_value("abc");
    let mut buf = Buffer::empty(area);
    PasswordInput::new().render(area, &mut buf, &mut state);
    assert_eq!(buf, Buffer::with_lines(["•••     "]));

    assert_eq!(state.screen_cursor(), None);
    state.focus.set(true);
    assert_eq!(state.screen_cursor(), Some((3, 0)));
}

#[test]
fn test_render_meter() {
    let now = Instant::now();
    let mut state = StrengthMeterState::new();
    state.set_strength_now(Strength::new("Weak", 30, StrengthColor::Red));

    let area = Rect::new(0, 0, 10, 2);
    let mut buf = Buffer::empty(area);
    StrengthMeter::new()
        .bar_symbols("#", "-")
        .render(area, &mut buf, &mut state);
    assert_eq!(buf.content()[0].symbol(), "#");
    assert_eq!(buf.content()[2].symbol(), "#");
    assert_eq!(buf.content()[3].symbol(), "-");
    assert_eq!(buf.content()[10].symbol(), "S");

    // animated change
    assert!(state.set_strength(Strength::new("Strong", 100, StrengthColor::Green), now));
    assert!(state.is_animating());
    assert_eq!(state.fill().shown(), 30.0);
    state.tick(now + Duration::from_millis(300));
    assert!(!state.is_animating());
    assert_eq!(state.fill().shown(), 100.0);

    let mut buf = Buffer::empty(area);
    StrengthMeter::new()
        .bar_symbols("#", "-")
        .render(area, &mut buf, &mut state);
    assert_eq!(buf.content()[9].symbol(), "#");
}

#[test]
fn test_meter_without_bar() {
    let mut state = StrengthMeterState::new();
    state.set_strength_now(Strength::new("Medium", 60, StrengthColor::Orange));

    let area = Rect::new(0, 0, 18, 1);
    let mut buf = Buffer::empty(area);
    StrengthMeter::new()
        .enable_color_bar(false)
        .render(area, &mut buf, &mut state);
    assert_eq!(buf, Buffer::with_lines(["Strength: Medium  "]));
    assert!(state.bar_area.is_empty());
}

#[test]
fn test_reevaluate_on_value() {
    let mut state = PasswordStrengthState::named("pwd");
    assert_eq!(state.strength().level, "Weak");

    state.input.focus.set(true);
    for c in "abcdef".chars() {
        state.handle(&key(KeyCode::Char(c), KeyModifiers::NONE), Regular);
    }
    assert_eq!(state.strength().level, "Medium");
    assert!(state.is_animating());

    state.set_forbidden(Some(Pattern::new("f").expect("pattern")));
    assert_eq!(state.strength().level, "Invalid");
    state.set_forbidden(None);

    state.set_rule(SecureRule);
    assert_eq!(state.strength().level, "Too Short");
}

#[test]
fn test_render_composite() {
    let mut state = PasswordStrengthState::new();
    state.set_value("abc");

    let widget = PasswordStrength::new();
    assert_eq!(widget.height(), 3);

    let area = Rect::new(0, 0, 16, 3);
    let mut buf = Buffer::empty(area);
    widget.render(area, &mut buf, &mut state);
    assert_eq!(state.input.area, Rect::new(0, 0, 16, 1));
    assert_eq!(state.meter.bar_area, Rect::new(0, 1, 16, 1));
    assert_eq!(state.meter.label_area, Rect::new(0, 2, 16, 1));
    assert_eq!(buf.content()[0].symbol(), "•");
}
