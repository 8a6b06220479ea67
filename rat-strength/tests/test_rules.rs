use rat_strength::rules::{
    evaluate, score, DefaultRule, Pattern, ScoreRule, SecureRule, Strength, StrengthColor,
    StrengthError, StrengthRule,
};

#[test]
fn test_length_levels() {
    let s = evaluate("", None, None);
    assert_eq!(s, Strength::new("Weak", 30, StrengthColor::Red));

    let s = evaluate("abcde", None, None);
    assert_eq!(s.level, "Weak");

    let s = evaluate("abcdef", None, None);
    assert_eq!(s, Strength::new("Medium", 60, StrengthColor::Orange));

    let s = evaluate("abcdefghijk", None, None);
    assert_eq!(s.level, "Medium");

    let s = evaluate("abcdefghijkl", None, None);
    assert_eq!(s, Strength::new("Strong", 100, StrengthColor::Green));
}

#[test]
fn test_graphemes() {
    // 5 graphemes, more bytes.
    let s = evaluate("äöüßé", None, None);
    assert_eq!(s.level, "Weak");
    // combining marks
    let s = evaluate("e\u{301}e\u{301}e\u{301}e\u{301}e\u{301}e\u{301}", None, None);
    assert_eq!(s.level, "Medium");
}

#[test]
fn test_forbidden() {
    let forbidden = Pattern::new(r"\s").expect("pattern");
    let s = evaluate("very long password", None, Some(&forbidden));
    assert_eq!(s, Strength::new("Invalid", 0, StrengthColor::Red));

    let s = evaluate("very-long-password", None, Some(&forbidden));
    assert_eq!(s.level, "Strong");
}

#[test]
fn test_required() {
    let required = Pattern::new(r"[0-9]").expect("pattern");
    let s = evaluate("verylongpassword", Some(&required), None);
    assert_eq!(
        s,
        Strength::new("Missing Required Characters", 30, StrengthColor::Orange)
    );

    let s = evaluate("verylongpassword1", Some(&required), None);
    assert_eq!(s.level, "Strong");
}

#[test]
fn test_forbidden_first() {
    let required = Pattern::new(r"[0-9]").expect("pattern");
    let forbidden = Pattern::new(r"x").expect("pattern");
    let s = evaluate("x", Some(&required), Some(&forbidden));
    assert_eq!(s.level, "Invalid");
}

#[test]
fn test_invalid_pattern() {
    assert!(matches!(
        Pattern::new("[a-"),
        Err(StrengthError::InvalidPattern(_))
    ));
}

#[test]
fn test_secure_rule() {
    assert_eq!(SecureRule.evaluate("Abc1", None, None).level, "Too Short");
    assert_eq!(SecureRule.evaluate("abcdefgh", None, None).level, "Average");
    assert_eq!(
        SecureRule.evaluate("Abcdefg1", None, None),
        Strength::new("Secure", 80, StrengthColor::Green)
    );
}

#[test]
fn test_score() {
    assert_eq!(score(""), 0);
    assert_eq!(score("abcdefgh"), 1);
    assert_eq!(score("Abcdefgh"), 2);
    assert_eq!(score("Abcdefg1"), 3);
    assert_eq!(score("Abcdef1!"), 4);
    assert_eq!(score("£"), 1);

    let s = ScoreRule.evaluate("Abcdef1!", None, None);
    assert_eq!(s, Strength::new("4/4", 100, StrengthColor::Green));
    let s = ScoreRule.evaluate("abc", None, None);
    assert_eq!(s, Strength::new("0/4", 0, StrengthColor::Red));
}

#[test]
fn test_closure_rule() {
    let rule = |input: &str, _: Option<&Pattern>, _: Option<&Pattern>| {
        Strength::new(input.to_uppercase(), 42, StrengthColor::Neutral)
    };
    assert_eq!(rule.evaluate("abc", None, None).level, "ABC");
    assert_eq!(DefaultRule.evaluate("abc", None, None).level, "Weak");
}

#[test]
fn test_deterministic() {
    for input in ["", "a", "secret", "Secret123!", "a b c d e f g"] {
        assert_eq!(evaluate(input, None, None), evaluate(input, None, None));
    }
}
