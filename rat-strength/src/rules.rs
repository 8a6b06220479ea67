//!
//! Password scoring.
//!
//! All rules are pure functions of the input. They are called
//! synchronously for every change of the password.
//!

use ratatui::style::Color;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use unicode_segmentation::UnicodeSegmentation;

/// Color token for a strength level.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrengthColor {
    #[default]
    Neutral,
    Red,
    Orange,
    Green,
}

impl StrengthColor {
    /// Token name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StrengthColor::Neutral => "#ccc",
            StrengthColor::Red => "red",
            StrengthColor::Orange => "orange",
            StrengthColor::Green => "green",
        }
    }
}

impl From<StrengthColor> for Color {
    fn from(value: StrengthColor) -> Self {
        match value {
            StrengthColor::Neutral => Color::Rgb(0xcc, 0xcc, 0xcc),
            StrengthColor::Red => Color::Red,
            StrengthColor::Orange => Color::Rgb(0xff, 0xa5, 0x00),
            StrengthColor::Green => Color::Green,
        }
    }
}

/// Result of a rule.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Strength {
    /// Display text.
    pub level: String,
    /// Fill of the strength bar, 0..=100.
    pub fill_percent: u8,
    /// Color of the strength bar.
    pub color: StrengthColor,
}

impl Strength {
    pub fn new(level: impl Into<String>, fill_percent: u8, color: StrengthColor) -> Self {
        Self {
            level: level.into(),
            fill_percent: fill_percent.min(100),
            color,
        }
    }
}

/// Invalid pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrengthError {
    /// Pattern doesn't compile.
    InvalidPattern(String),
}

impl Display for StrengthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StrengthError::InvalidPattern(e) => write!(f, "invalid pattern: {}", e),
        }
    }
}

impl Error for StrengthError {}

/// Characters that must or must not appear in the password.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, StrengthError> {
        Regex::new(pattern)
            .map(Pattern)
            .map_err(|e| StrengthError::InvalidPattern(e.to_string()))
    }

    /// Pattern text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Matches anywhere in the input?
    pub fn is_match(&self, input: &str) -> bool {
        self.0.is_match(input)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

/// Pluggable scoring.
pub trait StrengthRule {
    fn evaluate(
        &self,
        input: &str,
        required: Option<&Pattern>,
        forbidden: Option<&Pattern>,
    ) -> Strength;
}

impl<F> StrengthRule for F
where
    F: Fn(&str, Option<&Pattern>, Option<&Pattern>) -> Strength,
{
    fn evaluate(
        &self,
        input: &str,
        required: Option<&Pattern>,
        forbidden: Option<&Pattern>,
    ) -> Strength {
        (self)(input, required, forbidden)
    }
}

/// Length in grapheme clusters.
pub fn password_len(input: &str) -> usize {
    input.graphemes(true).count()
}

/// Forbidden and required characters come first for all
/// the standard rules.
fn check_patterns(
    input: &str,
    required: Option<&Pattern>,
    forbidden: Option<&Pattern>,
) -> Option<Strength> {
    if let Some(forbidden) = forbidden {
        if forbidden.is_match(input) {
            return Some(Strength::new("Invalid", 0, StrengthColor::Red));
        }
    }
    if let Some(required) = required {
        if !required.is_match(input) {
            return Some(Strength::new(
                "Missing Required Characters",
                30,
                StrengthColor::Orange,
            ));
        }
    }
    None
}

/// Length based rule.
///
/// * forbidden pattern matches: Invalid
/// * required pattern doesn't match: Missing Required Characters
/// * shorter than 6: Weak
/// * shorter than 12: Medium
/// * otherwise: Strong
pub fn evaluate(input: &str, required: Option<&Pattern>, forbidden: Option<&Pattern>) -> Strength {
    if let Some(s) = check_patterns(input, required, forbidden) {
        return s;
    }
    match password_len(input) {
        0..=5 => Strength::new("Weak", 30, StrengthColor::Red),
        6..=11 => Strength::new("Medium", 60, StrengthColor::Orange),
        _ => Strength::new("Strong", 100, StrengthColor::Green),
    }
}

/// The length based [evaluate].
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultRule;

impl StrengthRule for DefaultRule {
    fn evaluate(
        &self,
        input: &str,
        required: Option<&Pattern>,
        forbidden: Option<&Pattern>,
    ) -> Strength {
        evaluate(input, required, forbidden)
    }
}

/// Rule that wants an uppercase letter and a digit.
///
/// * shorter than 8: Too Short
/// * with uppercase letter and digit: Secure
/// * otherwise: Average
#[derive(Debug, Default, Clone, Copy)]
pub struct SecureRule;

impl StrengthRule for SecureRule {
    fn evaluate(
        &self,
        input: &str,
        required: Option<&Pattern>,
        forbidden: Option<&Pattern>,
    ) -> Strength {
        if let Some(s) = check_patterns(input, required, forbidden) {
            return s;
        }
        if password_len(input) < 8 {
            Strength::new("Too Short", 20, StrengthColor::Red)
        } else if has_upper(input) && has_digit(input) {
            Strength::new("Secure", 80, StrengthColor::Green)
        } else {
            Strength::new("Average", 50, StrengthColor::Orange)
        }
    }
}

/// Special characters counted by [score].
pub const SPECIAL_CHARS: &str = "&#@$£µ*!?%";

fn has_upper(input: &str) -> bool {
    input.chars().any(|c| c.is_ascii_uppercase())
}

fn has_digit(input: &str) -> bool {
    input.chars().any(|c| c.is_ascii_digit())
}

/// Simple score 0..=4.
///
/// One point each for: at least 8 long, an uppercase letter,
/// a digit, one of [SPECIAL_CHARS].
pub fn score(input: &str) -> u8 {
    let mut score = 0;
    if password_len(input) >= 8 {
        score += 1;
    }
    if has_upper(input) {
        score += 1;
    }
    if has_digit(input) {
        score += 1;
    }
    if input.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        score += 1;
    }
    score
}

/// Rule based on [score]. Shows `n/4`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScoreRule;

impl StrengthRule for ScoreRule {
    fn evaluate(
        &self,
        input: &str,
        required: Option<&Pattern>,
        forbidden: Option<&Pattern>,
    ) -> Strength {
        if let Some(s) = check_patterns(input, required, forbidden) {
            return s;
        }
        let score = score(input);
        let color = match score {
            0..=1 => StrengthColor::Red,
            2..=3 => StrengthColor::Orange,
            _ => StrengthColor::Green,
        };
        Strength::new(format!("{}/4", score), score * 25, color)
    }
}
