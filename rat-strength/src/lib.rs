#![doc = include_str!("../readme.md")]

pub mod event {
    //!
    //! Event-handler traits and outcomes.
    //!
    //! See [rat-event](https://docs.rs/rat-event/latest/rat_event/)
    //!
    pub use rat_event::*;

    pub use crate::input::event::PasswordOutcome;
}

pub mod input;
pub mod meter;
pub mod password;
pub mod rules;

pub use password::{PasswordStrength, PasswordStrengthState, PasswordStrengthStyle};
pub use rules::{evaluate, Pattern, Strength, StrengthColor, StrengthError, StrengthRule};

mod _private {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct NonExhaustive;
}
