#![doc = include_str!("../readme.md")]
//
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::collapsible_if)]

pub mod event {
    //!
    //! Event-handler traits and outcomes.
    //!
    //! See [rat-event](https://docs.rs/rat-event/latest/rat_event/)
    //!
    pub use rat_event::*;

    pub use crate::carousel::event::CarouselOutcome;
    pub use crate::timer::TimeOut;
}

/// Module for focus-handling functionality.
/// See [rat-focus](https://docs.rs/rat-focus)
pub mod focus {
    pub use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
}

pub mod carousel;
pub mod config;
pub mod geometry;
pub mod indicator;
pub mod schedule;
pub mod sync;
pub mod timer;
pub mod viewport;

mod util;

pub use carousel::{Carousel, CarouselState, CarouselStyle, Item};
pub use config::{CarouselConfig, ConfigError};

mod _private {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct NonExhaustive;
}
