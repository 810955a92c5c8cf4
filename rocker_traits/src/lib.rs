pub mod clock;
pub mod listener;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use listener::{SlideListener, Tick};
