//! Digit window, pattern detection and signal scoring
//!
//! Everything here is synchronous and free of I/O; the [`crate::analyzer`]
//! wraps it with shared state.

pub mod pattern;
pub mod signal;
pub mod window;


pub use pattern::{detect, PatternKind, PatternResult};
pub use signal::{classify, strength, Strength};
pub use window::{DigitWindow, WindowStats};
