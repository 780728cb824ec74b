//! Debounced keyboard-matrix scanner
//!
//! Turns noisy per-row column samples into one press and one release
//! event per physical key cycle, and moves on to the next row when a row
//! stays silent past its scan window.

pub mod machine;
pub mod scanner;

pub use machine::{KeyboardState, ScanEvent};
pub use scanner::{KeyEvent, KeyboardFsm, ScanSnapshot};
