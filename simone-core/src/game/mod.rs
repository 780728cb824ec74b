//! Simone sequence game
//!
//! Each round appends one random color to the sequence, plays the whole
//! sequence back, then waits for the player to repeat it key by key. A
//! session ends on a wrong key, a missed deadline, or when the sequence
//! reaches its full length.

pub mod color;
pub mod machine;
pub mod output;
pub mod session;

pub use color::Color;
pub use machine::{GameEvent, SimoneState};
pub use output::{Pulse, SessionResult, SimoneOutput};
pub use session::{SessionSnapshot, SimoneFsm};
