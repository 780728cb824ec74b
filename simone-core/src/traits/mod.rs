//! Collaborator traits
//!
//! These traits define the seams between the game logic and whatever
//! feeds it keys, picks its colors, and shows its output.

pub mod colors;
pub mod display;
pub mod keys;

pub use colors::{ColorSource, RandomColors, ScriptedColors};
pub use display::{DisplayError, NullDisplay, SimoneDisplay};
pub use keys::{KeyLatch, KeySource};
