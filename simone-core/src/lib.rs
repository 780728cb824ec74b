//! Board-agnostic core logic for the Simone memory game
//!
//! This crate contains all game logic that does not depend on specific
//! hardware:
//!
//! - Debounced keyboard-matrix scanner (`keyboard`)
//! - "Repeat the growing color sequence" game sequencer (`game`)
//! - Per-difficulty timing/intensity table, layouts and palette (`config`)
//! - Collaborator traits for key input, randomness and display (`traits`)
//! - Tick glue binding the two state machines (`console`)
//!
//! Both state machines are driven by an external periodic tick carrying a
//! monotonic millisecond timestamp. Nothing here blocks or sleeps.

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod console;
pub mod game;
pub mod keyboard;
pub mod traits;

pub use config::{ConfigError, ConsoleConfig, Level};
pub use console::Console;
pub use game::{Color, SimoneFsm, SimoneOutput, SimoneState};
pub use keyboard::{KeyEvent, KeyboardFsm, KeyboardState};
