//! Simone Hardware Abstraction Layer
//!
//! This crate defines the board-facing traits consumed by the game core.
//! Chip-specific code implements the pin traits (directly or through the
//! `embedded-hal` adapters) and gets a working keyboard matrix for free.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (simone-firmware)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  simone-core (keyboard + game FSMs)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  simone-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  embedded-hal pins (embassy-rp, ...)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`matrix::MatrixPort`] - Row/column keyboard matrix

#![no_std]
#![deny(unsafe_code)]

pub mod adapter;
pub mod gpio;
pub mod matrix;

// Re-export key traits at crate root for convenience
pub use adapter::{EhInput, EhOutput};
pub use gpio::{InputPin, OutputPin};
pub use matrix::{GpioMatrix, MatrixPort, MAX_MATRIX_COLS};
