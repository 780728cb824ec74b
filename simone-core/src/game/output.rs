//! Commands produced for the display collaborator

use super::color::Color;
use crate::config::{Level, RgbColor};

/// One playback pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pulse {
    /// Position in the sequence
    pub index: u8,
    pub color: Color,
    /// Color scaled to `intensity`
    pub rgb: RgbColor,
    /// How long the pulse stays lit
    pub on_ms: u32,
    /// Intensity in percent
    pub intensity: u8,
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionResult {
    /// Full-length sequence reproduced
    Won,
    /// Key mapped to the wrong color
    WrongColor,
    /// Key mapped to no color at all
    InvalidKey,
    /// No key within the input window
    InputTimeout,
    /// Session torn down or internal fault
    Aborted,
}

impl SessionResult {
    pub fn is_win(self) -> bool {
        self == SessionResult::Won
    }
}

/// Output of one sequencer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SimoneOutput {
    /// A new session began
    SessionStarted { level: Level },
    /// Light one sequence element
    Pulse(Pulse),
    /// Show the key just pressed and whether it matched
    Feedback {
        color: Color,
        matched: bool,
        hold_ms: u32,
    },
    /// Round reproduced, the sequence grows next
    RoundCompleted { length: u8 },
    /// Session over
    SessionEnded { result: SessionResult, score: u8 },
}
