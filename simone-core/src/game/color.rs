//! Playable colors and their keys

use crate::config::{
    RgbColor, COLOR_BLUE, COLOR_GREEN, COLOR_OFF, COLOR_RED, COLOR_TURQUOISE, COLOR_WHITE,
    COLOR_YELLOW, KEY_BLUE, KEY_GREEN, KEY_INVALID_COLOR, KEY_RED, KEY_TURQUOISE, KEY_WHITE,
    KEY_YELLOW, NUMBER_OF_COLORS_GAME,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sequence element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    White,
    Turquoise,
    /// Key that maps to no color
    Invalid,
}

impl Color {
    /// Colors a sequence may contain
    pub const PLAYABLE: [Color; NUMBER_OF_COLORS_GAME] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::White,
        Color::Turquoise,
    ];

    /// Color assigned to a key
    pub fn from_key(key: char) -> Self {
        match key {
            KEY_RED => Color::Red,
            KEY_GREEN => Color::Green,
            KEY_BLUE => Color::Blue,
            KEY_YELLOW => Color::Yellow,
            KEY_WHITE => Color::White,
            KEY_TURQUOISE => Color::Turquoise,
            _ => Color::Invalid,
        }
    }

    /// Key that plays this color
    pub fn key(self) -> char {
        match self {
            Color::Red => KEY_RED,
            Color::Green => KEY_GREEN,
            Color::Blue => KEY_BLUE,
            Color::Yellow => KEY_YELLOW,
            Color::White => KEY_WHITE,
            Color::Turquoise => KEY_TURQUOISE,
            Color::Invalid => KEY_INVALID_COLOR,
        }
    }

    /// Full-intensity RGB value (off for INVALID)
    pub fn rgb(self) -> RgbColor {
        match self {
            Color::Red => COLOR_RED,
            Color::Green => COLOR_GREEN,
            Color::Blue => COLOR_BLUE,
            Color::Yellow => COLOR_YELLOW,
            Color::White => COLOR_WHITE,
            Color::Turquoise => COLOR_TURQUOISE,
            Color::Invalid => COLOR_OFF,
        }
    }

    pub fn is_playable(self) -> bool {
        self != Color::Invalid
    }

    /// Lowercase color name
    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::White => "white",
            Color::Turquoise => "turquoise",
            Color::Invalid => "invalid",
        }
    }
}
