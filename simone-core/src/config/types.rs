//! Game constants and the per-level configuration table
//!
//! Level selection maps to exactly one table entry. The table is a
//! `static` so every session bound to a level reads the same values.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Longest sequence a session can grow to (reaching it wins the game)
pub const SEQUENCE_LENGTH: usize = 12;

/// Number of playable colors (INVALID excluded)
pub const NUMBER_OF_COLORS_GAME: usize = 6;

/// Minimum playback intensity on EASY (percent)
pub const LEVEL_EASY_MIN_INTENSITY: u8 = 30;

/// Minimum playback intensity on MEDIUM (percent)
pub const LEVEL_MEDIUM_MIN_INTENSITY: u8 = 20;

/// Minimum playback intensity on HARD (percent)
pub const LEVEL_HARD_MIN_INTENSITY: u8 = 10;

/// Upper bound on any intensity sent to the display (percent)
pub const LEVEL_MAX_INTENSITY: u8 = 100;

/// Pulse on-time on EASY
pub const SIMONE_TIME_ON_LEVEL_EASY_MS: u32 = 1000;

/// Pulse on-time on MEDIUM
pub const SIMONE_TIME_ON_LEVEL_MEDIUM_MS: u32 = 600;

/// Pulse on-time on HARD
pub const SIMONE_TIME_ON_LEVEL_HARD_MS: u32 = 300;

/// Dark gap between two playback pulses
pub const SIMONE_TIME_OFF_BETWEEN_COLORS_MS: u32 = 250;

/// How long a verified key stays visible
pub const SIMONE_TIME_VISUAL_FEEDBACK_MS: u32 = 500;

/// How long the player has to press each key
pub const SIMONE_TIME_WAIT_INPUT_MS: u32 = 5000;

/// Default keyboard debounce window
pub const KEYBOARD_DEBOUNCE_TIME_MS: u32 = 150;

/// Default per-row scan window
pub const KEYBOARD_ROW_TIMEOUT_MS: u32 = 25;

/// Configuration faults, rejected before play starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Level index or name out of range
    InvalidLevel,
    /// Preset sequence longer than [`SEQUENCE_LENGTH`]
    SequenceTooLong,
    /// Preset sequence contains a non-playable color
    InvalidColor,
    /// Debounce window of 0 ms
    ZeroDebounce,
    /// Row scan window of 0 ms
    ZeroRowTimeout,
    /// Layout is empty or its key table does not match rows × cols
    InvalidLayout,
    /// Layout has more columns than a port can report
    LayoutTooLarge,
}

/// Difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Level {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Timing and intensity for one level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LevelConfig {
    /// How long each playback pulse is lit
    pub on_time_ms: u32,
    /// Gap between consecutive pulses
    pub off_time_ms: u32,
    /// How long a verified key stays visible
    pub feedback_ms: u32,
    /// Time allowed for each key press
    pub wait_input_ms: u32,
    /// Intensity reached on the final round (percent)
    pub min_intensity: u8,
}

static LEVEL_TABLE: [LevelConfig; 3] = [
    LevelConfig {
        on_time_ms: SIMONE_TIME_ON_LEVEL_EASY_MS,
        off_time_ms: SIMONE_TIME_OFF_BETWEEN_COLORS_MS,
        feedback_ms: SIMONE_TIME_VISUAL_FEEDBACK_MS,
        wait_input_ms: SIMONE_TIME_WAIT_INPUT_MS,
        min_intensity: LEVEL_EASY_MIN_INTENSITY,
    },
    LevelConfig {
        on_time_ms: SIMONE_TIME_ON_LEVEL_MEDIUM_MS,
        off_time_ms: SIMONE_TIME_OFF_BETWEEN_COLORS_MS,
        feedback_ms: SIMONE_TIME_VISUAL_FEEDBACK_MS,
        wait_input_ms: SIMONE_TIME_WAIT_INPUT_MS,
        min_intensity: LEVEL_MEDIUM_MIN_INTENSITY,
    },
    LevelConfig {
        on_time_ms: SIMONE_TIME_ON_LEVEL_HARD_MS,
        off_time_ms: SIMONE_TIME_OFF_BETWEEN_COLORS_MS,
        feedback_ms: SIMONE_TIME_VISUAL_FEEDBACK_MS,
        wait_input_ms: SIMONE_TIME_WAIT_INPUT_MS,
        min_intensity: LEVEL_HARD_MIN_INTENSITY,
    },
];

impl Level {
    /// All levels, easiest first
    pub const ALL: [Level; 3] = [Level::Easy, Level::Medium, Level::Hard];

    /// Table entry for this level
    pub fn config(self) -> &'static LevelConfig {
        &LEVEL_TABLE[self as usize]
    }

    /// Parse a level name (`"easy"`, `"medium"`, `"hard"`, any case)
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.name().eq_ignore_ascii_case(name))
            .ok_or(ConfigError::InvalidLevel)
    }

    /// Lowercase level name
    pub fn name(self) -> &'static str {
        match self {
            Level::Easy => "easy",
            Level::Medium => "medium",
            Level::Hard => "hard",
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(ConfigError::InvalidLevel)
    }
}

impl LevelConfig {
    /// Time between the starts of two consecutive pulses
    pub const fn period_ms(&self) -> u32 {
        self.on_time_ms + self.off_time_ms
    }

    /// Playback intensity for a sequence of `length` colors
    ///
    /// Fades linearly from [`LEVEL_MAX_INTENSITY`] on the first round to
    /// `min_intensity` on round [`SEQUENCE_LENGTH`].
    pub fn intensity_for_round(&self, length: usize) -> u8 {
        let floor = self.min_intensity.min(LEVEL_MAX_INTENSITY);
        let round = length.clamp(1, SEQUENCE_LENGTH);
        if SEQUENCE_LENGTH <= 1 {
            return LEVEL_MAX_INTENSITY;
        }

        let span = (LEVEL_MAX_INTENSITY - floor) as usize;
        let drop = span * (round - 1) / (SEQUENCE_LENGTH - 1);
        (LEVEL_MAX_INTENSITY as usize - drop).clamp(floor as usize, LEVEL_MAX_INTENSITY as usize)
            as u8
    }
}

/// Session parameters chosen at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsoleConfig {
    /// Difficulty for every session
    pub level: Level,
    /// Keyboard debounce window
    pub debounce_ms: u32,
    /// Keyboard per-row scan window
    pub row_timeout_ms: u32,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            level: Level::Easy,
            debounce_ms: KEYBOARD_DEBOUNCE_TIME_MS,
            row_timeout_ms: KEYBOARD_ROW_TIMEOUT_MS,
        }
    }
}

impl ConsoleConfig {
    /// Reject timing values the scanner cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_ms == 0 {
            return Err(ConfigError::ZeroDebounce);
        }
        if self.row_timeout_ms == 0 {
            return Err(ConfigError::ZeroRowTimeout);
        }
        Ok(())
    }
}
