//! Keyboard layouts and the key ↔ color assignment

use simone_hal::MAX_MATRIX_COLS;

use super::types::ConfigError;

/// Key that plays RED
pub const KEY_RED: char = '1';
/// Key that plays GREEN
pub const KEY_GREEN: char = '2';
/// Key that plays BLUE
pub const KEY_BLUE: char = '3';
/// Key that plays YELLOW
pub const KEY_YELLOW: char = '4';
/// Key that plays WHITE
pub const KEY_WHITE: char = '5';
/// Key that plays TURQUOISE
pub const KEY_TURQUOISE: char = '6';
/// Key value standing for "no color"
pub const KEY_INVALID_COLOR: char = '\0';
/// Key that starts a session while idle
pub const KEY_START: char = '#';

/// Key mapping of a row/column matrix
///
/// `keys` is stored row-major: the key at (row, col) is
/// `keys[row * num_cols + col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardLayout {
    /// Number of rows in the matrix
    pub num_rows: u8,
    /// Number of columns in the matrix
    pub num_cols: u8,
    /// Character reported when no key is pressed
    pub null_key: char,
    /// Row-major key table
    pub keys: &'static [char],
}

/// Standard 4x4 keypad with star and hash keys
pub static STANDARD_KEYBOARD: KeyboardLayout = KeyboardLayout {
    num_rows: 4,
    num_cols: 4,
    null_key: '\0',
    keys: &[
        '1', '2', '3', 'A', //
        '4', '5', '6', 'B', //
        '7', '8', '9', 'C', //
        '*', '0', '#', 'D',
    ],
};

impl KeyboardLayout {
    /// Key at a matrix position, `None` outside the matrix
    pub fn key_at(&self, row: u8, col: u8) -> Option<char> {
        if row >= self.num_rows || col >= self.num_cols {
            return None;
        }
        self.keys
            .get(row as usize * self.num_cols as usize + col as usize)
            .copied()
    }

    /// Check the key table against the declared dimensions
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_rows == 0 || self.num_cols == 0 {
            return Err(ConfigError::InvalidLayout);
        }
        if self.num_cols as usize > MAX_MATRIX_COLS {
            return Err(ConfigError::LayoutTooLarge);
        }
        if self.keys.len() != self.num_rows as usize * self.num_cols as usize {
            return Err(ConfigError::InvalidLayout);
        }
        Ok(())
    }
}
