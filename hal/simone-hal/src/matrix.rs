//! Row/column keyboard matrix
//!
//! The board exposes the matrix as an opaque port: the scanner picks a row,
//! samples the columns of that row, and releases all rows when scanning
//! stops. Exactly one row is excited at a time.

use crate::gpio::{InputPin, OutputPin};

/// Maximum columns a port can report (width of the column bitmask)
pub const MAX_MATRIX_COLS: usize = 16;

/// Board interface for a row/column key matrix
pub trait MatrixPort {
    /// Number of row lines
    fn num_rows(&self) -> u8;

    /// Number of column lines (at most [`MAX_MATRIX_COLS`])
    fn num_cols(&self) -> u8;

    /// Excite `row` and release every other row
    fn select_row(&mut self, row: u8);

    /// Release all rows
    fn release_rows(&mut self);

    /// Sample the columns of the currently excited row
    ///
    /// Bit `n` is set when column `n` reads active. Returns 0 when no row
    /// is excited.
    fn read_columns(&mut self) -> u16;
}

/// Keyboard matrix built from plain GPIO lines
///
/// Rows are active-high outputs, columns are active-high inputs (pulled
/// down on the board).
pub struct GpioMatrix<R, C, const ROWS: usize, const COLS: usize> {
    rows: [R; ROWS],
    cols: [C; COLS],
    selected: Option<u8>,
}

impl<R: OutputPin, C: InputPin, const ROWS: usize, const COLS: usize> GpioMatrix<R, C, ROWS, COLS> {
    /// Create a matrix with every row released
    pub fn new(rows: [R; ROWS], cols: [C; COLS]) -> Self {
        let mut matrix = Self {
            rows,
            cols,
            selected: None,
        };
        matrix.release_rows();
        matrix
    }

    /// Currently excited row
    pub fn selected_row(&self) -> Option<u8> {
        self.selected
    }

    /// Give the pins back
    pub fn release(self) -> ([R; ROWS], [C; COLS]) {
        (self.rows, self.cols)
    }
}

impl<R: OutputPin, C: InputPin, const ROWS: usize, const COLS: usize> MatrixPort
    for GpioMatrix<R, C, ROWS, COLS>
{
    fn num_rows(&self) -> u8 {
        ROWS as u8
    }

    fn num_cols(&self) -> u8 {
        COLS.min(MAX_MATRIX_COLS) as u8
    }

    fn select_row(&mut self, row: u8) {
        let row = row as usize;
        if row >= ROWS {
            self.release_rows();
            return;
        }

        // Drop the old row before raising the new one
        for (i, pin) in self.rows.iter_mut().enumerate() {
            if i != row {
                pin.set_low();
            }
        }
        self.rows[row].set_high();
        self.selected = Some(row as u8);
    }

    fn release_rows(&mut self) {
        for pin in self.rows.iter_mut() {
            pin.set_low();
        }
        self.selected = None;
    }

    fn read_columns(&mut self) -> u16 {
        if self.selected.is_none() {
            return 0;
        }

        let mut mask = 0u16;
        for (i, pin) in self.cols.iter_mut().take(MAX_MATRIX_COLS).enumerate() {
            if pin.is_high() {
                mask |= 1 << i;
            }
        }
        mask
    }
}
