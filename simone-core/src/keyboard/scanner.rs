//! Keyboard scanner
//!
//! Drives the board's row/column matrix one tick at a time. Each call to
//! [`KeyboardFsm::fire`] takes at most one column sample and performs at
//! most one state transition.
//!
//! Timing rules (all comparisons are `elapsed >= threshold`):
//! - A press is accepted once the same key has been active on every sample
//!   for the debounce window.
//! - A release is accepted once the row has been silent on every sample for
//!   the debounce window.
//! - A quiet row yields after `row_timeout_ms` from its selection. Once
//!   activity is seen the row is held until one debounce window after the
//!   first active sample, or until `row_timeout_ms`, whichever is later.
//!   A press confirmed on the tick that window closes is kept, so a steady
//!   key is confirmed whatever the tick size.

use simone_hal::MatrixPort;

use super::machine::{KeyboardState, ScanEvent};
use crate::config::{ConfigError, KeyboardLayout};
use crate::traits::KeySource;

/// Debounced key events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEvent {
    /// Key confirmed down
    Pressed(char),
    /// Key confirmed up
    Released(char),
}

/// Read-only view of the scanner internals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanSnapshot {
    /// Current state
    pub state: KeyboardState,
    /// Whether `fire` is sampling
    pub scanning: bool,
    /// Currently excited row
    pub row: Option<u8>,
    /// When the current row was selected
    pub row_started_ms: u32,
    /// Key being debounced and when it was first seen
    pub candidate: Option<(char, u32)>,
    /// First active sample since the row was selected
    pub activity_since_ms: Option<u32>,
    /// When the held row last went silent
    pub quiet_since_ms: Option<u32>,
}

/// Debounced row/column keyboard scanner
pub struct KeyboardFsm<P> {
    port: P,
    layout: KeyboardLayout,
    state: KeyboardState,
    scanning: bool,
    debounce_ms: u32,
    row_timeout_ms: u32,
    /// Currently excited row
    row: Option<u8>,
    /// Timestamp of the current row selection
    row_started_ms: u32,
    /// First active sample since the row was selected
    activity_since_ms: Option<u32>,
    /// Key under press debounce
    candidate: Option<(char, u32)>,
    /// Start of the current silent period while a key is held
    quiet_since_ms: Option<u32>,
    /// Key currently held down (confirmed)
    held_key: Option<char>,
    /// Latched value for the consumer, kept until `reset_key_value`
    key_value: Option<char>,
    /// Timestamp of the last `fire`
    last_tick_ms: u32,
}

impl<P: MatrixPort> KeyboardFsm<P> {
    /// Create a scanner over `port`
    ///
    /// The scanner starts stopped; call [`start_scan`](Self::start_scan).
    pub fn new(
        port: P,
        layout: KeyboardLayout,
        debounce_ms: u32,
        row_timeout_ms: u32,
    ) -> Result<Self, ConfigError> {
        if debounce_ms == 0 {
            return Err(ConfigError::ZeroDebounce);
        }
        if row_timeout_ms == 0 {
            return Err(ConfigError::ZeroRowTimeout);
        }
        layout.validate()?;
        if port.num_rows() != layout.num_rows || port.num_cols() != layout.num_cols {
            return Err(ConfigError::InvalidLayout);
        }

        Ok(Self {
            port,
            layout,
            state: KeyboardState::ReleasedWaitRow,
            scanning: false,
            debounce_ms,
            row_timeout_ms,
            row: None,
            row_started_ms: 0,
            activity_since_ms: None,
            candidate: None,
            quiet_since_ms: None,
            held_key: None,
            key_value: None,
            last_tick_ms: 0,
        })
    }

    /// Enable sampling, restarting from the first row
    pub fn start_scan(&mut self) {
        self.scanning = true;
        self.state = KeyboardState::ReleasedWaitRow;
        self.row = None;
        self.activity_since_ms = None;
        self.candidate = None;
        self.quiet_since_ms = None;
        self.held_key = None;
    }

    /// Disable sampling and release every row
    pub fn stop_scan(&mut self) {
        self.scanning = false;
        self.port.release_rows();
        self.row = None;
    }

    /// Whether `fire` is sampling
    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    /// Advance the scanner by one tick
    ///
    /// Returns a key event when this tick confirmed a press or a release.
    pub fn fire(&mut self, now_ms: u32) -> Option<KeyEvent> {
        if !self.scanning {
            return None;
        }
        self.last_tick_ms = now_ms;

        let (event, output) = match self.state {
            KeyboardState::ReleasedWaitRow => {
                self.select_next_row(now_ms);
                (Some(ScanEvent::RowSelected), None)
            }
            KeyboardState::ReleasedWait => self.poll_released(now_ms),
            KeyboardState::Pressed => (Some(ScanEvent::KeyLatched), None),
            KeyboardState::PressedWait => self.poll_held(now_ms),
        };

        if let Some(event) = event {
            let next = self.state.transition(event);
            #[cfg(feature = "defmt")]
            defmt::debug!("keyboard: {} -> {} ({})", self.state, next, event);
            self.state = next;
        }

        output
    }

    /// Whether the excited row currently shows any activity
    ///
    /// Reads the port directly, independent of debounce state.
    pub fn check_activity(&mut self) -> bool {
        self.port.read_columns() != 0
    }

    /// Whether the current row has outlived its scan window without a
    /// confirmed press
    pub fn get_row_timeout_status(&self) -> bool {
        self.row.is_some()
            && self.state.is_released()
            && self.row_window_expired(self.last_tick_ms)
    }

    /// Current state
    pub fn get_state(&self) -> KeyboardState {
        self.state
    }

    /// Whether a key is confirmed down right now
    pub fn get_key_pressed_status(&self) -> bool {
        self.held_key.is_some()
    }

    /// Latched key value, kept until [`reset_key_value`](Self::reset_key_value)
    pub fn get_key_value(&self) -> Option<char> {
        self.key_value
    }

    /// Latched key value, or the layout's null key
    pub fn get_key_char(&self) -> char {
        self.key_value.unwrap_or(self.layout.null_key)
    }

    /// Clear the latched key value
    pub fn reset_key_value(&mut self) {
        self.key_value = None;
    }

    /// Debounce window
    pub fn get_debounce_time_ms(&self) -> u32 {
        self.debounce_ms
    }

    /// Row scan window
    pub fn get_row_timeout_ms(&self) -> u32 {
        self.row_timeout_ms
    }

    /// Snapshot of the scanner internals
    pub fn get_inner_fsm(&self) -> ScanSnapshot {
        ScanSnapshot {
            state: self.state,
            scanning: self.scanning,
            row: self.row,
            row_started_ms: self.row_started_ms,
            candidate: self.candidate,
            activity_since_ms: self.activity_since_ms,
            quiet_since_ms: self.quiet_since_ms,
        }
    }

    /// Key layout
    pub fn layout(&self) -> &KeyboardLayout {
        &self.layout
    }

    /// Get access to the underlying port
    pub fn port(&self) -> &P {
        &self.port
    }

    fn select_next_row(&mut self, now_ms: u32) {
        let row = match self.row {
            Some(r) => (r + 1) % self.layout.num_rows,
            None => 0,
        };
        self.port.select_row(row);
        self.row = Some(row);
        self.row_started_ms = now_ms;
        self.activity_since_ms = None;
        self.candidate = None;
    }

    fn row_window_expired(&self, now_ms: u32) -> bool {
        let quiet_expired = now_ms.wrapping_sub(self.row_started_ms) >= self.row_timeout_ms;
        match self.activity_since_ms {
            None => quiet_expired,
            Some(since) => quiet_expired && now_ms.wrapping_sub(since) >= self.debounce_ms,
        }
    }

    /// Lowest active column of the excited row, mapped through the layout
    fn sample_key(&mut self) -> Option<char> {
        let columns = self.port.read_columns();
        if columns == 0 {
            return None;
        }
        let col = columns.trailing_zeros() as u8;
        self.layout.key_at(self.row?, col)
    }

    fn poll_released(&mut self, now_ms: u32) -> (Option<ScanEvent>, Option<KeyEvent>) {
        match self.sample_key() {
            Some(key) => {
                self.activity_since_ms.get_or_insert(now_ms);
                match self.candidate {
                    Some((k, _)) if k == key => {}
                    _ => self.candidate = Some((key, now_ms)),
                }
            }
            None => self.candidate = None,
        }

        if let Some((key, since)) = self.candidate {
            if now_ms.wrapping_sub(since) >= self.debounce_ms {
                self.candidate = None;
                self.quiet_since_ms = None;
                self.held_key = Some(key);
                self.key_value = Some(key);
                return (Some(ScanEvent::KeyStable), Some(KeyEvent::Pressed(key)));
            }
        }

        if self.row_window_expired(now_ms) {
            #[cfg(feature = "defmt")]
            defmt::trace!("keyboard: row {} timed out", self.row);
            self.candidate = None;
            return (Some(ScanEvent::RowTimeout), None);
        }

        (None, None)
    }

    fn poll_held(&mut self, now_ms: u32) -> (Option<ScanEvent>, Option<KeyEvent>) {
        if self.port.read_columns() != 0 {
            // Chatter: the key is still (or again) down
            self.quiet_since_ms = None;
            return (None, None);
        }

        let since = *self.quiet_since_ms.get_or_insert(now_ms);
        if now_ms.wrapping_sub(since) < self.debounce_ms {
            return (None, None);
        }

        self.quiet_since_ms = None;
        let released = self.held_key.take();
        (
            Some(ScanEvent::KeyReleased),
            released.map(KeyEvent::Released),
        )
    }
}

impl<P: MatrixPort> KeySource for KeyboardFsm<P> {
    fn get_key_value(&self) -> Option<char> {
        Self::get_key_value(self)
    }

    fn reset_key_value(&mut self) {
        Self::reset_key_value(self)
    }
}
