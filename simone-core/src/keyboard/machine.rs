//! Keyboard state machine definition
//!
//! The scanner derives at most one [`ScanEvent`] per tick; the next state
//! is a pure function of the current state and that event.

/// Scanner states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyboardState {
    /// Idle, waiting for the scanner to visit the next row
    #[default]
    ReleasedWaitRow,
    /// A row is excited, no key confirmed yet
    ReleasedWait,
    /// A press has just been confirmed and latched
    Pressed,
    /// Key held down; further presses are suppressed until release
    PressedWait,
}

/// Conditions the scanner detects on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanEvent {
    /// Next row has been excited
    RowSelected,
    /// Row window expired without a confirmed press
    RowTimeout,
    /// Same key active for the full debounce window
    KeyStable,
    /// Confirmed press has been handed to the consumer
    KeyLatched,
    /// No activity for the full debounce window
    KeyReleased,
}

impl KeyboardState {
    /// A key value is only meaningful in these states
    pub fn is_pressed(&self) -> bool {
        matches!(self, KeyboardState::Pressed | KeyboardState::PressedWait)
    }

    /// Row advance is only allowed while no key is held
    pub fn is_released(&self) -> bool {
        !self.is_pressed()
    }

    /// Process an event and return the next state
    pub fn transition(self, event: ScanEvent) -> Self {
        use KeyboardState::*;
        use ScanEvent::*;

        match (self, event) {
            (ReleasedWaitRow, RowSelected) => ReleasedWait,

            (ReleasedWait, KeyStable) => Pressed,
            (ReleasedWait, RowTimeout) => ReleasedWaitRow,

            (Pressed, KeyLatched) => PressedWait,

            (PressedWait, KeyReleased) => ReleasedWaitRow,

            // Default: stay in current state
            _ => self,
        }
    }
}
