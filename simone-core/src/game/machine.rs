//! Game state machine definition

/// Sequencer states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SimoneState {
    /// No session running, waiting for a start trigger
    #[default]
    Idle,
    /// Appending the next color to the sequence
    AddColor,
    /// Emitting the pulse that has come due
    Playback,
    /// Waiting for the player's next key
    WaitKey,
    /// Showing feedback for the key just pressed
    VerifyInput,
    /// Nothing pending, idle or waiting for input
    SleepWhileIdle,
    /// Between two playback pulses
    SleepWhilePlayback,
}

/// Conditions the sequencer detects on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GameEvent {
    /// Start requested (external signal or start key)
    Start,
    /// Nothing to do this tick
    Quiet,
    /// Woken while no session is running
    WakeIdle,
    /// Woken while waiting for input
    WakeInput,
    /// New color appended, playback anchored
    ColorAdded,
    /// Pulse emitted (or none due yet), wait for the next one
    PulseWait,
    /// Next pulse due, or the last one has gone dark
    PulseDue,
    /// Whole sequence shown
    PlaybackDone,
    /// Player pressed a key
    KeyPressed,
    /// No key within the input window
    InputTimeout,
    /// Key does not match the sequence
    Mismatch,
    /// Key matched, more keys expected this round
    NextKey,
    /// Key matched, round reproduced
    RoundDone,
    /// Key matched, full-length sequence reproduced
    SequenceComplete,
    /// Session torn down or internal fault
    Abort,
}

impl SimoneState {
    /// A session is in progress in these states
    ///
    /// `SleepWhileIdle` is shared by both phases, so the sequencer tracks
    /// that case itself.
    pub fn is_playing(&self) -> bool {
        matches!(
            self,
            SimoneState::AddColor
                | SimoneState::Playback
                | SimoneState::WaitKey
                | SimoneState::VerifyInput
                | SimoneState::SleepWhilePlayback
        )
    }

    /// Low-power waiting states
    pub fn is_sleeping(&self) -> bool {
        matches!(
            self,
            SimoneState::SleepWhileIdle | SimoneState::SleepWhilePlayback
        )
    }

    /// Process an event and return the next state
    pub fn transition(self, event: GameEvent) -> Self {
        use GameEvent::*;
        use SimoneState::*;

        match (self, event) {
            (_, Abort) => Idle,

            (Idle, Start) => AddColor,
            (Idle, Quiet) => SleepWhileIdle,

            (SleepWhileIdle, WakeIdle) => Idle,
            (SleepWhileIdle, WakeInput) => WaitKey,

            (AddColor, ColorAdded) => Playback,

            (Playback, PulseWait) => SleepWhilePlayback,
            (Playback, PlaybackDone) => WaitKey,

            (SleepWhilePlayback, PulseDue) => Playback,

            (WaitKey, KeyPressed) => VerifyInput,
            (WaitKey, InputTimeout) => Idle,
            (WaitKey, Quiet) => SleepWhileIdle,

            (VerifyInput, Mismatch) => Idle,
            (VerifyInput, NextKey) => WaitKey,
            (VerifyInput, RoundDone) => AddColor,
            (VerifyInput, SequenceComplete) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}
