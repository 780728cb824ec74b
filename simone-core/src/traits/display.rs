//! Output sink for game events

use crate::game::SimoneOutput;

/// Errors reported by a display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Previous output not yet consumed
    Busy,
    /// Display link is down
    Disconnected,
}

/// Something that can show game output (LED, log, console)
///
/// The game never waits on the display. Errors are reported back to the
/// caller, which may drop the output.
pub trait SimoneDisplay {
    /// Present one game output
    fn render(&mut self, output: &SimoneOutput) -> Result<(), DisplayError>;

    /// Turn everything off
    fn blank(&mut self) -> Result<(), DisplayError>;
}

/// Display that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDisplay;

impl SimoneDisplay for NullDisplay {
    fn render(&mut self, _output: &SimoneOutput) -> Result<(), DisplayError> {
        Ok(())
    }

    fn blank(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }
}
