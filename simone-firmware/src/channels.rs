//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use simone_core::SimoneOutput;

/// Channel capacity for display commands
const DISPLAY_CHANNEL_SIZE: usize = 8;

/// What the console asks the display task to do
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayCommand {
    /// Show one game output
    Show(SimoneOutput),
    /// Turn everything off
    Blank,
}

/// Game outputs from the console task to the display task
pub static DISPLAY_CHANNEL: Channel<CriticalSectionRawMutex, DisplayCommand, DISPLAY_CHANNEL_SIZE> =
    Channel::new();

/// Start button pressed (alternative to the # key)
pub static START_SIGNAL: Signal<CriticalSectionRawMutex, ()> = Signal::new();
