//! Display task
//!
//! The board has a single status LED, so colors are logged and the LED
//! blinks with each pulse and accepted key. The console talks to this task
//! through [`DISPLAY_CHANNEL`] and never blocks on it.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::Timer;

use simone_core::traits::{DisplayError, SimoneDisplay};
use simone_core::SimoneOutput;

use crate::channels::{DisplayCommand, DISPLAY_CHANNEL};

/// Blink length for a rejected key
const REJECT_BLINK_MS: u64 = 80;

/// Display handle used by the console
#[derive(Clone, Copy, Default)]
pub struct ChannelDisplay;

impl SimoneDisplay for ChannelDisplay {
    fn render(&mut self, output: &SimoneOutput) -> Result<(), DisplayError> {
        DISPLAY_CHANNEL
            .try_send(DisplayCommand::Show(*output))
            .map_err(|_| DisplayError::Busy)
    }

    fn blank(&mut self) -> Result<(), DisplayError> {
        DISPLAY_CHANNEL
            .try_send(DisplayCommand::Blank)
            .map_err(|_| DisplayError::Busy)
    }
}

/// Display task - renders game output on the status LED
#[embassy_executor::task]
pub async fn display_task(mut led: Output<'static>) {
    info!("Display task started");
    led.set_low();

    loop {
        match DISPLAY_CHANNEL.receive().await {
            DisplayCommand::Blank => {
                led.set_low();
            }
            DisplayCommand::Show(SimoneOutput::Pulse(pulse)) => {
                debug!(
                    "Pulse {}: {} rgb=({},{},{}) {}%",
                    pulse.index,
                    pulse.color,
                    pulse.rgb.r,
                    pulse.rgb.g,
                    pulse.rgb.b,
                    pulse.intensity
                );
                led.set_high();
                Timer::after_millis(pulse.on_ms as u64).await;
                led.set_low();
            }
            DisplayCommand::Show(SimoneOutput::Feedback {
                color,
                matched,
                hold_ms,
            }) => {
                debug!("Key {} matched={}", color, matched);
                led.set_high();
                let hold = if matched { hold_ms as u64 } else { REJECT_BLINK_MS };
                Timer::after_millis(hold).await;
                led.set_low();
            }
            DisplayCommand::Show(other) => {
                trace!("Display: {}", other);
            }
        }
    }
}
