//! Console task
//!
//! Owns the keypad scanner and the game sequencer and fires them on every
//! tick. Nothing here waits on the display.
//! The start button raises the same request as the # key.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::{Input, Output};
use rand::rngs::SmallRng;

use simone_core::game::SessionResult;
use simone_core::traits::RandomColors;
use simone_core::{Console, SimoneOutput};
use simone_hal::{EhInput, EhOutput, GpioMatrix};

use super::display::ChannelDisplay;
use super::tick::TICK_SIGNAL;
use crate::channels::START_SIGNAL;

/// 4x4 keypad wired to RP2040 GPIOs
pub type BoardMatrix = GpioMatrix<EhOutput<Output<'static>>, EhInput<Input<'static>>, 4, 4>;

/// Console as assembled on the board
pub type BoardConsole = Console<BoardMatrix, RandomColors<SmallRng>, ChannelDisplay>;

/// Console task - fires the keypad and the game on every tick
#[embassy_executor::task]
pub async fn console_task(console: &'static mut BoardConsole) {
    info!(
        "Console task started (level {}, debounce {} ms)",
        console.config().level,
        console.config().debounce_ms
    );

    let mut best: u8 = 0;

    loop {
        let now_ms = match select(TICK_SIGNAL.wait(), START_SIGNAL.wait()).await {
            Either::First(now_ms) => now_ms,
            Either::Second(()) => {
                debug!("Start button");
                console.start();
                continue;
            }
        };

        let Some(output) = console.fire(now_ms) else {
            continue;
        };

        match output {
            SimoneOutput::SessionStarted { level } => {
                info!("Session started on {}", level);
            }
            SimoneOutput::RoundCompleted { length } => {
                debug!("Round {} reproduced", length);
            }
            SimoneOutput::SessionEnded { result, score } => {
                if score > best {
                    best = score;
                }
                match result {
                    SessionResult::Won => info!("Sequence complete, score {}", score),
                    _ => warn!("Session over ({}), score {} (best {})", result, score, best),
                }
            }
            _ => {}
        }
    }
}
