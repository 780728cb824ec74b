//! Start button task
//!
//! A dedicated push button (active low) that starts a session, for boards
//! whose keypad lacks a # key.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Timer;

use crate::channels::START_SIGNAL;

/// Ignore further edges this long after a press
const BUTTON_SETTLE_MS: u64 = 50;

/// Button task - signals the console on each press
#[embassy_executor::task]
pub async fn button_task(mut button: Input<'static>) {
    info!("Button task started");

    loop {
        button.wait_for_falling_edge().await;
        START_SIGNAL.signal(());
        Timer::after_millis(BUTTON_SETTLE_MS).await;
        button.wait_for_high().await;
        Timer::after_millis(BUTTON_SETTLE_MS).await;
    }
}
