//! Shared millisecond tick
//!
//! A single 1 kHz tick drives both state machines. The console task fires
//! the keypad scanner and then the game sequencer with the same timestamp.
//!
//! Timestamps are milliseconds since boot truncated to `u32`, so they wrap
//! after about 49.7 days. Every deadline in the core is measured as
//! `now.wrapping_sub(start) >= window`, which stays correct across the wrap
//! as long as no single window exceeds `u32::MAX` ms.

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker};

/// Tick period; the debounce and game timings are whole milliseconds
pub const TICK_INTERVAL_MS: u64 = 1;

/// Latest timestamp for the console task
///
/// A `Signal` keeps only the newest value, so a busy console skips ticks
/// instead of queueing stale ones.
pub static TICK_SIGNAL: Signal<CriticalSectionRawMutex, u32> = Signal::new();

/// Wrapping millisecond timestamp
fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

/// Tick task - publishes the wrapping timestamp every millisecond
#[embassy_executor::task]
pub async fn tick_task() {
    info!("Tick task started ({} ms period)", TICK_INTERVAL_MS);

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));
    loop {
        ticker.next().await;
        TICK_SIGNAL.signal(now_ms());
    }
}
