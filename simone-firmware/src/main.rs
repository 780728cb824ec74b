//! Simone - color sequence memory game firmware
//!
//! Runs the Simone console on an RP2040 board with a 4x4 keypad:
//! rows on GPIO2..GPIO5 (driven), columns on GPIO6..GPIO9 (pulled down),
//! start button on GPIO10 (to ground), status LED on GPIO25.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_time::Instant;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use simone_core::config::{parse_config, SimoneConfig, STANDARD_KEYBOARD};
use simone_core::traits::RandomColors;
use simone_core::Console;
use simone_hal::{EhInput, EhOutput, GpioMatrix};

mod channels;
mod tasks;

use tasks::{BoardConsole, BoardMatrix, ChannelDisplay};

/// Embedded configuration (compiled into firmware)
/// Edit simone.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../simone.toml");

// Static storage for the console (lives for the whole program)
static CONSOLE: StaticCell<BoardConsole> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Simone firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // Keypad matrix
    let rows = [
        EhOutput::new(Output::new(p.PIN_2, Level::Low)),
        EhOutput::new(Output::new(p.PIN_3, Level::Low)),
        EhOutput::new(Output::new(p.PIN_4, Level::Low)),
        EhOutput::new(Output::new(p.PIN_5, Level::Low)),
    ];
    let cols = [
        EhInput::new(Input::new(p.PIN_6, Pull::Down)),
        EhInput::new(Input::new(p.PIN_7, Pull::Down)),
        EhInput::new(Input::new(p.PIN_8, Pull::Down)),
        EhInput::new(Input::new(p.PIN_9, Pull::Down)),
    ];
    let matrix: BoardMatrix = GpioMatrix::new(rows, cols);

    // Color draws
    let seed = config
        .seed
        .unwrap_or_else(|| Instant::now().as_ticks() ^ 0x5349_4d4f_4e45);
    let colors = RandomColors::new(SmallRng::seed_from_u64(seed));
    debug!("Color seed {}", seed);

    let console = match Console::new(
        matrix,
        STANDARD_KEYBOARD,
        colors,
        ChannelDisplay,
        config.console,
    ) {
        Ok(console) => console,
        Err(e) => {
            // parse_config already validated these values
            defmt::panic!("Console rejected configuration: {}", e);
        }
    };
    let console = CONSOLE.init(console);
    info!("Console ready, press # to start");

    let led = Output::new(p.PIN_25, Level::Low);
    let button = Input::new(p.PIN_10, Pull::Up);

    spawner.spawn(tasks::tick_task()).unwrap();
    spawner.spawn(tasks::display_task(led)).unwrap();
    spawner.spawn(tasks::button_task(button)).unwrap();
    spawner.spawn(tasks::console_task(console)).unwrap();

    info!("All tasks spawned, firmware running");
}

/// Parse the embedded configuration, falling back to defaults
fn load_config() -> SimoneConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Configuration loaded: level {}, debounce {} ms, row timeout {} ms",
                config.console.level, config.console.debounce_ms, config.console.row_timeout_ms
            );
            config
        }
        Err(e) => {
            warn!("Invalid simone.toml ({}), using defaults", e);
            SimoneConfig::default()
        }
    }
}
