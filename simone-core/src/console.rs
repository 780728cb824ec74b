//! Console glue
//!
//! Binds the keyboard scanner, the game sequencer and a display into one
//! tick entry point. The scanner always fires before the sequencer so the
//! game never reads a stale key.

use simone_hal::MatrixPort;

use crate::config::{ConfigError, ConsoleConfig, KeyboardLayout};
use crate::game::{Color, SimoneFsm, SimoneOutput};
use crate::keyboard::{KeyEvent, KeyboardFsm};
use crate::traits::{ColorSource, SimoneDisplay};

/// One game console: keypad, sequencer and display
pub struct Console<P, C, D> {
    keyboard: KeyboardFsm<P>,
    game: SimoneFsm<C>,
    display: D,
    config: ConsoleConfig,
    display_errors: u32,
    last_key_event: Option<KeyEvent>,
}

impl<P: MatrixPort, C: ColorSource, D: SimoneDisplay> Console<P, C, D> {
    /// Build a console and start scanning the keypad
    pub fn new(
        port: P,
        layout: KeyboardLayout,
        colors: C,
        display: D,
        config: ConsoleConfig,
    ) -> Result<Self, ConfigError> {
        Self::with_sequence(port, layout, colors, display, config, &[])
    }

    /// Like [`new`](Self::new), with a preset first sequence
    pub fn with_sequence(
        port: P,
        layout: KeyboardLayout,
        colors: C,
        display: D,
        config: ConsoleConfig,
        preset: &[Color],
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut keyboard = KeyboardFsm::new(port, layout, config.debounce_ms, config.row_timeout_ms)?;
        let game = SimoneFsm::with_sequence(config.level, colors, preset)?;
        keyboard.start_scan();

        Ok(Self {
            keyboard,
            game,
            display,
            config,
            display_errors: 0,
            last_key_event: None,
        })
    }

    /// Run one tick: keypad first, then the game, then the display
    ///
    /// Does nothing while the console is shut down.
    pub fn fire(&mut self, now_ms: u32) -> Option<SimoneOutput> {
        if !self.keyboard.is_scanning() {
            return None;
        }

        if let Some(event) = self.keyboard.fire(now_ms) {
            #[cfg(feature = "defmt")]
            defmt::debug!("console: {}", event);
            self.last_key_event = Some(event);
        }

        let output = self.game.fire(now_ms, &mut self.keyboard)?;
        self.show(&output);
        Some(output)
    }

    /// Request a new session, resuming the keypad scan if shut down
    pub fn start(&mut self) {
        self.resume();
        self.game.start();
    }

    /// Stop scanning, abort any session and blank the display
    pub fn shutdown(&mut self) -> Option<SimoneOutput> {
        self.keyboard.stop_scan();
        let output = self.game.destroy();
        if let Some(output) = &output {
            self.show(output);
        }
        if self.display.blank().is_err() {
            self.display_errors = self.display_errors.saturating_add(1);
        }
        output
    }

    /// Restart the keypad scan after a shutdown
    pub fn resume(&mut self) {
        if !self.keyboard.is_scanning() {
            self.keyboard.start_scan();
        }
    }

    pub fn keyboard(&self) -> &KeyboardFsm<P> {
        &self.keyboard
    }

    pub fn game(&self) -> &SimoneFsm<C> {
        &self.game
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Outputs the display refused so far
    pub fn display_errors(&self) -> u32 {
        self.display_errors
    }

    /// Most recent debounced key event
    pub fn last_key_event(&self) -> Option<KeyEvent> {
        self.last_key_event
    }

    fn show(&mut self, output: &SimoneOutput) {
        if let Err(_e) = self.display.render(output) {
            #[cfg(feature = "defmt")]
            defmt::warn!("console: display dropped output: {}", _e);
            self.display_errors = self.display_errors.saturating_add(1);
        }
    }
}
