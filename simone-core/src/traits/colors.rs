//! Color selection for new rounds

use rand::{Rng, RngCore};

use crate::config::NUMBER_OF_COLORS_GAME;
use crate::game::Color;

/// Picks the color appended on each new round
pub trait ColorSource {
    /// Next color, always one of [`Color::PLAYABLE`]
    fn next_color(&mut self) -> Color;
}

/// Uniform draw over the playable colors
pub struct RandomColors<R> {
    rng: R,
}

impl<R: RngCore> RandomColors<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Get access to the underlying generator
    pub fn rng(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl<R: RngCore> ColorSource for RandomColors<R> {
    fn next_color(&mut self) -> Color {
        Color::PLAYABLE[self.rng.gen_range(0..NUMBER_OF_COLORS_GAME)]
    }
}

/// Repeats a fixed color script, cycling when it runs out
pub struct ScriptedColors<'a> {
    script: &'a [Color],
    pos: usize,
}

impl<'a> ScriptedColors<'a> {
    /// `script` must not be empty
    pub fn new(script: &'a [Color]) -> Self {
        Self { script, pos: 0 }
    }
}

impl ColorSource for ScriptedColors<'_> {
    fn next_color(&mut self) -> Color {
        let Some(&color) = self.script.get(self.pos % self.script.len().max(1)) else {
            return Color::Red;
        };
        self.pos = self.pos.wrapping_add(1);
        color
    }
}
