//! RGB palette for the playable colors

use super::types::LEVEL_MAX_INTENSITY;

/// Full-scale value of one RGB channel
pub const COLOR_RGB_MAX_VALUE: u8 = 255;

/// 8-bit RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const fn pct(percent: u32) -> u8 {
    ((percent * COLOR_RGB_MAX_VALUE as u32) / 100) as u8
}

pub const COLOR_RED: RgbColor = RgbColor::new(COLOR_RGB_MAX_VALUE, 0, 0);
pub const COLOR_GREEN: RgbColor = RgbColor::new(0, COLOR_RGB_MAX_VALUE, 0);
pub const COLOR_BLUE: RgbColor = RgbColor::new(0, 0, COLOR_RGB_MAX_VALUE);
pub const COLOR_YELLOW: RgbColor = RgbColor::new(pct(37), pct(37), 0);
pub const COLOR_WHITE: RgbColor =
    RgbColor::new(COLOR_RGB_MAX_VALUE, COLOR_RGB_MAX_VALUE, COLOR_RGB_MAX_VALUE);
pub const COLOR_TURQUOISE: RgbColor = RgbColor::new(pct(10), pct(35), pct(32));
pub const COLOR_OFF: RgbColor = RgbColor::new(0, 0, 0);

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale every channel by `percent` (capped at [`LEVEL_MAX_INTENSITY`])
    ///
    /// Rounds half up, so 255 at 50% gives 128.
    pub fn with_intensity(self, percent: u8) -> Self {
        let p = percent.min(LEVEL_MAX_INTENSITY) as u32;
        let scale = |c: u8| ((c as u32 * p + 50) / 100) as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }

    /// True when every channel is 0
    pub fn is_off(&self) -> bool {
        *self == COLOR_OFF
    }
}
