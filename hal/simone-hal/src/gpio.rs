//! GPIO pin abstractions
//!
//! Minimal digital I/O used by the keyboard matrix. Row lines are driven,
//! column lines are sampled.

/// Digital output pin (matrix row driver)
pub trait OutputPin {
    /// Drive the line high (row excited)
    fn set_high(&mut self);

    /// Drive the line low (row released)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the line is currently driven high
    fn is_set_high(&self) -> bool;
}

/// Digital input pin (matrix column sense)
///
/// Takes `&mut self` because some HALs need mutable access to sample.
pub trait InputPin {
    /// Check if the line reads high (logic 1)
    fn is_high(&mut self) -> bool;

    /// Check if the line reads low (logic 0)
    fn is_low(&mut self) -> bool {
        !self.is_high()
    }
}
