//! Adapters from `embedded-hal` 1.0 digital pins
//!
//! Only infallible pins are accepted: a matrix line that can fail to read
//! has no sensible fallback value.

use core::convert::Infallible;

use embedded_hal::digital;

use crate::gpio::{InputPin, OutputPin};

/// Output pin wrapper tracking the driven level
pub struct EhOutput<T> {
    pin: T,
    high: bool,
}

impl<T: digital::OutputPin<Error = Infallible>> EhOutput<T> {
    /// Wrap a pin, driving it low
    pub fn new(mut pin: T) -> Self {
        match pin.set_low() {
            Ok(()) => {}
            Err(never) => match never {},
        }
        Self { pin, high: false }
    }

    /// Unwrap the inner pin
    pub fn into_inner(self) -> T {
        self.pin
    }
}

impl<T: digital::OutputPin<Error = Infallible>> OutputPin for EhOutput<T> {
    fn set_high(&mut self) {
        match self.pin.set_high() {
            Ok(()) => self.high = true,
            Err(never) => match never {},
        }
    }

    fn set_low(&mut self) {
        match self.pin.set_low() {
            Ok(()) => self.high = false,
            Err(never) => match never {},
        }
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Input pin wrapper
pub struct EhInput<T> {
    pin: T,
}

impl<T: digital::InputPin<Error = Infallible>> EhInput<T> {
    /// Wrap a pin
    pub fn new(pin: T) -> Self {
        Self { pin }
    }

    /// Unwrap the inner pin
    pub fn into_inner(self) -> T {
        self.pin
    }
}

impl<T: digital::InputPin<Error = Infallible>> InputPin for EhInput<T> {
    fn is_high(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(level) => level,
            Err(never) => match never {},
        }
    }
}
