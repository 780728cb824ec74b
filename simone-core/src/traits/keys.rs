//! Latched key input

/// Source of latched key values
///
/// A key stays latched after the physical release until the consumer
/// clears it, so a press can never be lost between two ticks.
pub trait KeySource {
    /// Latched key, if any
    fn get_key_value(&self) -> Option<char>;

    /// Clear the latched key
    ///
    /// Calling this with nothing latched is a no-op.
    fn reset_key_value(&mut self);

    /// Take the latched key, clearing it
    fn take_key_value(&mut self) -> Option<char> {
        let key = self.get_key_value();
        if key.is_some() {
            self.reset_key_value();
        }
        key
    }
}

/// Single-slot key latch
///
/// Useful where keys come from somewhere other than the matrix scanner,
/// such as a host console or a test script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyLatch {
    key: Option<char>,
}

impl KeyLatch {
    pub const fn new() -> Self {
        Self { key: None }
    }

    /// Latch `key`, replacing any unconsumed value
    pub fn press(&mut self, key: char) {
        self.key = Some(key);
    }
}

impl KeySource for KeyLatch {
    fn get_key_value(&self) -> Option<char> {
        self.key
    }

    fn reset_key_value(&mut self) {
        self.key = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latch_holds_until_reset() {
        let mut latch = KeyLatch::new();
        assert_eq!(latch.get_key_value(), None);

        latch.press('3');
        assert_eq!(latch.get_key_value(), Some('3'));
        assert_eq!(latch.get_key_value(), Some('3'));

        latch.reset_key_value();
        assert_eq!(latch.get_key_value(), None);
        latch.reset_key_value();
        assert_eq!(latch.get_key_value(), None);
    }

    #[test]
    fn test_take_key_value() {
        let mut latch = KeyLatch::new();
        latch.press('#');
        latch.press('1');
        assert_eq!(latch.take_key_value(), Some('1'));
        assert_eq!(latch.take_key_value(), None);
    }
}
