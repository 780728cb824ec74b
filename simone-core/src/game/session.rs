//! Game sequencer
//!
//! [`SimoneFsm::fire`] takes one logical step per call. Key input is read
//! from a [`KeySource`] and cleared as soon as it is consumed.
//!
//! Playback is anchored at the tick that appends the new color: pulse `i`
//! is due at `start + i * (on + off)`. `SleepWhilePlayback` waits for that
//! point and `Playback` emits the pulse on the following tick, so a late
//! tick delays one pulse but never the ones after it.

use heapless::Vec;

use super::color::Color;
use super::machine::{GameEvent, SimoneState};
use super::output::{Pulse, SessionResult, SimoneOutput};
use crate::config::{ConfigError, Level, LevelConfig, KEY_START, SEQUENCE_LENGTH};
use crate::traits::{ColorSource, KeySource};

/// Read-only view of the sequencer internals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionSnapshot {
    pub state: SimoneState,
    /// A session is running
    pub active: bool,
    /// Current sequence length
    pub length: u8,
    /// Sequence position the next key is checked against
    pub input_index: u8,
    /// Pulses emitted in the current playback
    pub pulses_emitted: u8,
    pub playback_started_ms: u32,
    pub wait_started_ms: u32,
    pub feedback_started_ms: u32,
}

/// "Repeat the growing color sequence" sequencer
pub struct SimoneFsm<C> {
    colors: C,
    level: Level,
    timing: &'static LevelConfig,
    state: SimoneState,
    sequence: Vec<Color, SEQUENCE_LENGTH>,
    /// Session running (also distinguishes the two uses of `SleepWhileIdle`)
    active: bool,
    start_requested: bool,
    /// Next session plays the preset sequence before growing it
    preset_pending: bool,
    /// Skip the append on the next `AddColor`
    skip_add: bool,
    input_index: u8,
    pulses_emitted: u8,
    playback_started_ms: u32,
    wait_started_ms: u32,
    feedback_started_ms: u32,
    /// Color of the key being verified
    pressed: Color,
    last_key: Option<char>,
    score: u8,
}

impl<C: ColorSource> SimoneFsm<C> {
    /// Create an idle sequencer for `level`
    pub fn new(level: Level, colors: C) -> Self {
        Self {
            colors,
            level,
            timing: level.config(),
            state: SimoneState::Idle,
            sequence: Vec::new(),
            active: false,
            start_requested: false,
            preset_pending: false,
            skip_add: false,
            input_index: 0,
            pulses_emitted: 0,
            playback_started_ms: 0,
            wait_started_ms: 0,
            feedback_started_ms: 0,
            pressed: Color::Invalid,
            last_key: None,
            score: 0,
        }
    }

    /// Create a sequencer whose first session starts from `preset`
    ///
    /// The preset is played as-is on the first round, then grows as usual.
    pub fn with_sequence(level: Level, colors: C, preset: &[Color]) -> Result<Self, ConfigError> {
        if preset.len() > SEQUENCE_LENGTH {
            return Err(ConfigError::SequenceTooLong);
        }
        if preset.iter().any(|c| !c.is_playable()) {
            return Err(ConfigError::InvalidColor);
        }

        let mut fsm = Self::new(level, colors);
        fsm.sequence = Vec::from_slice(preset).map_err(|_| ConfigError::SequenceTooLong)?;
        fsm.preset_pending = !preset.is_empty();
        Ok(fsm)
    }

    /// Request a new session
    ///
    /// Honored on the next idle tick; ignored while a session runs.
    pub fn start(&mut self) {
        if !self.active {
            self.start_requested = true;
        }
    }

    /// Advance the sequencer by one step
    pub fn fire<K: KeySource>(&mut self, now_ms: u32, keys: &mut K) -> Option<SimoneOutput> {
        let (event, output) = match self.state {
            SimoneState::Idle => self.on_idle(keys),
            SimoneState::SleepWhileIdle => self.on_sleep_idle(now_ms, keys),
            SimoneState::AddColor => self.on_add_color(now_ms),
            SimoneState::Playback => self.on_playback(now_ms, keys),
            SimoneState::SleepWhilePlayback => self.on_sleep_playback(now_ms),
            SimoneState::WaitKey => self.on_wait_key(now_ms, keys),
            SimoneState::VerifyInput => self.on_verify(now_ms),
        };

        if let Some(event) = event {
            let next = self.state.transition(event);
            #[cfg(feature = "defmt")]
            defmt::debug!("simone: {} -> {} ({})", self.state, next, event);
            self.state = next;
        }

        output
    }

    /// Tear down the session and clear the sequence
    ///
    /// Returns the abort notice if a session was running. Safe to call on
    /// an idle sequencer.
    pub fn destroy(&mut self) -> Option<SimoneOutput> {
        let output = if self.active {
            Some(self.end_session(SessionResult::Aborted))
        } else {
            None
        };
        self.state = self.state.transition(GameEvent::Abort);
        self.sequence.clear();
        self.preset_pending = false;
        self.skip_add = false;
        self.start_requested = false;
        self.input_index = 0;
        self.pulses_emitted = 0;
        output
    }

    pub fn get_state(&self) -> SimoneState {
        self.state
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Timing table entry in use
    pub fn timing(&self) -> &'static LevelConfig {
        self.timing
    }

    /// Current target sequence
    pub fn sequence(&self) -> &[Color] {
        &self.sequence
    }

    pub fn input_index(&self) -> u8 {
        self.input_index
    }

    /// Rounds reproduced in the current (or last) session
    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Last key consumed from the key source
    pub fn last_key(&self) -> Option<char> {
        self.last_key
    }

    /// Snapshot of the sequencer internals
    pub fn get_inner_fsm(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            active: self.active,
            length: self.sequence.len() as u8,
            input_index: self.input_index,
            pulses_emitted: self.pulses_emitted,
            playback_started_ms: self.playback_started_ms,
            wait_started_ms: self.wait_started_ms,
            feedback_started_ms: self.feedback_started_ms,
        }
    }

    fn on_idle<K: KeySource>(&mut self, keys: &mut K) -> (Option<GameEvent>, Option<SimoneOutput>) {
        if let Some(key) = keys.take_key_value() {
            self.last_key = Some(key);
            if key == KEY_START {
                self.start_requested = true;
            }
        }

        if !self.start_requested {
            return (Some(GameEvent::Quiet), None);
        }

        self.start_requested = false;
        self.active = true;
        self.score = 0;
        self.input_index = 0;
        if self.preset_pending {
            self.preset_pending = false;
            self.skip_add = true;
        } else {
            self.sequence.clear();
        }

        #[cfg(feature = "defmt")]
        defmt::info!("simone: session started ({})", self.level);
        (
            Some(GameEvent::Start),
            Some(SimoneOutput::SessionStarted { level: self.level }),
        )
    }

    fn on_sleep_idle<K: KeySource>(
        &mut self,
        now_ms: u32,
        keys: &mut K,
    ) -> (Option<GameEvent>, Option<SimoneOutput>) {
        let key_pending = keys.get_key_value().is_some();
        if self.active {
            let expired = now_ms.wrapping_sub(self.wait_started_ms) >= self.timing.wait_input_ms;
            if key_pending || expired {
                return (Some(GameEvent::WakeInput), None);
            }
        } else if key_pending || self.start_requested {
            return (Some(GameEvent::WakeIdle), None);
        }
        (None, None)
    }

    fn on_add_color(&mut self, now_ms: u32) -> (Option<GameEvent>, Option<SimoneOutput>) {
        if self.skip_add {
            self.skip_add = false;
        } else {
            let color = self.colors.next_color();
            if !color.is_playable() || self.sequence.push(color).is_err() {
                #[cfg(feature = "defmt")]
                defmt::warn!("simone: cannot append {}, aborting", color);
                return self.abort();
            }
        }

        self.playback_started_ms = now_ms;
        self.pulses_emitted = 0;
        (Some(GameEvent::ColorAdded), None)
    }

    fn on_playback<K: KeySource>(
        &mut self,
        now_ms: u32,
        keys: &mut K,
    ) -> (Option<GameEvent>, Option<SimoneOutput>) {
        let next = self.pulses_emitted;
        if (next as usize) < self.sequence.len() {
            if !self.pulse_due(next, now_ms) {
                return (Some(GameEvent::PulseWait), None);
            }
            let Some(pulse) = self.pulse(next) else {
                return self.abort();
            };
            self.pulses_emitted += 1;
            return (Some(GameEvent::PulseWait), Some(SimoneOutput::Pulse(pulse)));
        }

        if !self.playback_ended(now_ms) {
            return (Some(GameEvent::PulseWait), None);
        }

        // Keys pressed while the sequence was shown do not count
        keys.reset_key_value();
        self.input_index = 0;
        self.wait_started_ms = now_ms;
        (Some(GameEvent::PlaybackDone), None)
    }

    fn on_sleep_playback(&mut self, now_ms: u32) -> (Option<GameEvent>, Option<SimoneOutput>) {
        let next = self.pulses_emitted;
        let due = if (next as usize) < self.sequence.len() {
            self.pulse_due(next, now_ms)
        } else {
            self.playback_ended(now_ms)
        };
        if due {
            (Some(GameEvent::PulseDue), None)
        } else {
            (None, None)
        }
    }

    fn on_wait_key<K: KeySource>(
        &mut self,
        now_ms: u32,
        keys: &mut K,
    ) -> (Option<GameEvent>, Option<SimoneOutput>) {
        if let Some(key) = keys.take_key_value() {
            let color = Color::from_key(key);
            let matched =
                color.is_playable() && self.sequence.get(self.input_index as usize) == Some(&color);
            self.last_key = Some(key);
            self.pressed = color;
            self.feedback_started_ms = now_ms;
            return (
                Some(GameEvent::KeyPressed),
                Some(SimoneOutput::Feedback {
                    color,
                    matched,
                    hold_ms: self.timing.feedback_ms,
                }),
            );
        }

        if now_ms.wrapping_sub(self.wait_started_ms) >= self.timing.wait_input_ms {
            #[cfg(feature = "defmt")]
            defmt::warn!("simone: no key within {} ms", self.timing.wait_input_ms);
            let output = self.end_session(SessionResult::InputTimeout);
            return (Some(GameEvent::InputTimeout), Some(output));
        }

        (Some(GameEvent::Quiet), None)
    }

    fn on_verify(&mut self, now_ms: u32) -> (Option<GameEvent>, Option<SimoneOutput>) {
        if now_ms.wrapping_sub(self.feedback_started_ms) < self.timing.feedback_ms {
            return (None, None);
        }

        let index = self.input_index as usize;
        if self.sequence.get(index) != Some(&self.pressed) {
            let result = if self.pressed.is_playable() {
                SessionResult::WrongColor
            } else {
                SessionResult::InvalidKey
            };
            #[cfg(feature = "defmt")]
            defmt::warn!("simone: {} at position {}", result, index);
            let output = self.end_session(result);
            return (Some(GameEvent::Mismatch), Some(output));
        }

        if index + 1 < self.sequence.len() {
            self.input_index += 1;
            self.wait_started_ms = now_ms;
            return (Some(GameEvent::NextKey), None);
        }

        self.score = self.score.saturating_add(1);
        let length = self.sequence.len();
        if length >= SEQUENCE_LENGTH {
            #[cfg(feature = "defmt")]
            defmt::info!("simone: sequence complete");
            let output = self.end_session(SessionResult::Won);
            return (Some(GameEvent::SequenceComplete), Some(output));
        }

        self.input_index = 0;
        (
            Some(GameEvent::RoundDone),
            Some(SimoneOutput::RoundCompleted {
                length: length as u8,
            }),
        )
    }

    /// Pulse for sequence position `index` at this round's intensity
    fn pulse(&self, index: u8) -> Option<Pulse> {
        let color = *self.sequence.get(index as usize)?;
        let intensity = self.timing.intensity_for_round(self.sequence.len());
        Some(Pulse {
            index,
            color,
            rgb: color.rgb().with_intensity(intensity),
            on_ms: self.timing.on_time_ms,
            intensity,
        })
    }

    fn pulse_due(&self, index: u8, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.playback_started_ms) >= index as u32 * self.timing.period_ms()
    }

    /// Whether the last pulse of this playback has gone dark
    fn playback_ended(&self, now_ms: u32) -> bool {
        let n = self.sequence.len() as u32;
        let end = n.saturating_sub(1) * self.timing.period_ms() + self.timing.on_time_ms;
        now_ms.wrapping_sub(self.playback_started_ms) >= end
    }

    fn abort(&mut self) -> (Option<GameEvent>, Option<SimoneOutput>) {
        let output = self.end_session(SessionResult::Aborted);
        (Some(GameEvent::Abort), Some(output))
    }

    fn end_session(&mut self, result: SessionResult) -> SimoneOutput {
        self.active = false;
        #[cfg(feature = "defmt")]
        defmt::info!("simone: session ended {} (score {})", result, self.score);
        SimoneOutput::SessionEnded {
            result,
            score: self.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LEVEL_MAX_INTENSITY, SIMONE_TIME_OFF_BETWEEN_COLORS_MS};
    use crate::traits::{KeyLatch, RandomColors, ScriptedColors};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    type Outputs = Vec<(u32, SimoneOutput), 64>;

    /// Drives a sequencer with fixed-size ticks (1 ms unless set)
    struct Harness<C> {
        fsm: SimoneFsm<C>,
        keys: KeyLatch,
        now: u32,
        tick: u32,
    }

    impl<C: ColorSource> Harness<C> {
        fn new(fsm: SimoneFsm<C>) -> Self {
            Self {
                fsm,
                keys: KeyLatch::new(),
                now: 0,
                tick: 1,
            }
        }

        fn with_tick(mut self, tick: u32) -> Self {
            self.tick = tick;
            self
        }

        fn step(&mut self, outputs: &mut Outputs) {
            let t = self.now;
            if let Some(output) = self.fsm.fire(t, &mut self.keys) {
                outputs.push((t, output)).unwrap();
            }
            self.now += self.tick;
        }

        /// Fire until `state` is reached (no-op if already there)
        fn advance_to(&mut self, state: SimoneState) -> Outputs {
            let mut outputs = Vec::new();
            let limit = self.now + 100_000;
            while self.fsm.get_state() != state {
                assert!(self.now < limit, "stuck in {:?}", self.fsm.get_state());
                self.step(&mut outputs);
            }
            outputs
        }

        /// Press `key` and fire until its verification is over
        fn answer(&mut self, key: char) -> Outputs {
            let mut outputs = Vec::new();
            self.keys.press(key);
            while matches!(
                self.fsm.get_state(),
                SimoneState::WaitKey | SimoneState::SleepWhileIdle
            ) {
                self.step(&mut outputs);
            }
            while self.fsm.get_state() == SimoneState::VerifyInput {
                self.step(&mut outputs);
            }
            outputs
        }
    }

    fn scripted(level: Level, preset: &[Color]) -> Harness<ScriptedColors<'static>> {
        let colors = ScriptedColors::new(&[Color::Green, Color::Blue, Color::Yellow]);
        Harness::new(SimoneFsm::with_sequence(level, colors, preset).unwrap())
    }

    fn ended(outputs: &Outputs) -> Option<(SessionResult, u8)> {
        outputs.iter().find_map(|(_, o)| match o {
            SimoneOutput::SessionEnded { result, score } => Some((*result, *score)),
            _ => None,
        })
    }

    #[test]
    fn test_new_is_idle() {
        let fsm = SimoneFsm::new(Level::Medium, ScriptedColors::new(&[Color::Red]));
        assert_eq!(fsm.get_state(), SimoneState::Idle);
        assert!(fsm.sequence().is_empty());
        assert!(!fsm.is_active());
        assert_eq!(fsm.level(), Level::Medium);
        assert_eq!(fsm.timing(), Level::Medium.config());
    }

    #[test]
    fn test_with_sequence_validation() {
        let too_long = [Color::Red; SEQUENCE_LENGTH + 1];
        assert_eq!(
            SimoneFsm::with_sequence(Level::Easy, ScriptedColors::new(&[]), &too_long).err(),
            Some(ConfigError::SequenceTooLong)
        );
        assert_eq!(
            SimoneFsm::with_sequence(
                Level::Easy,
                ScriptedColors::new(&[]),
                &[Color::Red, Color::Invalid]
            )
            .err(),
            Some(ConfigError::InvalidColor)
        );
        let full = [Color::Blue; SEQUENCE_LENGTH];
        assert!(SimoneFsm::with_sequence(Level::Easy, ScriptedColors::new(&[]), &full).is_ok());
    }

    #[test]
    fn test_idle_sleeps_until_started() {
        let mut h = scripted(Level::Easy, &[]);
        let mut outputs = Vec::new();

        h.step(&mut outputs);
        assert_eq!(h.fsm.get_state(), SimoneState::SleepWhileIdle);
        for _ in 0..100 {
            h.step(&mut outputs);
        }
        assert_eq!(h.fsm.get_state(), SimoneState::SleepWhileIdle);
        assert!(outputs.is_empty());

        h.fsm.start();
        h.step(&mut outputs);
        assert_eq!(h.fsm.get_state(), SimoneState::Idle);
        h.step(&mut outputs);
        assert_eq!(h.fsm.get_state(), SimoneState::AddColor);
        assert_eq!(
            outputs[0].1,
            SimoneOutput::SessionStarted { level: Level::Easy }
        );
        assert!(h.fsm.is_active());
    }

    #[test]
    fn test_start_key_starts_session() {
        let mut h = scripted(Level::Hard, &[]);
        h.keys.press(KEY_START);

        let outputs = h.advance_to(SimoneState::AddColor);
        assert_eq!(
            outputs[0].1,
            SimoneOutput::SessionStarted { level: Level::Hard }
        );
        assert_eq!(h.keys.get_key_value(), None);
        assert_eq!(h.fsm.last_key(), Some(KEY_START));
    }

    #[test]
    fn test_other_keys_discarded_while_idle() {
        let mut h = scripted(Level::Easy, &[]);
        let mut outputs = Vec::new();
        h.keys.press('1');

        h.step(&mut outputs);
        assert_eq!(h.fsm.get_state(), SimoneState::SleepWhileIdle);
        assert_eq!(h.keys.get_key_value(), None);
        assert!(!h.fsm.is_active());
        assert!(outputs.is_empty());
    }

    #[test]
    fn test_correct_key_grows_sequence() {
        let mut h = scripted(Level::Easy, &[Color::Red]);
        h.fsm.start();

        let outputs = h.advance_to(SimoneState::WaitKey);
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].1, SimoneOutput::SessionStarted { level: Level::Easy });
        assert_eq!(
            outputs[1].1,
            SimoneOutput::Pulse(Pulse {
                index: 0,
                color: Color::Red,
                rgb: Color::Red.rgb(),
                on_ms: 1000,
                intensity: LEVEL_MAX_INTENSITY,
            })
        );
        // Input is only awaited once the pulse went dark
        assert!(h.now > outputs[1].0 + 1000);

        let outputs = h.answer('1');
        assert_eq!(
            outputs[0].1,
            SimoneOutput::Feedback {
                color: Color::Red,
                matched: true,
                hold_ms: 500,
            }
        );
        assert_eq!(outputs[1].1, SimoneOutput::RoundCompleted { length: 1 });
        assert!(outputs[1].0 - outputs[0].0 >= 500);
        assert_eq!(h.fsm.get_state(), SimoneState::AddColor);
        assert_eq!(h.fsm.score(), 1);

        let outputs = h.advance_to(SimoneState::SleepWhilePlayback);
        assert_eq!(h.fsm.sequence(), &[Color::Red, Color::Green]);
        assert!(matches!(
            outputs[0].1,
            SimoneOutput::Pulse(Pulse { index: 0, color: Color::Red, .. })
        ));
    }

    #[test]
    fn test_wrong_color_ends_session() {
        let mut h = scripted(Level::Easy, &[Color::Red, Color::Green]);
        h.fsm.start();
        h.advance_to(SimoneState::WaitKey);

        let outputs = h.answer('2');
        assert_eq!(
            outputs[0].1,
            SimoneOutput::Feedback {
                color: Color::Green,
                matched: false,
                hold_ms: 500,
            }
        );
        assert_eq!(ended(&outputs), Some((SessionResult::WrongColor, 0)));
        assert_eq!(h.fsm.get_state(), SimoneState::Idle);
        assert!(!h.fsm.is_active());
    }

    #[test]
    fn test_non_color_key_ends_session() {
        let mut h = scripted(Level::Medium, &[Color::Blue]);
        h.fsm.start();
        h.advance_to(SimoneState::WaitKey);

        let outputs = h.answer('9');
        assert_eq!(
            outputs[0].1,
            SimoneOutput::Feedback {
                color: Color::Invalid,
                matched: false,
                hold_ms: 500,
            }
        );
        assert_eq!(ended(&outputs), Some((SessionResult::InvalidKey, 0)));
        assert_eq!(h.fsm.get_state(), SimoneState::Idle);
    }

    #[test]
    fn test_input_timeout_ends_session() {
        let mut h = scripted(Level::Easy, &[Color::Red]);
        h.fsm.start();
        h.advance_to(SimoneState::WaitKey);
        let waiting_since = h.now;

        let mut outputs = Vec::new();
        h.step(&mut outputs);
        assert_eq!(h.fsm.get_state(), SimoneState::SleepWhileIdle);

        let outputs = h.advance_to(SimoneState::Idle);
        assert_eq!(outputs.len(), 1);
        let (at, output) = outputs[0];
        assert_eq!(
            output,
            SimoneOutput::SessionEnded {
                result: SessionResult::InputTimeout,
                score: 0,
            }
        );
        assert!(at >= waiting_since + 5000);
        assert!(at <= waiting_since + 5002);
    }

    #[test]
    fn test_key_wakes_input_sleep() {
        let mut h = scripted(Level::Easy, &[Color::Red, Color::Blue]);
        h.fsm.start();
        h.advance_to(SimoneState::WaitKey);
        let outputs = h.answer('1');
        assert_eq!(ended(&outputs), None);
        assert_eq!(h.fsm.input_index(), 1);

        h.advance_to(SimoneState::SleepWhileIdle);
        for _ in 0..1000 {
            h.step(&mut Vec::new());
        }
        assert_eq!(h.fsm.get_state(), SimoneState::SleepWhileIdle);

        // Deadline restarts for every key
        let outputs = h.answer('3');
        assert_eq!(ended(&outputs), None);
        assert_eq!(h.fsm.get_state(), SimoneState::AddColor);
    }

    #[test]
    fn test_keys_during_playback_are_flushed() {
        let mut h = scripted(Level::Hard, &[Color::Red, Color::Red]);
        h.fsm.start();
        h.advance_to(SimoneState::SleepWhilePlayback);
        h.keys.press('1');

        h.advance_to(SimoneState::WaitKey);
        assert_eq!(h.keys.get_key_value(), None);

        let mut outputs = Vec::new();
        h.step(&mut outputs);
        assert!(outputs.is_empty());
        assert_eq!(h.fsm.get_state(), SimoneState::SleepWhileIdle);
        assert_eq!(h.fsm.input_index(), 0);
    }

    #[test]
    fn test_full_sequence_wins() {
        let preset = [
            Color::Red,
            Color::Green,
            Color::Blue,
            Color::Yellow,
            Color::White,
            Color::Turquoise,
            Color::Red,
            Color::Green,
            Color::Blue,
            Color::Yellow,
            Color::White,
            Color::Turquoise,
        ];
        let mut h = scripted(Level::Hard, &preset);
        h.fsm.start();
        h.advance_to(SimoneState::WaitKey);

        let mut outputs = Outputs::new();
        for color in preset {
            outputs = h.answer(color.key());
        }
        assert_eq!(ended(&outputs), Some((SessionResult::Won, 1)));
        assert_eq!(h.fsm.get_state(), SimoneState::Idle);
        assert_eq!(h.fsm.sequence().len(), SEQUENCE_LENGTH);
    }

    #[test]
    fn test_perfect_play_reaches_win() {
        let colors = RandomColors::new(SmallRng::seed_from_u64(0x5151));
        let mut h = Harness::new(SimoneFsm::new(Level::Hard, colors));
        h.fsm.start();

        for round in 1..=SEQUENCE_LENGTH {
            h.advance_to(SimoneState::WaitKey);
            let sequence: Vec<Color, SEQUENCE_LENGTH> = Vec::from_slice(h.fsm.sequence()).unwrap();
            assert_eq!(sequence.len(), round);
            assert!(sequence.iter().all(|c| c.is_playable()));

            let mut outputs = Vec::new();
            for color in sequence {
                outputs = h.answer(color.key());
            }

            if round < SEQUENCE_LENGTH {
                assert_eq!(h.fsm.get_state(), SimoneState::AddColor);
                assert_eq!(
                    outputs.last().map(|(_, o)| *o),
                    Some(SimoneOutput::RoundCompleted { length: round as u8 })
                );
            } else {
                assert_eq!(h.fsm.get_state(), SimoneState::Idle);
                assert_eq!(
                    ended(&outputs),
                    Some((SessionResult::Won, SEQUENCE_LENGTH as u8))
                );
            }
        }
    }

    #[test]
    fn test_preset_only_applies_once() {
        let mut h = scripted(Level::Easy, &[Color::White]);
        h.fsm.start();
        h.advance_to(SimoneState::WaitKey);
        h.answer('4');
        assert_eq!(h.fsm.get_state(), SimoneState::Idle);

        h.fsm.start();
        h.advance_to(SimoneState::WaitKey);
        assert_eq!(h.fsm.sequence(), &[Color::Green]);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut h = scripted(Level::Easy, &[Color::Red, Color::Blue]);
        h.fsm.start();
        h.advance_to(SimoneState::SleepWhilePlayback);

        assert_eq!(
            h.fsm.destroy(),
            Some(SimoneOutput::SessionEnded {
                result: SessionResult::Aborted,
                score: 0,
            })
        );
        assert_eq!(h.fsm.get_state(), SimoneState::Idle);
        assert!(h.fsm.sequence().is_empty());
        assert!(!h.fsm.is_active());

        assert_eq!(h.fsm.destroy(), None);
        assert_eq!(h.fsm.get_state(), SimoneState::Idle);
    }

    #[test]
    fn test_start_ignored_while_active() {
        let mut h = scripted(Level::Easy, &[Color::Red]);
        h.fsm.start();
        h.advance_to(SimoneState::WaitKey);
        h.fsm.start();

        h.answer('2');
        assert_eq!(h.fsm.get_state(), SimoneState::Idle);

        let mut outputs = Vec::new();
        h.step(&mut outputs);
        assert_eq!(h.fsm.get_state(), SimoneState::SleepWhileIdle);
        assert!(outputs.is_empty());
    }

    #[test]
    fn test_intensity_fades_with_length() {
        let long = [Color::White; SEQUENCE_LENGTH];
        let mut h = scripted(Level::Hard, &long);
        h.fsm.start();

        let outputs = h.advance_to(SimoneState::WaitKey);
        for (_, output) in outputs.iter() {
            if let SimoneOutput::Pulse(pulse) = output {
                assert_eq!(pulse.intensity, Level::Hard.config().min_intensity);
                assert_eq!(pulse.rgb, Color::White.rgb().with_intensity(pulse.intensity));
            }
        }
    }

    #[test]
    fn test_pulses_come_from_playback() {
        let mut h = scripted(Level::Hard, &[Color::Red, Color::Green, Color::Blue]);
        h.fsm.start();
        h.advance_to(SimoneState::AddColor);

        let mut pulses = 0;
        while h.fsm.get_state() != SimoneState::WaitKey {
            let before = h.fsm.get_state();
            let mut outputs = Vec::new();
            h.step(&mut outputs);
            match before {
                SimoneState::Playback => {}
                SimoneState::AddColor => assert_eq!(h.fsm.get_state(), SimoneState::Playback),
                _ => assert!(outputs.is_empty(), "{:?} emitted {:?}", before, outputs),
            }
            if !outputs.is_empty() {
                assert_eq!(before, SimoneState::Playback);
                pulses += 1;
            }
        }
        assert_eq!(pulses, 3);
    }

    #[test]
    fn test_coarse_ticks_never_fire_early() {
        for tick in [5u32, 10, 25] {
            let mut h = scripted(Level::Easy, &[Color::Red, Color::Blue, Color::White])
                .with_tick(tick);
            let cfg = Level::Easy.config();
            h.fsm.start();

            // Pulses lag their due time by less than two ticks, with no drift
            let outputs = h.advance_to(SimoneState::WaitKey);
            let start = h.fsm.get_inner_fsm().playback_started_ms;
            let mut count = 0u32;
            for (at, output) in outputs.iter() {
                if let SimoneOutput::Pulse(pulse) = output {
                    let due = start + pulse.index as u32 * cfg.period_ms();
                    assert!(*at > due, "tick {}", tick);
                    assert!(*at < due + 2 * tick, "tick {}", tick);
                    count += 1;
                }
            }
            assert_eq!(count, 3);
            let last_due = start + 2 * cfg.period_ms();
            assert!(h.fsm.get_inner_fsm().wait_started_ms >= last_due + cfg.on_time_ms);

            // Feedback is held for at least the level's hold time
            let outputs = h.answer('1');
            assert_eq!(outputs.len(), 1);
            let (pressed_at, _) = outputs[0];
            assert_eq!(h.fsm.get_state(), SimoneState::WaitKey);
            let verified_at = h.fsm.get_inner_fsm().wait_started_ms;
            assert!(verified_at - pressed_at >= cfg.feedback_ms);
            assert!(verified_at - pressed_at < cfg.feedback_ms + tick);

            // Input deadline is never cut short
            let waiting_since = h.fsm.get_inner_fsm().wait_started_ms;
            let outputs = h.advance_to(SimoneState::Idle);
            let (ended_at, output) = outputs[0];
            assert_eq!(
                output,
                SimoneOutput::SessionEnded {
                    result: SessionResult::InputTimeout,
                    score: 0,
                }
            );
            assert!(ended_at >= waiting_since + cfg.wait_input_ms);
            assert!(ended_at < waiting_since + cfg.wait_input_ms + 2 * tick);
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(48))]

            #[test]
            fn playback_follows_level_timing(
                level in 0u8..3,
                len in 1usize..=6,
                seed in any::<u64>(),
            ) {
                let level = Level::try_from(level).unwrap();
                let cfg = level.config();
                let mut draw = RandomColors::new(SmallRng::seed_from_u64(seed));
                let mut preset: Vec<Color, SEQUENCE_LENGTH> = Vec::new();
                for _ in 0..len {
                    preset.push(draw.next_color()).unwrap();
                }

                let mut h = scripted(level, &preset);
                h.fsm.start();
                let outputs = h.advance_to(SimoneState::WaitKey);

                let mut last: Option<u32> = None;
                let mut count = 0;
                for (at, output) in outputs.iter() {
                    if let SimoneOutput::Pulse(pulse) = output {
                        prop_assert_eq!(pulse.index as usize, count);
                        prop_assert_eq!(pulse.color, preset[count]);
                        prop_assert_eq!(pulse.on_ms, cfg.on_time_ms);
                        prop_assert_eq!(pulse.intensity, cfg.intensity_for_round(len));
                        if let Some(prev) = last {
                            prop_assert_eq!(at - prev - cfg.on_time_ms, SIMONE_TIME_OFF_BETWEEN_COLORS_MS);
                        }
                        last = Some(*at);
                        count += 1;
                    }
                }
                prop_assert_eq!(count, len);
                prop_assert!(h.now > last.unwrap() + cfg.on_time_ms);
            }
        }
    }
}
