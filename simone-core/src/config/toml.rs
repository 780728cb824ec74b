//! Minimal parser for `simone.toml`
//!
//! Handles only the subset the console needs:
//! - `[keyboard]` and `[game]` section headers
//! - `key = value` pairs with integer or string values
//! - Comments (`# ...`), including trailing ones
//!
//! Anything else is rejected. Values are checked the same way
//! [`ConsoleConfig::validate`] checks them.

use super::types::{ConfigError, ConsoleConfig, Level};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Line is not `key = value`
    InvalidLine,
    /// Key not recognized in its section
    UnknownKey,
    /// Value has the wrong type
    InvalidValue,
    /// Values parsed but do not form a valid configuration
    Config(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(e: ConfigError) -> Self {
        ParseError::Config(e)
    }
}

/// Settings read from `simone.toml`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SimoneConfig {
    pub console: ConsoleConfig,
    /// Fixed color seed; `None` seeds from the clock
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Keyboard,
    Game,
}

/// Parse configuration text, starting from the defaults
pub fn parse_config(input: &str) -> Result<SimoneConfig, ParseError> {
    let mut config = SimoneConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header.strip_suffix(']').ok_or(ParseError::InvalidSection)?;
            section = match name.trim() {
                "keyboard" => Section::Keyboard,
                "game" => Section::Game,
                _ => return Err(ParseError::InvalidSection),
            };
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        match (section, key) {
            (Section::Keyboard, "debounce_ms") => config.console.debounce_ms = parse_int(value)?,
            (Section::Keyboard, "row_timeout_ms") => {
                config.console.row_timeout_ms = parse_int(value)?
            }
            (Section::Game, "level") => {
                config.console.level = Level::from_name(parse_string(value)?)?
            }
            (Section::Game, "seed") => {
                let seed: u64 = parse_int(value)?;
                config.seed = (seed != 0).then_some(seed);
            }
            _ => return Err(ParseError::UnknownKey),
        }
    }

    config.console.validate()?;
    Ok(config)
}

/// Drop a trailing comment unless the `#` sits inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn parse_string(value: &str) -> Result<&str, ParseError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue)
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}
