//! Configuration types
//!
//! Fixed game constants, the per-level configuration table, keyboard
//! layouts, the RGB palette and the `simone.toml` parser.

pub mod layout;
pub mod palette;
pub mod toml;
pub mod types;

pub use layout::*;
pub use palette::*;
pub use toml::{parse_config, ParseError, SimoneConfig};
pub use types::*;
