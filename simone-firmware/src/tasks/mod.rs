//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod button;
pub mod console;
pub mod display;
pub mod tick;

pub use button::button_task;
pub use console::{console_task, BoardConsole, BoardMatrix};
pub use display::{display_task, ChannelDisplay};
pub use tick::tick_task;
