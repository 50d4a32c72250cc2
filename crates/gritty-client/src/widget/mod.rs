//! Terminal widget backed by the host terminal through `crossterm`.
//!
//! The host terminal does the rendering; the widget owns raw mode, theme
//! colours, tab stops and geometry, and turns host input into widget events.

mod input;
mod keys;
mod options;
mod terminal;

pub use input::spawn_input_reader;
pub use keys::encode_key;
pub use options::{Theme, WidgetOptions, GRITTY_THEME};
pub use terminal::{set_cursor_blink, TerminalWidget};
