//! Terminal client side of gritty: a bridge that relays events between a
//! terminal widget and a socket connection to a remote terminal host.

pub mod bridge;
pub mod capability;
pub mod handlers;
pub mod handshake;
pub mod socket;
pub mod widget;

pub use bridge::{BridgeEvent, HostEvent, TermEvent, TerminalBridge};
pub use capability::{Emit, Fit, TermWrite};
pub use handshake::Handshake;
pub use socket::{SocketClient, SocketConfig, SocketEvent};
pub use widget::{set_cursor_blink, spawn_input_reader, TerminalWidget, Theme, WidgetOptions};

#[cfg(test)]
pub(crate) mod testing;
