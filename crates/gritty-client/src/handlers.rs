//! Event handlers between the terminal widget and the socket.
//!
//! Each handler forwards one event and keeps no state of its own. Failures
//! of the widget or the socket are returned to the caller untouched.

use gritty_common::{ClientEvent, ConnectOptions, Geometry, Result};
use tracing::debug;

use crate::capability::{Emit, Fit, TermWrite};
use crate::handshake::Handshake;

/// Line written to the widget when the connection drops.
pub const DISCONNECT_MESSAGE: &str = "terminal disconnected...";

/// The socket connected: light up the cursor, send the handshake if this
/// connection has not had one yet, then report the current geometry.
pub fn on_connect<B, S>(
    blink: &mut B,
    socket: &mut S,
    handshake: &mut Handshake,
    options: &ConnectOptions,
) -> Result<()>
where
    B: FnMut(bool) + ?Sized,
    S: Emit + ?Sized,
{
    blink(true);

    if handshake.claim() {
        debug!(geometry = %options.geometry, "Sending terminal handshake");
        socket.emit(ClientEvent::Terminal(options.clone()))?;
    }

    socket.emit(ClientEvent::Resize(options.geometry))
}

/// The socket disconnected.
pub fn on_disconnect<B, W>(blink: &mut B, widget: &mut W) -> Result<()>
where
    B: FnMut(bool) + ?Sized,
    W: TermWrite + ?Sized,
{
    blink(false);
    widget.writeln(DISCONNECT_MESSAGE)
}

/// Terminal output arrived from the socket.
pub fn on_data<W: TermWrite + ?Sized>(widget: &mut W, data: &str) -> Result<()> {
    widget.write(data)
}

/// The widget's geometry changed.
pub fn on_term_resize<S: Emit + ?Sized>(socket: &mut S, size: Geometry) -> Result<()> {
    socket.emit(ClientEvent::Resize(size))
}

/// The user typed or pasted into the widget.
pub fn on_term_data<S: Emit + ?Sized>(socket: &mut S, data: &str) -> Result<()> {
    socket.emit(ClientEvent::Data(data.to_string()))
}

/// The host window was resized. Only refits; a resulting geometry change
/// comes back as the widget's own resize event.
pub fn on_window_resize<W: Fit + ?Sized>(widget: &mut W) -> Result<()> {
    widget.fit()
}
