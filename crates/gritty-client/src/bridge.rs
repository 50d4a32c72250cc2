//! The terminal bridge: owns the widget and the socket and routes every
//! event between them through the handlers in [`crate::handlers`].

use std::collections::BTreeMap;
use std::ops::ControlFlow;

use gritty_common::{ConnectOptions, Geometry, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::capability::{Emit, Fit, TermWrite};
use crate::handlers;
use crate::handshake::Handshake;
use crate::socket::SocketEvent;

/// Events raised by the terminal widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermEvent {
    /// User input: keystrokes or a paste.
    Data(String),
    /// The widget's geometry changed after a fit.
    Resize(Geometry),
}

/// Events raised by the host window the widget lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    WindowResize,
    /// The user asked to detach.
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    Socket(SocketEvent),
    Term(TermEvent),
    Host(HostEvent),
}

/// Connection-liveness indicator, called with `true` on connect and `false`
/// on disconnect.
pub type BlinkFn = Box<dyn FnMut(bool) + Send>;

pub struct TerminalBridge<W, S> {
    widget: W,
    socket: S,
    blink: BlinkFn,
    env: BTreeMap<String, String>,
    handshake: Handshake,
}

impl<W, S> TerminalBridge<W, S>
where
    W: TermWrite + Fit,
    S: Emit,
{
    /// `env` is sent to the remote shell with each connection's handshake.
    pub fn new(
        widget: W,
        socket: S,
        blink: impl FnMut(bool) + Send + 'static,
        env: BTreeMap<String, String>,
    ) -> Self {
        Self {
            widget,
            socket,
            blink: Box::new(blink),
            env,
            handshake: Handshake::default(),
        }
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn socket(&self) -> &S {
        &self.socket
    }

    pub fn handshake(&self) -> Handshake {
        self.handshake
    }

    pub fn into_parts(self) -> (W, S) {
        (self.widget, self.socket)
    }

    /// Handshake payload for a connection made right now.
    fn connect_options(&self) -> ConnectOptions {
        ConnectOptions::new(self.widget.geometry()).with_env(self.env.clone())
    }

    /// Route one event. Returns `Break` when the bridge should stop.
    pub fn dispatch(&mut self, event: BridgeEvent) -> Result<ControlFlow<()>> {
        match event {
            BridgeEvent::Socket(SocketEvent::Connected) => {
                let options = self.connect_options();
                info!(geometry = %options.geometry, "Connected to terminal host");
                handlers::on_connect(
                    &mut self.blink,
                    &mut self.socket,
                    &mut self.handshake,
                    &options,
                )?;
            }
            BridgeEvent::Socket(SocketEvent::Disconnected) => {
                info!("Disconnected from terminal host");
                // The next connection talks to a fresh remote shell.
                self.handshake.reset();
                handlers::on_disconnect(&mut self.blink, &mut self.widget)?;
            }
            BridgeEvent::Socket(SocketEvent::Data(data)) => {
                handlers::on_data(&mut self.widget, &data)?;
            }
            BridgeEvent::Socket(SocketEvent::Error(message)) => {
                warn!(error = %message, "Socket error");
            }
            BridgeEvent::Term(TermEvent::Resize(size)) => {
                debug!(geometry = %size, "Terminal resized");
                handlers::on_term_resize(&mut self.socket, size)?;
            }
            BridgeEvent::Term(TermEvent::Data(data)) => {
                handlers::on_term_data(&mut self.socket, &data)?;
            }
            BridgeEvent::Host(HostEvent::WindowResize) => {
                handlers::on_window_resize(&mut self.widget)?;
            }
            BridgeEvent::Host(HostEvent::Quit) => {
                info!("Detach requested");
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Drive the bridge until the user detaches, every event source closes,
    /// or a handler fails.
    pub async fn run(
        &mut self,
        mut socket_rx: mpsc::Receiver<SocketEvent>,
        mut term_rx: mpsc::UnboundedReceiver<TermEvent>,
        mut host_rx: mpsc::UnboundedReceiver<HostEvent>,
    ) -> Result<()> {
        loop {
            let event = tokio::select! {
                Some(event) = socket_rx.recv() => BridgeEvent::Socket(event),
                Some(event) = term_rx.recv() => BridgeEvent::Term(event),
                Some(event) = host_rx.recv() => BridgeEvent::Host(event),
                else => {
                    debug!("All event sources closed");
                    return Ok(());
                }
            };

            if self.dispatch(event)?.is_break() {
                return Ok(());
            }
        }
    }
}
