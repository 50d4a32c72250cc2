//! Public handle for the terminal host connection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gritty_common::{ClientEvent, GrittyError, Result};
use tokio::sync::mpsc;

use super::connection::connection_loop;
use super::types::{SocketCommand, SocketConfig, SocketEvent};
use crate::capability::Emit;

/// Handle for the connection to the terminal host.
///
/// All methods are non-blocking and send commands to the background
/// connection task. Events emitted while disconnected are dropped.
pub struct SocketClient {
    command_tx: mpsc::UnboundedSender<SocketCommand>,
    connected: Arc<AtomicBool>,
}

impl SocketClient {
    /// Create a new client and start the background connection.
    /// Returns `(client, event_receiver)`.
    pub fn connect(config: SocketConfig) -> (Self, mpsc::Receiver<SocketEvent>) {
        let (event_tx, event_rx) = mpsc::channel(256);
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let connected = Arc::new(AtomicBool::new(false));

        let client = Self {
            command_tx,
            connected: Arc::clone(&connected),
        };

        tokio::spawn(connection_loop(config, connected, event_tx, command_rx));

        (client, event_rx)
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Close the connection and stop reconnecting.
    pub fn close(&self) {
        let _ = self.command_tx.send(SocketCommand::Close);
    }
}

impl Emit for SocketClient {
    fn emit(&mut self, event: ClientEvent) -> Result<()> {
        self.command_tx
            .send(SocketCommand::Emit(event))
            .map_err(|_| GrittyError::Socket("connection task has stopped".into()))
    }
}
