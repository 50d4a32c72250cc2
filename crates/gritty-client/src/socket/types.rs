//! Configuration and event/command enums for the socket client.

use std::time::Duration;

use gritty_common::ClientEvent;
use gritty_config::ServerConfig;

/// Configuration for connecting to a terminal host.
#[derive(Debug, Clone)]
pub struct SocketConfig {
    /// WebSocket URL, e.g. `ws://127.0.0.1:1337/gritty`.
    pub url: String,
    /// Give up on a single connection attempt after this many seconds.
    pub connect_timeout_secs: u64,
    /// Reconnect base delay in seconds.
    pub reconnect_delay_secs: u64,
    /// Maximum reconnect delay in seconds.
    pub max_reconnect_delay_secs: u64,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for SocketConfig {
    fn from(server: &ServerConfig) -> Self {
        Self {
            url: server.url.clone(),
            connect_timeout_secs: server.connect_timeout_secs,
            reconnect_delay_secs: server.reconnect_delay_secs,
            max_reconnect_delay_secs: server.max_reconnect_delay_secs,
        }
    }
}

impl SocketConfig {
    pub(crate) fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Delay that follows `current` in the backoff sequence.
    pub(crate) fn next_delay(&self, current: u64) -> u64 {
        current.saturating_mul(2).min(self.max_reconnect_delay_secs)
    }
}

/// Events emitted by the socket client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    /// WebSocket connection established.
    Connected,
    /// WebSocket connection lost.
    Disconnected,
    /// Terminal output from the host.
    Data(String),
    /// A connection attempt failed.
    Error(String),
}

/// Commands sent to the connection task by the handle.
#[derive(Debug)]
pub(crate) enum SocketCommand {
    Emit(ClientEvent),
    Close,
}
