//! WebSocket client for the terminal host.
//!
//! A background task owns the connection, reconnects with exponential
//! backoff, and reports transport events over a channel. The public handle
//! only queues outgoing events, so emitting never blocks the bridge.

mod client;
mod connection;
mod types;

pub use client::SocketClient;
pub use types::{SocketConfig, SocketEvent};
