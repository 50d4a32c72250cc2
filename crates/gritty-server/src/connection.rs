//! Per-connection handler: wait for the terminal handshake, spawn the shell,
//! then relay until either side goes away.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use gritty_common::{ClientEvent, ConnectOptions, ConnectionId, ServerEvent};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use crate::decoder::Utf8Decoder;
use crate::pty::PtySession;

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;
type WsStream = SplitStream<WebSocketStream<TcpStream>>;

/// Settings shared by every connection.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Program to run instead of the user's login shell.
    pub command: Option<String>,
    /// How long a client may take to send its `terminal` event.
    pub handshake_timeout: Duration,
}

/// Handle a single WebSocket connection.
pub async fn handle_connection(
    ws: WebSocketStream<TcpStream>,
    addr: SocketAddr,
    options: &ServerOptions,
) {
    let id = ConnectionId::new();
    let (mut sink, mut stream) = ws.split();

    // 1. Wait for the handshake.
    let connect = match read_handshake(&mut stream, addr, options.handshake_timeout).await {
        Some(connect) => connect,
        None => {
            let _ = sink.send(Message::Close(None)).await;
            return;
        }
    };

    // 2. Spawn the shell.
    let (mut pty, mut output_rx) = match PtySession::spawn(options.command.as_deref(), &connect) {
        Ok(spawned) => spawned,
        Err(e) => {
            tracing::error!(peer = %addr, conn = %id, error = %e, "Failed to spawn shell");
            let _ = sink.send(Message::Close(None)).await;
            return;
        }
    };

    tracing::info!(
        peer = %addr,
        conn = %id,
        geometry = %connect.geometry,
        env = connect.env.as_ref().map_or(0, |env| env.len()),
        "Shell started"
    );

    // 3. Relay.
    let mut decoder = Utf8Decoder::new();
    loop {
        tokio::select! {
            chunk = output_rx.recv() => match chunk {
                Some(bytes) => {
                    let text = decoder.decode(&bytes);
                    if !text.is_empty() && send_data(&mut sink, text).await.is_err() {
                        break;
                    }
                }
                None => {
                    let rest = decoder.finish();
                    if !rest.is_empty() {
                        let _ = send_data(&mut sink, rest).await;
                    }
                    tracing::info!(peer = %addr, conn = %id, "Shell exited");
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                }
            },

            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => handle_frame(&mut pty, text.as_str(), &id),
                Some(Ok(Message::Ping(data))) => {
                    let _ = sink.send(Message::Pong(data)).await;
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    tracing::debug!(peer = %addr, conn = %id, error = %e, "WS error");
                    break;
                }
                Some(Ok(_)) => {}
            },
        }
    }

    // 4. Cleanup.
    pty.shutdown();
    tracing::info!(peer = %addr, conn = %id, "Client disconnected");
}

/// Apply one client frame to the shell.
fn handle_frame(pty: &mut PtySession, text: &str, id: &ConnectionId) {
    match ClientEvent::from_frame(text) {
        Ok(ClientEvent::Data(data)) => {
            if let Err(e) = pty.write_input(data.as_bytes()) {
                tracing::warn!(conn = %id, error = %e, "PTY write failed");
            }
        }
        Ok(ClientEvent::Resize(geometry)) => {
            if geometry != pty.geometry() {
                tracing::debug!(conn = %id, geometry = %geometry, "Resizing PTY");
            }
            if let Err(e) = pty.resize(geometry) {
                tracing::warn!(conn = %id, error = %e, "PTY resize failed");
            }
        }
        Ok(ClientEvent::Terminal(_)) => {
            tracing::debug!(conn = %id, "Ignoring repeated terminal handshake");
        }
        Err(e) => {
            tracing::warn!(conn = %id, error = %e, "Ignoring invalid frame");
        }
    }
}

/// Wait for the `terminal` event. Anything else arriving first is skipped.
async fn read_handshake(
    stream: &mut WsStream,
    addr: SocketAddr,
    timeout: Duration,
) -> Option<ConnectOptions> {
    let wait = async {
        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => match ClientEvent::from_frame(text.as_str()) {
                    Ok(ClientEvent::Terminal(connect)) => return Some(connect),
                    Ok(other) => {
                        tracing::debug!(peer = %addr, event = other.name(), "Event before handshake");
                    }
                    Err(e) => {
                        tracing::warn!(peer = %addr, error = %e, "Invalid frame before handshake");
                    }
                },
                Some(Ok(Message::Close(_))) | None => {
                    tracing::debug!(peer = %addr, "Connection closed before handshake");
                    return None;
                }
                Some(Err(e)) => {
                    tracing::warn!(peer = %addr, error = %e, "WS error during handshake");
                    return None;
                }
                Some(Ok(_)) => {}
            }
        }
    };

    match tokio::time::timeout(timeout, wait).await {
        Ok(connect) => connect,
        Err(_) => {
            tracing::warn!(
                peer = %addr,
                timeout_ms = timeout.as_millis() as u64,
                "Handshake timeout"
            );
            None
        }
    }
}

/// Send terminal output as a `data` frame.
async fn send_data(
    sink: &mut WsSink,
    text: String,
) -> Result<(), tokio_tungstenite::tungstenite::Error> {
    let frame = match ServerEvent::Data(text).to_frame() {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to encode output");
            return Ok(());
        }
    };
    sink.send(Message::Text(frame.into())).await
}
