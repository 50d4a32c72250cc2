//! Background WebSocket connection loop with auto-reconnect.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use gritty_common::{ClientEvent, ServerEvent};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tracing::{debug, error, info, warn};

use super::types::{SocketCommand, SocketConfig, SocketEvent};

/// How a connected session ended.
#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    /// The connection dropped; try again.
    Lost,
    /// The client closed on purpose, or nobody is listening any more.
    Closed,
}

/// Background task managing the WebSocket connection with auto-reconnect.
pub(crate) async fn connection_loop(
    config: SocketConfig,
    connected: Arc<AtomicBool>,
    event_tx: mpsc::Sender<SocketEvent>,
    mut command_rx: mpsc::UnboundedReceiver<SocketCommand>,
) {
    let mut reconnect_delay = config.reconnect_delay_secs;

    loop {
        info!(url = %config.url, "Connecting to terminal host");

        match tokio::time::timeout(
            config.connect_timeout(),
            tokio_tungstenite::connect_async(config.url.as_str()),
        )
        .await
        {
            Ok(Ok((ws_stream, _))) => {
                reconnect_delay = config.reconnect_delay_secs;

                // Anything queued before the connection existed belongs to no
                // connection; the bridge sends its handshake after `Connected`.
                if drain_stale(&mut command_rx) {
                    return;
                }

                connected.store(true, Ordering::Release);
                if event_tx.send(SocketEvent::Connected).await.is_err() {
                    return;
                }

                let end = run_session(ws_stream, &event_tx, &mut command_rx).await;

                connected.store(false, Ordering::Release);
                let _ = event_tx.send(SocketEvent::Disconnected).await;
                if end == SessionEnd::Closed {
                    return;
                }
            }
            Ok(Err(e)) => {
                error!(error = %e, "Failed to connect to terminal host");
                if event_tx
                    .send(SocketEvent::Error(format!("Connection failed: {e}")))
                    .await
                    .is_err()
                {
                    return;
                }
            }
            Err(_elapsed) => {
                error!(
                    timeout = config.connect_timeout_secs,
                    "WebSocket connection timed out"
                );
                if event_tx
                    .send(SocketEvent::Error(format!(
                        "Connection timed out after {}s",
                        config.connect_timeout_secs
                    )))
                    .await
                    .is_err()
                {
                    return;
                }
            }
        }

        info!(
            delay = reconnect_delay,
            "Reconnecting in {} seconds", reconnect_delay
        );
        if wait_for_retry(Duration::from_secs(reconnect_delay), &mut command_rx).await {
            return;
        }
        reconnect_delay = config.next_delay(reconnect_delay);
    }
}

/// Discard queued commands. Returns `true` if the client asked to close.
fn drain_stale(command_rx: &mut mpsc::UnboundedReceiver<SocketCommand>) -> bool {
    loop {
        match command_rx.try_recv() {
            Ok(SocketCommand::Emit(event)) => {
                debug!(event = event.name(), "Dropping event queued while disconnected");
            }
            Ok(SocketCommand::Close) => return true,
            Err(mpsc::error::TryRecvError::Empty) => return false,
            Err(mpsc::error::TryRecvError::Disconnected) => return true,
        }
    }
}

/// Sleep out the backoff delay, dropping emits. Returns `true` if the
/// client closed in the meantime.
async fn wait_for_retry(
    delay: Duration,
    command_rx: &mut mpsc::UnboundedReceiver<SocketCommand>,
) -> bool {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return false,
            cmd = command_rx.recv() => match cmd {
                Some(SocketCommand::Emit(event)) => {
                    debug!(event = event.name(), "Dropping event while disconnected");
                }
                Some(SocketCommand::Close) | None => return true,
            }
        }
    }
}

/// Pump one established connection until it ends.
///
/// The host ignores everything before the `terminal` handshake, so events
/// emitted ahead of it on a fresh connection are dropped here.
async fn run_session<S>(
    ws: S,
    event_tx: &mpsc::Sender<SocketEvent>,
    command_rx: &mut mpsc::UnboundedReceiver<SocketCommand>,
) -> SessionEnd
where
    S: Stream<Item = Result<WsMessage, WsError>> + Sink<WsMessage, Error = WsError> + Unpin,
{
    let (mut sink, mut stream) = ws.split();
    let mut handshake_sent = false;

    loop {
        tokio::select! {
            cmd = command_rx.recv() => match cmd {
                Some(SocketCommand::Emit(event)) => {
                    if matches!(event, ClientEvent::Terminal(_)) {
                        handshake_sent = true;
                    } else if !handshake_sent {
                        debug!(event = event.name(), "Dropping event sent before handshake");
                        continue;
                    }
                    match event.to_frame() {
                        Ok(frame) => {
                            if let Err(e) = sink.send(WsMessage::Text(frame.into())).await {
                                warn!(error = %e, event = event.name(), "Failed to send event");
                                return SessionEnd::Lost;
                            }
                        }
                        Err(e) => warn!(error = %e, "Failed to encode event"),
                    }
                }
                Some(SocketCommand::Close) | None => {
                    let _ = sink.send(WsMessage::Close(None)).await;
                    return SessionEnd::Closed;
                }
            },

            frame = stream.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => match ServerEvent::from_frame(text.as_str()) {
                    Ok(ServerEvent::Data(data)) => {
                        if event_tx.send(SocketEvent::Data(data)).await.is_err() {
                            return SessionEnd::Closed;
                        }
                    }
                    Err(e) => debug!(error = %e, "Ignoring unrecognized frame"),
                },
                Some(Ok(WsMessage::Ping(data))) => {
                    let _ = sink.send(WsMessage::Pong(data)).await;
                }
                Some(Ok(WsMessage::Close(_))) | None => {
                    info!("Terminal host closed connection");
                    return SessionEnd::Lost;
                }
                Some(Err(e)) => {
                    warn!(error = %e, "WebSocket error");
                    return SessionEnd::Lost;
                }
                Some(Ok(_)) => {}
            },
        }
    }
}
