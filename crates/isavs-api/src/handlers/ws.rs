//! Dashboard WebSocket upgrade and per-connection session tasks.
//!
//! Each connection runs two flows: this task reads client frames, and a
//! spawned writer drains the connection's outbound queue into the socket.
//! Either side closing cancels the connection's token, which stops the
//! other.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code};
use axum::response::Response;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use isavs_realtime::connection::{ConnectionId, Registration};

use crate::state::AppState;

/// Result of waiting for the next client frame.
#[derive(Debug)]
enum ReadOutcome {
    /// A text frame.
    Message(Utf8Bytes),
    /// The client closed the connection or the stream ended.
    Closed,
    /// The transport failed.
    Error(axum::Error),
    /// Nothing arrived within the configured idle timeout.
    IdleTimeout,
    /// The server closed the connection (broadcast failure or shutdown).
    Cancelled,
}

/// GET /ws/dashboard — WebSocket upgrade
pub async fn ws_dashboard(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_dashboard_socket(state, socket))
}

/// Handles an established dashboard connection until it closes.
async fn handle_dashboard_socket(state: AppState, mut socket: WebSocket) {
    let realtime = Arc::clone(&state.realtime);

    let Registration { handle, outbound } = match realtime.registry.connect() {
        Ok(registration) => registration,
        Err(e) => {
            warn!(error = %e, "Rejecting dashboard connection");
            let _ = socket.send(Message::Close(Some(going_away()))).await;
            return;
        }
    };

    let conn_id = handle.id;
    let send_timeout = realtime.config().send_timeout();
    let idle_timeout = realtime.config().idle_timeout();

    let (ws_tx, mut ws_rx) = socket.split();
    let writer = tokio::spawn(write_outbound(
        conn_id,
        ws_tx,
        outbound,
        handle.close_token(),
        send_timeout,
    ));

    loop {
        let outcome = tokio::select! {
            _ = handle.closed() => ReadOutcome::Cancelled,
            outcome = read_next(&mut ws_rx, idle_timeout) => outcome,
        };

        match outcome {
            ReadOutcome::Message(text) => {
                realtime.registry.handle_inbound(&conn_id, text.as_str());
            }
            ReadOutcome::Closed => {
                info!(conn_id = %conn_id, "Dashboard client disconnected");
                break;
            }
            ReadOutcome::Error(e) => {
                error!(conn_id = %conn_id, error = %e, "Dashboard socket error");
                break;
            }
            ReadOutcome::IdleTimeout => {
                info!(conn_id = %conn_id, "Closing idle dashboard connection");
                break;
            }
            ReadOutcome::Cancelled => {
                debug!(conn_id = %conn_id, "Dashboard connection closed by server");
                break;
            }
        }
    }

    realtime.registry.disconnect(&conn_id);

    if let Err(e) = writer.await {
        warn!(conn_id = %conn_id, error = %e, "Dashboard writer task failed");
    }
}

/// Waits for the next text frame, skipping binary and control frames.
async fn read_next(
    ws_rx: &mut SplitStream<WebSocket>,
    idle_timeout: Option<Duration>,
) -> ReadOutcome {
    loop {
        let next = match idle_timeout {
            Some(limit) => match tokio::time::timeout(limit, ws_rx.next()).await {
                Ok(next) => next,
                Err(_) => return ReadOutcome::IdleTimeout,
            },
            None => ws_rx.next().await,
        };

        match next {
            Some(Ok(Message::Text(text))) => return ReadOutcome::Message(text),
            Some(Ok(Message::Close(_))) | None => return ReadOutcome::Closed,
            Some(Ok(_)) => continue,
            Some(Err(e)) => return ReadOutcome::Error(e),
        }
    }
}

/// Forwards queued frames to the socket until the connection closes.
async fn write_outbound(
    conn_id: ConnectionId,
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut outbound: mpsc::Receiver<Arc<str>>,
    closing: CancellationToken,
    send_timeout: Duration,
) {
    loop {
        tokio::select! {
            biased;

            _ = closing.cancelled() => {
                let close = Message::Close(Some(going_away()));
                let _ = tokio::time::timeout(send_timeout, ws_tx.send(close)).await;
                break;
            }
            next = outbound.recv() => {
                let Some(payload) = next else { break };
                let frame = Message::Text(Utf8Bytes::from(&*payload));

                match tokio::time::timeout(send_timeout, ws_tx.send(frame)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        warn!(conn_id = %conn_id, error = %e, "Dashboard socket write failed");
                        closing.cancel();
                        break;
                    }
                    Err(_) => {
                        warn!(
                            conn_id = %conn_id,
                            timeout_ms = send_timeout.as_millis() as u64,
                            "Dashboard socket write timed out"
                        );
                        closing.cancel();
                        break;
                    }
                }
            }
        }
    }

    debug!(conn_id = %conn_id, "Dashboard writer stopped");
}

fn going_away() -> CloseFrame {
    CloseFrame {
        code: close_code::AWAY,
        reason: Utf8Bytes::from("server closing connection"),
    }
}
