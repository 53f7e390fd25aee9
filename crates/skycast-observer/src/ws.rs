//! `WebSocket` handler for the live weather stream.
//!
//! Clients connect to `GET /ws` and receive one JSON-encoded
//! `WeatherBroadcast` text frame per scheduler tick. Connecting attaches a
//! subscriber (starting the scheduler if it is idle); disconnecting
//! detaches it. Client text and binary frames are ignored.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tracing::debug;

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming broadcasts.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_weather(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Handle the `WebSocket` lifecycle: attach, forward frames until either
/// side goes away, then detach.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let mut subscription = state.scheduler.attach().await;
    let id = subscription.id;
    debug!(subscriber = %id, "WebSocket client connected");

    loop {
        tokio::select! {
            // Forward a broadcast frame from the scheduler.
            frame = subscription.frames.recv() => {
                let Some(frame) = frame else {
                    debug!(subscriber = %id, "Subscriber queue closed");
                    break;
                };
                let msg = Message::Text(frame.to_string().into());
                if socket.send(msg).await.is_err() {
                    debug!(subscriber = %id, "WebSocket client disconnected (send failed)");
                    break;
                }
            }
            // Watch the client side for close, ping, or errors.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(subscriber = %id, "WebSocket client disconnected");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!(subscriber = %id, "WebSocket client disconnected (pong failed)");
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        debug!(subscriber = %id, error = %e, "WebSocket error");
                        break;
                    }
                    _ => {
                        // Client text and binary frames are ignored.
                    }
                }
            }
        }
    }

    state.scheduler.detach(id).await;
}
