//! WebSocket push channel.
//!
//! Subscribers connect at `/ws` and receive every board event as a JSON
//! text frame of the form `{"event": "task:updated", "data": {...}}`. The
//! channel is push-only: incoming frames are drained and ignored so close
//! handshakes work, but nothing is requested over it. Delivery is
//! best-effort; a session that falls behind the hub's buffer loses the
//! oldest events and stays connected.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio::sync::broadcast::error::RecvError;

use ocb_core::Board;

/// `GET /ws` - upgrade to the broadcast channel.
pub async fn ws_handler(State(board): State<Arc<Board>>, upgrade: WebSocketUpgrade) -> Response {
    upgrade.on_upgrade(move |socket| handle_socket(socket, board))
}

async fn handle_socket(socket: WebSocket, board: Arc<Board>) {
    let mut events = board.events().subscribe();
    let (mut sender, mut receiver) = socket.split();
    info!("WebSocket client connected");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let message = match event.to_message() {
                        Ok(message) => message,
                        Err(e) => {
                            warn!("failed to serialize board event: {e}");
                            continue;
                        }
                    };
                    if sender.send(Message::Text(message.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(missed)) => {
                    warn!("WebSocket client lagged, dropped {missed} event(s)");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                // Push-only channel: client frames carry no requests
                Some(Ok(message)) => debug!("ignoring client frame: {message:?}"),
                Some(Err(_)) | None => break,
            },
        }
    }

    info!("WebSocket client disconnected");
}
