//! WebSocket push of change events.
//!
//! Clients connect to `/api/ws` and receive every change event as a JSON
//! text frame. The store's broadcaster is the single source; a client
//! that falls behind lags and misses events rather than slowing the
//! mutation path down.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::state::AppState;

/// GET /api/ws - upgrade to a WebSocket event stream
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Runs for the lifetime of one WebSocket connection: subscribe to the
/// change stream and forward every event to the client.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    info!("websocket connected");

    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.store.subscribe();

    // Drain incoming frames so close and ping are honored; payloads are
    // ignored, this endpoint only pushes.
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    debug!("client sent close frame");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "websocket receive error");
                    break;
                }
            }
        }
    });

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(event) => {
                        let json = match serde_json::to_string(&event) {
                            Ok(json) => json,
                            Err(e) => {
                                error!(error = %e, "failed to serialize change event");
                                continue;
                            }
                        };
                        if sender.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "websocket client lagged, events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = &mut recv_task => break,
        }
    }

    info!("websocket disconnected");
}
