// src/handlers/progress.rs
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Extension,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use crate::AppState;

pub fn progress_routes() -> Router {
    Router::new().route("/ws", get(websocket_handler))
}

async fn websocket_handler(
    ws: WebSocketUpgrade,
    Extension(state): Extension<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| forward_progress(socket, state))
}

/// Pushes every progress event to the page until either side goes away
async fn forward_progress(stream: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = stream.split();
    let mut progress_rx = state.orchestrator.subscribe_progress();
    tracing::info!("📡 Progress subscriber connected");

    loop {
        tokio::select! {
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(_)) => {}
                }
            }
            event = progress_rx.recv() => {
                let event = match event {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Progress subscriber lagged, skipped {} events", skipped);
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };

                if let Ok(json_str) = serde_json::to_string(&event) {
                    if sender.send(Message::Text(json_str)).await.is_err() {
                        tracing::debug!("Progress subscriber went away");
                        break;
                    }
                }
            }
        }
    }

    tracing::info!("🔌 Progress subscriber disconnected");
}
