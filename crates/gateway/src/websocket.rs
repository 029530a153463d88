//! Per-group realtime channel over WebSocket.
//!
//! Each connection gets a session id and a bounded outbound queue; the
//! room registry fans events into that queue and the send task drains it
//! onto the socket. A connection that falls behind is evicted by the
//! registry, which closes the queue and ends the send task.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::debug;

use autosplit_rooms::{ServerEvent, SessionId};

use crate::state::AppState;

/// Client events received over the socket
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Enter a group's room under a display identity.
    Join {
        group_id: String,
        member_name: String,
    },
    /// Broadcast a chat message to the joined room.
    SendMessage { text: String },
    /// Leave the current room without closing the connection.
    Leave,
    /// Heartbeat.
    Ping,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let session = SessionId::new();
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(state.realtime.session_queue_capacity);

    debug!(session = %session, "websocket connected");

    // Drain the session's outbound queue onto the socket. Ends when the
    // registry drops the session's sender or the client goes away.
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let Ok(text) = serde_json::to_string(&event) else {
                continue;
            };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    let recv_state = state.clone();
    let event_tx = tx.clone();
    let receive_task = tokio::spawn(async move {
        while let Some(Ok(message)) = stream.next().await {
            match message {
                Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => {
                        handle_client_event(event, &recv_state, session, &event_tx).await;
                    }
                    Err(err) => {
                        let _ = event_tx.try_send(ServerEvent::Error {
                            code: "BAD_EVENT".to_string(),
                            message: err.to_string(),
                        });
                    }
                },
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = send_task => {},
        _ = receive_task => {},
    }

    // Any in-flight outbound events for this session are discarded with
    // the queue; other sessions only ever observe a completed leave.
    state.rooms.disconnect(session).await;
    debug!(session = %session, "websocket disconnected");
}

async fn handle_client_event(
    event: ClientEvent,
    state: &AppState,
    session: SessionId,
    tx: &mpsc::Sender<ServerEvent>,
) {
    match event {
        ClientEvent::Join {
            group_id,
            member_name,
        } => {
            state
                .rooms
                .join(session, &group_id, &member_name, tx.clone())
                .await;
        }
        ClientEvent::SendMessage { text } => {
            if let Err(err) = state.rooms.send(session, &text).await {
                let _ = tx.try_send(ServerEvent::Error {
                    code: "NOT_JOINED".to_string(),
                    message: err.to_string(),
                });
            }
        }
        ClientEvent::Leave => {
            state.rooms.disconnect(session).await;
        }
        ClientEvent::Ping => {
            let _ = tx.try_send(ServerEvent::Pong);
        }
    }
}
