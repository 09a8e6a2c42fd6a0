//! Session gateway — one WebSocket connection per viewer or controller.
//!
//! On connect the session subscribes to the event bus, then asks the hub
//! for a snapshot and sends it as `initial_states`. From then on it forwards
//! `control_device` frames to the hub and `state_changed` events to the
//! client. Events already reflected in the snapshot (sequence not newer
//! than the snapshot's) are skipped, so the client never steps backwards.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use homesync_domain::error::HubError;
use homesync_domain::id::SessionId;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;

/// `GET /ws` — upgrade to a WebSocket session.
pub async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| run_session(state, socket, SessionId::new()))
}

async fn run_session(state: AppState, mut socket: WebSocket, session: SessionId) {
    tracing::info!(%session, "session connected");

    // Subscribe before taking the snapshot so no change can fall in between.
    let events = state.event_bus.subscribe();
    let snapshot = match state.hub.snapshot().await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            tracing::warn!(%session, %err, "closing session, no snapshot available");
            return;
        }
    };

    if send(&mut socket, &ServerMessage::initial_states(&snapshot.states))
        .await
        .is_err()
    {
        tracing::info!(%session, "session disconnected before initial state");
        return;
    }

    let mut events = BroadcastStream::new(events);
    let mut last_sequence = snapshot.sequence;

    loop {
        tokio::select! {
            inbound = socket.recv() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    if let Err(err) = forward_command(&state, session, text.as_str()).await {
                        tracing::warn!(%session, %err, "closing session");
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    tracing::debug!(%session, %err, "websocket receive failed");
                    break;
                }
            },
            event = events.next() => match event {
                Some(Ok(event)) => {
                    if event.sequence > last_sequence {
                        last_sequence = event.sequence;
                        if send(&mut socket, &ServerMessage::from(&event)).await.is_err() {
                            break;
                        }
                    }
                }
                Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                    tracing::warn!(
                        %session,
                        skipped,
                        "session lagged, some state changes were dropped"
                    );
                }
                None => break,
            },
        }
    }

    tracing::info!(%session, "session disconnected");
}

/// Decode one text frame and hand the command to the hub.
///
/// Malformed frames are logged and ignored; only a stopped hub is an error.
async fn forward_command(state: &AppState, session: SessionId, text: &str) -> Result<(), HubError> {
    match ClientMessage::parse(text) {
        Ok(ClientMessage::ControlDevice(request)) => {
            tracing::debug!(
                %session,
                device = %request.device,
                command = %request.command,
                "command received"
            );
            state.hub.submit(request).await
        }
        Err(err) => {
            tracing::warn!(%session, %err, "ignoring malformed message");
            Ok(())
        }
    }
}

async fn send(socket: &mut WebSocket, message: &ServerMessage) -> Result<(), axum::Error> {
    match message.to_text() {
        Ok(text) => socket.send(Message::Text(text.into())).await,
        Err(err) => {
            tracing::warn!(%err, "failed to serialize message");
            Ok(())
        }
    }
}
