//! Live seat feed over WebSocket.

use axum::extract::ws::{CloseFrame, Message, WebSocket, close_code};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{debug, error, info, warn};

use boxoffice_core::error::{AppError, ErrorKind};
use boxoffice_core::types::id::EventId;
use boxoffice_realtime::OutboundMessage;

use crate::error::ApiError;
use crate::extractors::parse_id;
use crate::state::AppState;

/// GET /ws/events/{event_id}
pub async fn ws_upgrade(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let event_id: EventId = parse_id(&event_id)?;
    Ok(ws.on_upgrade(move |socket| handle_feed(state, event_id, socket)))
}

/// Streams the snapshot and seat updates until either side goes away.
async fn handle_feed(state: AppState, event_id: EventId, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let subscription = match state.feed.subscribe(event_id).await {
        Ok(sub) => sub,
        Err(e) => {
            let frame = close_frame(&e);
            if let Err(send_err) = ws_tx.send(Message::Close(Some(frame))).await {
                debug!(%event_id, error = %send_err, "Close frame not delivered");
            }
            return;
        }
    };

    let observer_id = subscription.observer_id;
    let mut outbound = subscription.receiver;
    info!(%event_id, %observer_id, "WebSocket feed opened");

    loop {
        tokio::select! {
            frame = outbound.recv() => {
                let Some(msg) = frame else { break };
                let Some(text) = encode(event_id, &msg) else { continue };
                if ws_tx.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            inbound = ws_rx.next() => match inbound {
                Some(Ok(Message::Text(_))) => {
                    let Some(pong) = encode(event_id, &OutboundMessage::Pong) else { continue };
                    if ws_tx.send(Message::Text(pong.into())).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(%event_id, %observer_id, error = %e, "WebSocket error");
                    break;
                }
            },
        }
    }

    state.feed.unsubscribe(event_id, observer_id);
    info!(%event_id, %observer_id, "WebSocket feed closed");
}

/// JSON text for a feed frame. Frames that fail to encode are logged and skipped.
fn encode(event_id: EventId, msg: &OutboundMessage) -> Option<String> {
    match msg.to_json() {
        Ok(text) => Some(text),
        Err(e) => {
            error!(%event_id, error = %e, "Dropping feed frame that failed to encode");
            None
        }
    }
}

fn close_frame(error: &AppError) -> CloseFrame {
    let code = match error.kind {
        ErrorKind::NotFound => close_code::POLICY,
        _ => close_code::ERROR,
    };
    CloseFrame {
        code,
        reason: error.message.clone().into(),
    }
}
