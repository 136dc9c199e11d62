//! Live expense updates over WebSocket.
//!
//! Browsers cannot set headers on an upgrade request, so the token may also
//! come as the `token` query parameter.

use api_types::ws::{ClientEvent, ServerEvent};
use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::HeaderMap,
    response::Response,
};
use engine::{ExpenseEvent, Identity};
use serde::Deserialize;
use tokio::sync::broadcast::{Receiver, error::RecvError};

use crate::{
    AuthError, ServerError,
    expenses::expense_list,
    server::{ServerState, bearer_token},
};

#[derive(Debug, Deserialize)]
pub struct WsParams {
    token: Option<String>,
}

pub async fn upgrade(
    ws: WebSocketUpgrade,
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(params): Query<WsParams>,
) -> Result<Response, ServerError> {
    let token = bearer_token(&headers)
        .or(params.token)
        .ok_or(AuthError::MissingToken)?;
    let identity = state.auth.verify(&token)?;

    // Subscribe before the upgrade completes so no update is missed.
    let events = state.hub.subscribe(&identity);
    tracing::debug!(owner = %identity, "websocket session opened");

    Ok(ws.on_upgrade(move |socket| session(state, identity, events, socket)))
}

async fn session(
    state: ServerState,
    identity: Identity,
    mut events: Receiver<ExpenseEvent>,
    mut socket: WebSocket,
) {
    loop {
        tokio::select! {
            incoming = socket.recv() => {
                let keep_open = match incoming {
                    Some(Ok(Message::Text(text))) => {
                        handle_client_frame(&state, &identity, text.as_str(), &mut socket).await
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        socket.send(Message::Pong(payload)).await.is_ok()
                    }
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => false,
                    Some(Ok(_)) => true,
                };
                if !keep_open {
                    break;
                }
            }
            event = events.recv() => {
                let keep_open = match event {
                    Ok(event) => {
                        send_event(&mut socket, &ServerEvent::ExpenseUpdate {
                            expenses: expense_list(&event.expenses).expenses,
                        })
                        .await
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(owner = %identity, skipped, "websocket session lagged");
                        send_snapshot(&state, &identity, &mut socket).await
                    }
                    Err(RecvError::Closed) => false,
                };
                if !keep_open {
                    break;
                }
            }
        }
    }

    tracing::debug!(owner = %identity, "websocket session closed");
}

async fn handle_client_frame(
    state: &ServerState,
    identity: &Identity,
    text: &str,
    socket: &mut WebSocket,
) -> bool {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::FetchExpenses) => send_snapshot(state, identity, socket).await,
        Err(_) => {
            send_event(
                socket,
                &ServerEvent::Error {
                    message: "unknown event".to_string(),
                },
            )
            .await
        }
    }
}

/// Push the current expense list. Returns false once the socket is gone.
async fn send_snapshot(state: &ServerState, identity: &Identity, socket: &mut WebSocket) -> bool {
    match state
        .engine
        .list_expenses(identity, identity.as_str())
        .await
    {
        Ok(expenses) => {
            send_event(
                socket,
                &ServerEvent::ExpenseUpdate {
                    expenses: expense_list(&expenses).expenses,
                },
            )
            .await
        }
        Err(err) => {
            tracing::error!(owner = %identity, "failed to load expenses: {err}");
            send_event(
                socket,
                &ServerEvent::Error {
                    message: "failed to load expenses".to_string(),
                },
            )
            .await
        }
    }
}

async fn send_event(socket: &mut WebSocket, event: &ServerEvent) -> bool {
    let Ok(payload) = serde_json::to_string(event) else {
        return true;
    };
    socket.send(Message::Text(payload.into())).await.is_ok()
}
