use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::game_loop::{GameBroadcast, GameCommand};
use crate::protocol::{ClientMsg, ServerMsg};

/// Shared app state passed to each WebSocket handler
#[derive(Clone)]
pub struct AppState {
    pub game_tx: mpsc::Sender<GameCommand>,
    pub broadcast_tx: broadcast::Sender<GameBroadcast>,
}

/// HTTP handler for WebSocket upgrade
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, app_state))
}

fn to_server_msg(broadcast: GameBroadcast) -> ServerMsg {
    match broadcast {
        GameBroadcast::Frame(msg) => ServerMsg::Frame(msg),
        GameBroadcast::Crossing(msg) => ServerMsg::Crossing(msg),
        GameBroadcast::Teleported(msg) => ServerMsg::Teleported(msg),
    }
}

/// Join the simulation and encode the welcome. Once the join has been sent, any
/// failure is followed by `Leave` so the loop's client count stays right.
async fn join(game_tx: &mpsc::Sender<GameCommand>) -> Option<String> {
    let (resp_tx, resp_rx) = oneshot::channel();
    if game_tx
        .send(GameCommand::Join { response: resp_tx })
        .await
        .is_err()
    {
        tracing::error!("Failed to send Join command");
        return None;
    }

    let welcome = match resp_rx.await {
        Ok(welcome) => welcome,
        Err(_) => {
            tracing::error!("Failed to receive welcome");
            let _ = game_tx.send(GameCommand::Leave).await;
            return None;
        }
    };

    match serde_json::to_string(&ServerMsg::Welcome(welcome)) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("Failed to encode welcome: {}", e);
            let _ = game_tx.send(GameCommand::Leave).await;
            None
        }
    }
}

async fn handle_socket(socket: WebSocket, app_state: AppState) {
    let (mut sink, mut stream) = socket.split();

    // Subscribe before joining so nothing broadcast after the welcome is missed
    let mut broadcast_rx = app_state.broadcast_tx.subscribe();

    let Some(welcome_json) = join(&app_state.game_tx).await else {
        return;
    };
    if sink.send(Message::Text(welcome_json.into())).await.is_err() {
        let _ = app_state.game_tx.send(GameCommand::Leave).await;
        return;
    }

    loop {
        tokio::select! {
            // Client -> Server
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientMsg>(&text) {
                            Ok(client_msg) => {
                                if app_state.game_tx.send(GameCommand::Input(client_msg)).await.is_err() {
                                    tracing::error!("Simulation loop is gone");
                                    break;
                                }
                            }
                            Err(e) => tracing::debug!("Ignoring malformed client message: {}", e),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {} // Ignore ping/pong/binary
                }
            }

            // Server -> Client (broadcast)
            result = broadcast_rx.recv() => {
                match result {
                    Ok(broadcast) => {
                        if let Ok(json) = serde_json::to_string(&to_server_msg(broadcast)) {
                            if sink.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("Client lagged by {} messages", n);
                        // Frames are snapshots, the next one supersedes the dropped ones
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    let _ = app_state.game_tx.send(GameCommand::Leave).await;
    tracing::info!("Client disconnected");
}
