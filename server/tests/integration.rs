//! Integration tests for the wormhole server.
//!
//! These tests start a real server instance and connect via WebSocket
//! to verify end-to-end behavior.

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::{connect_async, tungstenite::Message};

// Re-create minimal protocol types for testing, as a browser client would see them
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
#[allow(dead_code)]
enum ServerMsg {
    #[serde(rename = "welcome")]
    Welcome {
        #[serde(rename = "protocolVersion")]
        protocol_version: u32,
        config: serde_json::Value,
        frame: Frame,
    },
    #[serde(rename = "frame")]
    Frame(Frame),
    #[serde(rename = "crossing")]
    Crossing { position: [f64; 3], galaxy: u8 },
    #[serde(rename = "teleported")]
    Teleported {
        #[serde(rename = "targetIndex")]
        target_index: u32,
        galaxy: u8,
    },
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Frame {
    position: [f64; 3],
    orientation: [f64; 4],
    galaxy: u8,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ClientMsg {
    #[serde(rename = "key_down")]
    KeyDown { code: String },
    #[serde(rename = "key_up")]
    KeyUp { code: String },
    #[serde(rename = "teleport_next")]
    TeleportNext,
}

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Start a test server on a random available port and return the WebSocket URL.
async fn start_test_server() -> String {
    use wormhole_server::config::ServerConfig;
    use wormhole_server::game_loop::{run_simulation_loop, GameBroadcast, GameCommand};
    use wormhole_server::simulation::Simulation;
    use wormhole_server::ws::AppState;
    use wormhole_shared::config::SimulationConfig;

    // Find an available port
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener); // Release the port so the server can bind to it

    let config = ServerConfig {
        listen_addr: addr.to_string(),
        frame_rate_hz: 60,
        broadcast_rate_hz: 20,
    };
    let simulation = Simulation::new(SimulationConfig::default()).unwrap();

    let (game_tx, game_rx) = mpsc::channel::<GameCommand>(256);
    let (broadcast_tx, _) = broadcast::channel::<GameBroadcast>(64);

    let app_state = AppState {
        game_tx,
        broadcast_tx: broadcast_tx.clone(),
    };

    // Start simulation loop
    let loop_config = config.clone();
    tokio::spawn(async move {
        run_simulation_loop(game_rx, broadcast_tx, loop_config, simulation).await;
    });

    // Start HTTP/WebSocket server
    let app = axum::Router::new()
        .route("/ws", axum::routing::get(wormhole_server::ws::ws_handler))
        .with_state(app_state);

    tokio::spawn(async move {
        let listener = TcpListener::bind(&config.listen_addr).await.unwrap();
        axum::serve(listener, app).await.unwrap();
    });

    // Give server time to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    format!("ws://{}/ws", addr)
}

async fn connect(url: &str) -> WsStream {
    let (ws, _) = connect_async(url).await.expect("Failed to connect");
    ws
}

/// Read the next text message and parse as ServerMsg.
async fn recv_msg(ws: &mut WsStream) -> ServerMsg {
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => {
                return serde_json::from_str(&text).expect("Failed to parse server message");
            }
            Some(Ok(_)) => continue, // Skip ping/pong
            Some(Err(e)) => panic!("WebSocket error: {}", e),
            None => panic!("WebSocket closed unexpectedly"),
        }
    }
}

async fn recv_msg_timeout(ws: &mut WsStream, timeout: Duration) -> Option<ServerMsg> {
    tokio::time::timeout(timeout, recv_msg(ws)).await.ok()
}

async fn send(ws: &mut WsStream, msg: &ClientMsg) {
    let json = serde_json::to_string(msg).unwrap();
    ws.send(Message::Text(json.into())).await.unwrap();
}

/// Wait for the next frame broadcast, skipping other messages.
async fn next_frame(ws: &mut WsStream) -> Frame {
    for _ in 0..50 {
        if let Some(ServerMsg::Frame(frame)) =
            recv_msg_timeout(ws, Duration::from_millis(500)).await
        {
            return frame;
        }
    }
    panic!("No frame received");
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_connect_and_receive_welcome() {
    let url = start_test_server().await;
    let mut ws = connect(&url).await;

    match recv_msg(&mut ws).await {
        ServerMsg::Welcome {
            protocol_version,
            config,
            frame,
        } => {
            assert_eq!(protocol_version, 1);
            assert_eq!(frame.galaxy, 0);
            assert_eq!(frame.position, [0.0, 0.0, 0.0]);
            assert_eq!(config["wormhole"]["radius"], 0.8);
            assert_eq!(config["teleportTargets"].as_array().unwrap().len(), 4);
        }
        other => panic!("Expected Welcome, got {:?}", other),
    }
}

#[tokio::test]
async fn test_frames_are_streamed() {
    let url = start_test_server().await;
    let mut ws = connect(&url).await;
    let _welcome = recv_msg(&mut ws).await;

    let frame = next_frame(&mut ws).await;
    let q = frame.orientation;
    let norm = (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3]).sqrt();
    assert!((norm - 1.0).abs() < 1e-3, "orientation should be a unit quaternion");
}

#[tokio::test]
async fn test_teleport_next_switches_galaxy() {
    let url = start_test_server().await;
    let mut ws = connect(&url).await;
    let _welcome = recv_msg(&mut ws).await;

    send(&mut ws, &ClientMsg::TeleportNext).await;

    let mut teleported = None;
    for _ in 0..50 {
        if let Some(ServerMsg::Teleported {
            target_index,
            galaxy,
        }) = recv_msg_timeout(&mut ws, Duration::from_millis(500)).await
        {
            teleported = Some((target_index, galaxy));
            break;
        }
    }
    assert_eq!(teleported, Some((0, 1)));

    let frame = next_frame(&mut ws).await;
    assert_eq!(frame.galaxy, 1);
    assert_eq!(frame.position, [10.0, -307.0, 454.0]);
}

#[tokio::test]
async fn test_teleport_key_is_seen_by_every_client() {
    let url = start_test_server().await;
    let mut ws1 = connect(&url).await;
    let mut ws2 = connect(&url).await;
    let _ = recv_msg(&mut ws1).await;
    let _ = recv_msg(&mut ws2).await;

    send(
        &mut ws1,
        &ClientMsg::KeyDown {
            code: "KeyT".to_string(),
        },
    )
    .await;

    let mut seen = false;
    for _ in 0..50 {
        if let Some(ServerMsg::Teleported { galaxy, .. }) =
            recv_msg_timeout(&mut ws2, Duration::from_millis(500)).await
        {
            assert_eq!(galaxy, 1);
            seen = true;
            break;
        }
    }
    assert!(seen, "Second client should see the teleport");
}

#[tokio::test]
async fn test_forward_key_moves_player() {
    let url = start_test_server().await;
    let mut ws = connect(&url).await;
    let start = match recv_msg(&mut ws).await {
        ServerMsg::Welcome { frame, .. } => frame.position,
        other => panic!("Expected Welcome, got {:?}", other),
    };

    send(
        &mut ws,
        &ClientMsg::KeyDown {
            code: "ShiftLeft".to_string(),
        },
    )
    .await;
    send(
        &mut ws,
        &ClientMsg::KeyDown {
            code: "KeyW".to_string(),
        },
    )
    .await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    send(
        &mut ws,
        &ClientMsg::KeyUp {
            code: "KeyW".to_string(),
        },
    )
    .await;

    // Frames queued during the flight come first; read past them
    for _ in 0..10 {
        let _ = next_frame(&mut ws).await;
    }
    let latest = next_frame(&mut ws).await;

    let dx = latest.position[0] - start[0];
    let dz = latest.position[2] - start[2];
    // Facing the wormhole at (10, 0, -32): forward is +x, -z
    assert!(dx > 0.0, "expected +x movement, got {:?}", latest.position);
    assert!(dz < 0.0, "expected -z movement, got {:?}", latest.position);
}

#[tokio::test]
async fn test_malformed_messages_are_ignored() {
    let url = start_test_server().await;
    let mut ws = connect(&url).await;
    let _welcome = recv_msg(&mut ws).await;

    ws.send(Message::Text("not json".into())).await.unwrap();
    ws.send(Message::Text(r#"{"type":"warp_drive"}"#.into()))
        .await
        .unwrap();

    // Connection stays open and frames keep coming
    let frame = next_frame(&mut ws).await;
    assert_eq!(frame.galaxy, 0);
}
