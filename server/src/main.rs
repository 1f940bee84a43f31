use axum::routing::get;
use axum::Router;
use tokio::sync::{broadcast, mpsc};
use tower_http::cors::CorsLayer;
use wormhole_server::config::{simulation_config_from_env, ServerConfig};
use wormhole_server::game_loop::{run_simulation_loop, GameBroadcast, GameCommand};
use wormhole_server::simulation::Simulation;
use wormhole_server::ws::{ws_handler, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env();

    // Validate configuration before starting
    if let Err(e) = config.validate() {
        eprintln!("Invalid server configuration: {}", e);
        std::process::exit(1);
    }

    let simulation = match simulation_config_from_env().and_then(Simulation::new) {
        Ok(simulation) => simulation,
        Err(e) => {
            eprintln!("Invalid simulation configuration: {}", e);
            std::process::exit(1);
        }
    };

    let listen_addr = config.listen_addr.clone();

    let (game_tx, game_rx) = mpsc::channel::<GameCommand>(256);
    let (broadcast_tx, _) = broadcast::channel::<GameBroadcast>(64);

    // Spawn simulation loop
    let bc_tx = broadcast_tx.clone();
    tokio::spawn(async move {
        run_simulation_loop(game_rx, bc_tx, config, simulation).await;
    });

    // Axum app
    let app_state = AppState {
        game_tx,
        broadcast_tx,
    };
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    tracing::info!("Starting wormhole server on {}", listen_addr);

    let listener = match tokio::net::TcpListener::bind(&listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", listen_addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
