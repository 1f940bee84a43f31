use crate::config::ServerConfig;
use crate::protocol::{
    crossing_msg, ClientMsg, CrossingMsg, FrameMsg, TeleportedMsg, WelcomeMsg, PROTOCOL_VERSION,
};
use crate::simulation::{InputOutcome, Simulation};
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc, oneshot};

/// Commands from client connections to the simulation loop
pub enum GameCommand {
    Join {
        response: oneshot::Sender<WelcomeMsg>,
    },
    Leave,
    Input(ClientMsg),
}

/// Broadcasts from the simulation loop to all clients
#[derive(Debug, Clone)]
pub enum GameBroadcast {
    Frame(FrameMsg),
    Crossing(CrossingMsg),
    Teleported(TeleportedMsg),
}

/// Greeting for a new connection: the scene and the current frame.
pub fn welcome(simulation: &Simulation) -> WelcomeMsg {
    WelcomeMsg {
        protocol_version: PROTOCOL_VERSION,
        server_version: env!("CARGO_PKG_VERSION").to_string(),
        config: simulation.config().clone(),
        frame: simulation.frame(),
    }
}

/// Run the frame loop. Owns the simulation.
pub async fn run_simulation_loop(
    mut cmd_rx: mpsc::Receiver<GameCommand>,
    broadcast_tx: broadcast::Sender<GameBroadcast>,
    server_config: ServerConfig,
    mut simulation: Simulation,
) {
    let frame_duration = Duration::from_secs_f64(1.0 / server_config.frame_rate_hz as f64);
    let broadcast_every_n = server_config.broadcast_every_n();
    let mut frame_count: u64 = 0;
    let mut clients: usize = 0;

    let mut frame_interval = tokio::time::interval(frame_duration);
    frame_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut last_frame = Instant::now();

    loop {
        tokio::select! {
            _ = frame_interval.tick() => {
                let now = Instant::now();
                let raw_delta = now.duration_since(last_frame).as_secs_f64();
                last_frame = now;

                let outcome = simulation.step(raw_delta);

                if let Some(crossing) = &outcome.crossing {
                    let _ = broadcast_tx.send(GameBroadcast::Crossing(crossing_msg(crossing)));
                }

                // Frames go out at a lower rate
                frame_count += 1;
                if frame_count % broadcast_every_n == 0 {
                    let _ = broadcast_tx.send(GameBroadcast::Frame(simulation.frame()));
                }
            }

            Some(cmd) = cmd_rx.recv() => {
                match cmd {
                    GameCommand::Join { response } => {
                        clients += 1;
                        let _ = response.send(welcome(&simulation));
                        tracing::info!("Client joined ({} connected)", clients);
                    }
                    GameCommand::Leave => {
                        clients = clients.saturating_sub(1);
                        tracing::info!("Client left ({} connected)", clients);
                    }
                    GameCommand::Input(msg) => match simulation.apply_input(msg) {
                        Ok(InputOutcome::Teleported { target_index }) => {
                            let frame = simulation.frame();
                            let _ = broadcast_tx.send(GameBroadcast::Teleported(TeleportedMsg {
                                target_index: target_index as u32,
                                galaxy: frame.galaxy,
                            }));
                            let _ = broadcast_tx.send(GameBroadcast::Frame(frame));
                        }
                        Ok(InputOutcome::Applied) => {}
                        Err(e) => tracing::warn!("Teleport failed: {}", e),
                    },
                }
            }

            else => break,
        }
    }

    tracing::info!("Simulation loop ended");
}
