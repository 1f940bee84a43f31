use crate::controls::{ControlsManager, DeviceReading};
use crate::error::SimError;
use crate::motion::{integrate_eye, integrate_motion};
use crate::player::PlayerState;
use crate::protocol::{ClientMsg, FrameMsg, KeyCode};
use crate::teleporter::Teleporter;
use crate::wormhole::{Crossing, WormholeField};
use wormhole_shared::config::SimulationConfig;

/// Result of one simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Delta actually integrated, after clamping
    pub delta: f64,
    pub crossing: Option<Crossing>,
}

/// What an input event did beyond updating controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Applied,
    Teleported { target_index: usize },
}

/// The whole flight: one player, one wormhole, the teleport targets and the controls.
///
/// Owned by a single task; everything that changes it goes through `&mut self`.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    field: WormholeField,
    teleporter: Teleporter,
    player: PlayerState,
    controls: ControlsManager,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        config.validate()?;
        let field = WormholeField::new(&config.wormhole)?;
        let teleporter = Teleporter::from_config(&config.teleport_targets);
        let controls = ControlsManager::new(&config.controls);

        let mut player = PlayerState::default();
        player.look_at(field.center());

        Ok(Self {
            config,
            field,
            teleporter,
            player,
            controls,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn field(&self) -> &WormholeField {
        &self.field
    }

    pub fn teleporter(&self) -> &Teleporter {
        &self.teleporter
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    pub fn controls(&self) -> &ControlsManager {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut ControlsManager {
        &mut self.controls
    }

    /// Raise the measured delta to the configured floor. Non-finite deltas also
    /// collapse to the floor.
    pub fn clamp_frame_delta(&self, raw_delta: f64) -> f64 {
        if raw_delta.is_finite() && raw_delta > self.config.min_frame_delta {
            raw_delta
        } else {
            self.config.min_frame_delta
        }
    }

    /// Advance one frame: controllers, motion, wormhole crossing, then the eyes.
    pub fn step(&mut self, raw_delta: f64) -> StepOutcome {
        let delta = self.clamp_frame_delta(raw_delta);

        self.controls.update(&mut self.player);

        let mut crossing = None;
        if let Some(prev_position) = integrate_motion(&mut self.player, &self.field, delta) {
            crossing = self.field.detect_crossing(&mut self.player, prev_position);
            if let Some(c) = &crossing {
                tracing::debug!(
                    "Crossed wormhole into galaxy {} at {:?}",
                    c.galaxy.index(),
                    c.exit_position
                );
            }
        }

        integrate_eye(&mut self.player, delta);

        StepOutcome { delta, crossing }
    }

    /// Jump to the target after the one nearest to the player.
    pub fn teleport_next(&mut self) -> Result<usize, SimError> {
        let index = self.teleporter.teleport_next(&mut self.player, &self.field)?;
        tracing::info!(
            "Teleported to target {} in galaxy {}",
            index,
            self.player.galaxy.index()
        );
        Ok(index)
    }

    /// Route one client input event to the controllers.
    pub fn apply_input(&mut self, msg: ClientMsg) -> Result<InputOutcome, SimError> {
        match msg {
            ClientMsg::KeyDown { code, alt } => {
                self.controls.observe_key_press();
                self.controls.keyboard.key_down(code, alt);
                if code == KeyCode::KeyT {
                    let target_index = self.teleport_next()?;
                    return Ok(InputOutcome::Teleported { target_index });
                }
            }
            ClientMsg::KeyUp { code } => self.controls.keyboard.key_up(code),
            ClientMsg::PointerMove {
                x,
                y,
                width,
                height,
            } => self.controls.keyboard.pointer_move(x, y, width, height),
            ClientMsg::PointerButton { button, pressed } => {
                self.controls.keyboard.pointer_button(button, pressed)
            }
            ClientMsg::Touch {
                touches,
                width,
                height,
            } => self.controls.mobile.touch.set_touches(&touches, width, height),
            ClientMsg::DeviceOrientation {
                alpha,
                beta,
                gamma,
                screen_orientation,
            } => {
                let reading = DeviceReading {
                    alpha,
                    beta,
                    gamma,
                    screen_orientation,
                };
                self.controls
                    .observe_device_orientation(reading, &mut self.player);
            }
            ClientMsg::TeleportNext => {
                let target_index = self.teleport_next()?;
                return Ok(InputOutcome::Teleported { target_index });
            }
        }
        Ok(InputOutcome::Applied)
    }

    /// Snapshot for the renderer.
    pub fn frame(&self) -> FrameMsg {
        self.player.frame()
    }
}
