use crate::vec3::{vec3, Vec3};

/// Black hole landmark in the far galaxy.
pub const BLACK_HOLE_POSITION: Vec3 = Vec3 {
    x: 0.0,
    y: -250.0,
    z: 250.0,
};

/// Planet landmark orbiting the black hole.
pub const PLANET_POSITION: Vec3 = Vec3 {
    x: 7.6,
    y: -188.0,
    z: 200.0,
};

/// Lower bound applied to the host frame delta before integration (seconds).
pub const MIN_FRAME_DELTA: f64 = 0.001;

/// Configuration rejected before the simulation is built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("wormhole radius must be finite and > 0, got {0}")]
    InvalidRadius(f64),
    #[error("wormhole gravity ratio must be in [0, 1), got {0}")]
    InvalidGravityRatio(f64),
    #[error("{0} must have finite coordinates")]
    NonFinite(String),
    #[error("minimum frame delta must be finite and > 0, got {0}")]
    InvalidFrameDelta(f64),
    #[error("controls setting {name} must be finite and > 0, got {value}")]
    InvalidControls { name: &'static str, value: f64 },
}

/// One of the two regions joined by the wormhole. Travels as 0 or 1 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Galaxy {
    #[default]
    Home,
    Far,
}

impl Galaxy {
    /// The galaxy on the other side of the wormhole.
    pub fn flipped(self) -> Galaxy {
        match self {
            Galaxy::Home => Galaxy::Far,
            Galaxy::Far => Galaxy::Home,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Galaxy::Home => 0,
            Galaxy::Far => 1,
        }
    }
}

impl From<Galaxy> for u8 {
    fn from(galaxy: Galaxy) -> u8 {
        galaxy.index()
    }
}

impl TryFrom<u8> for Galaxy {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Galaxy::Home),
            1 => Ok(Galaxy::Far),
            other => Err(format!("galaxy must be 0 or 1, got {}", other)),
        }
    }
}

/// Wormhole configuration
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, ts_rs::TS)]
#[ts(export, export_to = "../../client/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct WormholeConfig {
    pub center: Vec3,
    pub radius: f64,
    /// Curvature strength near the horizon, in [0, 1)
    pub gravity_ratio: f64,
}

impl Default for WormholeConfig {
    fn default() -> Self {
        Self {
            center: vec3(10.0, 0.0, -32.0),
            radius: 0.8,
            gravity_ratio: 0.25,
        }
    }
}

impl WormholeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.center.is_finite() {
            return Err(ConfigError::NonFinite("wormhole center".to_string()));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(ConfigError::InvalidRadius(self.radius));
        }
        if !self.gravity_ratio.is_finite() || !(0.0..1.0).contains(&self.gravity_ratio) {
            return Err(ConfigError::InvalidGravityRatio(self.gravity_ratio));
        }
        Ok(())
    }
}

/// Point of interest reachable with the teleport action
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, ts_rs::TS)]
#[ts(export, export_to = "../../client/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct TeleportTargetConfig {
    pub position: Vec3,
    /// Point to face after arrival
    pub look_at: Vec3,
    #[ts(type = "number")]
    pub galaxy: Galaxy,
}

/// Input tuning for the keyboard and touch controllers
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize, ts_rs::TS)]
#[ts(export, export_to = "../../client/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct ControlsConfig {
    /// Units per second at normal speed
    pub movement_speed: f64,
    /// Speed multiplier while Shift is held
    pub boost_multiplier: f64,
    /// Radians per second for pitch/yaw/roll
    pub roll_speed: f64,
    /// Vertical field of view of the eye camera (degrees), used to map touches to directions
    pub fov_degrees: f64,
    /// Speed multiplier when more than one finger touches the screen
    pub multi_touch_multiplier: f64,
    /// Keep flying forward with no key held; the back key still reverses
    #[serde(default)]
    pub auto_forward: bool,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            movement_speed: 1.0,
            boost_multiplier: 10.0,
            roll_speed: std::f64::consts::PI / 3.0,
            fov_degrees: 50.0,
            multi_touch_multiplier: 10.0,
            auto_forward: false,
        }
    }
}

impl ControlsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let settings = [
            ("movement_speed", self.movement_speed),
            ("boost_multiplier", self.boost_multiplier),
            ("roll_speed", self.roll_speed),
            ("fov_degrees", self.fov_degrees),
            ("multi_touch_multiplier", self.multi_touch_multiplier),
        ];
        for (name, value) in settings {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidControls { name, value });
            }
        }
        if self.fov_degrees >= 180.0 {
            return Err(ConfigError::InvalidControls {
                name: "fov_degrees",
                value: self.fov_degrees,
            });
        }
        Ok(())
    }
}

/// Everything the simulation needs at startup. Immutable once the simulation is built.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, ts_rs::TS)]
#[ts(export, export_to = "../../client/src/generated/")]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    pub wormhole: WormholeConfig,
    pub teleport_targets: Vec<TeleportTargetConfig>,
    #[serde(default)]
    pub controls: ControlsConfig,
    #[serde(default = "default_min_frame_delta")]
    pub min_frame_delta: f64,
}

fn default_min_frame_delta() -> f64 {
    MIN_FRAME_DELTA
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let wormhole = WormholeConfig::default();
        Self {
            teleport_targets: vec![
                TeleportTargetConfig {
                    position: vec3(10.0, -307.0, 454.0),
                    look_at: BLACK_HOLE_POSITION,
                    galaxy: Galaxy::Far,
                },
                TeleportTargetConfig {
                    position: vec3(7.2, -188.0, 199.6),
                    look_at: PLANET_POSITION,
                    galaxy: Galaxy::Far,
                },
                TeleportTargetConfig {
                    position: vec3(12.4, 3.3, -35.1),
                    look_at: wormhole.center,
                    galaxy: Galaxy::Far,
                },
                TeleportTargetConfig {
                    position: vec3(9.8, -4.6, -3.1),
                    look_at: wormhole.center,
                    galaxy: Galaxy::Home,
                },
            ],
            wormhole,
            controls: ControlsConfig::default(),
            min_frame_delta: MIN_FRAME_DELTA,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.wormhole.validate()?;
        self.controls.validate()?;
        for (i, target) in self.teleport_targets.iter().enumerate() {
            if !target.position.is_finite() {
                return Err(ConfigError::NonFinite(format!(
                    "teleport target {} position",
                    i
                )));
            }
            if !target.look_at.is_finite() {
                return Err(ConfigError::NonFinite(format!(
                    "teleport target {} lookAt",
                    i
                )));
            }
        }
        if !self.min_frame_delta.is_finite() || self.min_frame_delta <= 0.0 {
            return Err(ConfigError::InvalidFrameDelta(self.min_frame_delta));
        }
        Ok(())
    }
}
